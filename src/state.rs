use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::services::llm_provider::build_backend;
use crate::services::schedule_advisor::ScheduleAdvisor;

#[derive(Clone)]
pub struct AppState {
    advisor: Arc<ScheduleAdvisor>,
    config: Arc<Config>,
    started_at: Instant,
}

impl AppState {
    pub fn new(advisor: ScheduleAdvisor, config: &Config) -> Self {
        Self {
            advisor: Arc::new(advisor),
            config: Arc::new(config.clone()),
            started_at: Instant::now(),
        }
    }

    /// Build the advisor from `config.ai`, resolving the backend once.
    pub fn from_config(config: &Config) -> Self {
        let advisor = ScheduleAdvisor::new(build_backend(&config.ai), config.ai.failure_fallback);
        Self::new(advisor, config)
    }

    pub fn advisor(&self) -> &ScheduleAdvisor {
        &self.advisor
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
