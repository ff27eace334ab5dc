use axum::Router;

use study_advisor::config::{AiConfig, AiProvider, Config, FailureFallback};
use study_advisor::routes::build_router;
use study_advisor::state::AppState;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
}

// Config is built directly; set_var would race across test threads.
pub fn test_config(ai: AiConfig) -> Config {
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 4000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        ai,
    }
}

pub fn gemini_ai(base_url: &str) -> AiConfig {
    AiConfig {
        provider: AiProvider::Gemini,
        gemini_api_key: "test-gemini-key".to_string(),
        gemini_api_url: base_url.to_string(),
        timeout_secs: 5,
        ..AiConfig::disabled()
    }
}

pub fn anthropic_ai(base_url: &str) -> AiConfig {
    AiConfig {
        provider: AiProvider::Anthropic,
        anthropic_api_key: "test-anthropic-key".to_string(),
        anthropic_api_url: base_url.to_string(),
        timeout_secs: 5,
        ..AiConfig::disabled()
    }
}

pub fn with_fallback(ai: AiConfig, failure_fallback: FailureFallback) -> AiConfig {
    AiConfig {
        failure_fallback,
        ..ai
    }
}

pub fn spawn_app(ai: AiConfig) -> TestApp {
    let config = test_config(ai);
    let state = AppState::from_config(&config);
    let app = build_router(state.clone());

    TestApp { app, state, config }
}

pub fn spawn_mock_app() -> TestApp {
    spawn_app(AiConfig::disabled())
}
