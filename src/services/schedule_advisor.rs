use std::fmt::Write as _;
use std::sync::Arc;

use crate::config::FailureFallback;
use crate::services::llm_provider::{LlmBackend, LlmError};
use crate::services::study_plan::{
    error_plan, mock_plan, parse_sessions, MarkRecord, PlanParseError, PlanSource, StudySession,
    TimeSlot,
};

/// Sessions together with where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub sessions: Vec<StudySession>,
    pub source: PlanSource,
}

#[derive(Debug, thiserror::Error)]
enum GenerationError {
    #[error(transparent)]
    Backend(#[from] LlmError),
    #[error(transparent)]
    Parse(#[from] PlanParseError),
}

/// Builds study plans from marks and free slots. Without a backend it serves
/// the mock plan; a backend failure is absorbed into `failure_fallback`.
#[derive(Clone)]
pub struct ScheduleAdvisor {
    backend: Option<Arc<dyn LlmBackend>>,
    failure_fallback: FailureFallback,
}

impl ScheduleAdvisor {
    pub fn new(backend: Option<Arc<dyn LlmBackend>>, failure_fallback: FailureFallback) -> Self {
        Self {
            backend,
            failure_fallback,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn provider_name(&self) -> &'static str {
        self.backend.as_ref().map(|b| b.name()).unwrap_or("none")
    }

    pub fn model(&self) -> Option<&str> {
        self.backend.as_ref().map(|b| b.model())
    }

    pub fn failure_fallback(&self) -> FailureFallback {
        self.failure_fallback
    }

    /// Always returns at least one session.
    pub async fn generate(&self, marks: &[MarkRecord], slots: &[TimeSlot]) -> Vec<StudySession> {
        self.generate_plan(marks, slots).await.sessions
    }

    pub async fn generate_plan(&self, marks: &[MarkRecord], slots: &[TimeSlot]) -> GeneratedPlan {
        let Some(backend) = self.backend.as_deref() else {
            tracing::info!("Generating mock study schedule (no AI provider)");
            return GeneratedPlan {
                sessions: mock_plan(),
                source: PlanSource::Mock,
            };
        };

        let prompt = build_prompt(marks, slots);
        match request_sessions(backend, &prompt).await {
            Ok(sessions) => {
                tracing::info!(
                    provider = backend.name(),
                    sessions = sessions.len(),
                    "Study schedule generated"
                );
                GeneratedPlan {
                    sessions,
                    source: PlanSource::Ai,
                }
            }
            Err(e) => {
                tracing::error!(
                    provider = backend.name(),
                    model = backend.model(),
                    fallback = self.failure_fallback.as_str(),
                    error = %e,
                    "Error generating study schedule with AI provider"
                );
                let sessions = match self.failure_fallback {
                    FailureFallback::ErrorPlan => error_plan(),
                    FailureFallback::MockPlan => mock_plan(),
                };
                GeneratedPlan {
                    sessions,
                    source: PlanSource::Fallback,
                }
            }
        }
    }
}

async fn request_sessions(
    backend: &dyn LlmBackend,
    prompt: &str,
) -> Result<Vec<StudySession>, GenerationError> {
    let text = backend.generate_schedule_json(prompt).await?;
    Ok(parse_sessions(&text)?)
}

/// Render the advisor prompt. Each mark becomes `- <subject>: <marks>/<max>`
/// and slots are joined with `", "`.
pub fn build_prompt(marks: &[MarkRecord], slots: &[TimeSlot]) -> String {
    let mut marks_summary = String::new();
    for (i, m) in marks.iter().enumerate() {
        if i > 0 {
            marks_summary.push('\n');
        }
        let _ = write!(marks_summary, "- {}: {}/{}", m.subject, m.marks, m.max_marks);
    }
    let slots_summary = slots
        .iter()
        .map(TimeSlot::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are an expert academic advisor. Your task is to create a personalized, one-day study schedule \
for a student based on their recent performance and available time slots.
Prioritize subjects where the student has lower marks (weak areas). Use principles of spaced repetition and active recall.

Student's Performance:
{marks_summary}

Available Study Slots for Today:
{slots_summary}

Generate a schedule with specific topics to study for each session. For each session, provide a brief reason \
for its inclusion and priority. Keep sessions to about 50-60 minutes and include short breaks.

Respond with ONLY a JSON array. Each element must be an object with exactly these string fields, all required: \
\"subject\", \"topic\", \"startTime\", \"endTime\", \"reason\". Do not include any other text or markdown formatting."
    )
}
