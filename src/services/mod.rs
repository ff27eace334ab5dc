pub mod anthropic;
pub mod gemini;
pub mod llm_provider;
pub mod schedule_advisor;
pub mod study_plan;
