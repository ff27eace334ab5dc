use serde::{Deserialize, Serialize};

/// One subject score for a student. `marks <= max_marks` is not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRecord {
    pub subject: String,
    #[serde(alias = "marksObtained")]
    pub marks: f64,
    #[serde(alias = "marksMax")]
    pub max_marks: f64,
}

impl MarkRecord {
    pub fn new(subject: impl Into<String>, marks: f64, max_marks: f64) -> Self {
        Self {
            subject: subject.into(),
            marks,
            max_marks,
        }
    }
}

/// A free study interval as supplied by the caller, e.g. `"09:00-10:00"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlot(pub String);

impl TimeSlot {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TimeSlot {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub subject: String,
    pub topic: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

impl StudySession {
    fn fixed(subject: &str, topic: &str, start: &str, end: &str, reason: &str) -> Self {
        Self {
            subject: subject.to_string(),
            topic: topic.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Where a returned plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Ai,
    Mock,
    Fallback,
}

/// Plan served when no generation backend is configured. Not personalized.
pub fn mock_plan() -> Vec<StudySession> {
    vec![
        StudySession::fixed(
            "Algorithms",
            "Review Big O Notation",
            "09:00",
            "10:00",
            "This is a weak area based on recent marks.",
        ),
        StudySession::fixed(
            "Data Structures",
            "Practice with Trees",
            "11:00",
            "12:00",
            "Reinforce concepts for the upcoming exam.",
        ),
        StudySession::fixed(
            "Break",
            "Take a break",
            "12:00",
            "13:00",
            "Rest is important.",
        ),
        StudySession::fixed(
            "Database Systems",
            "SQL Query Practice",
            "13:00",
            "14:00",
            "Consistent performance, good for review.",
        ),
    ]
}

/// Single-session plan signalling that a configured backend failed.
pub fn error_plan() -> Vec<StudySession> {
    vec![StudySession::fixed(
        "Error",
        "Could not generate schedule.",
        "N/A",
        "N/A",
        "An error occurred while contacting the AI service.",
    )]
}

#[derive(Debug, thiserror::Error)]
pub enum PlanParseError {
    #[error("response is not a valid session array: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("response contained no sessions")]
    Empty,
}

/// Parse backend output into sessions. Every element must carry all five
/// string fields; an empty array is rejected.
pub fn parse_sessions(text: &str) -> Result<Vec<StudySession>, PlanParseError> {
    let sessions: Vec<StudySession> = serde_json::from_str(text.trim())?;
    if sessions.is_empty() {
        return Err(PlanParseError::Empty);
    }
    Ok(sessions)
}
