use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extractors::JsonBody;
use crate::response::AppError;
use crate::services::study_plan::{MarkRecord, PlanSource, StudySession, TimeSlot};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/generate-study-schedule", post(generate_study_schedule))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateScheduleRequest {
    marks: Option<Vec<MarkRecord>>,
    available_slots: Option<Vec<TimeSlot>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateScheduleResponse {
    success: bool,
    schedule: Vec<StudySession>,
    source: PlanSource,
    generated_at: DateTime<Utc>,
}

async fn generate_study_schedule(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<GenerateScheduleRequest>,
) -> Result<Json<GenerateScheduleResponse>, AppError> {
    let (Some(marks), Some(slots)) = (req.marks, req.available_slots) else {
        return Err(AppError::bad_request(
            "MISSING_FIELDS",
            "Missing marks or availableSlots",
        ));
    };

    let plan = state.advisor().generate_plan(&marks, &slots).await;

    Ok(Json(GenerateScheduleResponse {
        success: true,
        schedule: plan.sessions,
        source: plan.source,
        generated_at: Utc::now(),
    }))
}
