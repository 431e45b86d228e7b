// src/web/handlers/feedback_handlers.rs
use super::interview_error_response;
use crate::interview::service::NO_FEEDBACK;
use crate::interview::{FeedbackStatus, InterviewService};
use crate::web::session::ActiveSession;
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn start_feedback_handler(
    active: ActiveSession,
    service: &State<InterviewService>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let started = service
        .start_feedback(&active.feedback_id)
        .await
        .map_err(|e| interview_error_response(&e))?;

    let message = if started {
        "Feedback processing started"
    } else {
        info!("Ignoring repeated feedback request for {}", active.feedback_id);
        "Feedback processing already in progress"
    };

    Ok(Json(
        ActionResponse::success(message.to_string(), "feedback_processing".to_string())
            .with_next_actions(vec!["poll_feedback_status".to_string()]),
    ))
}

pub async fn feedback_status_handler(
    active: ActiveSession,
    service: &State<InterviewService>,
) -> Json<DataResponse<FeedbackStatus>> {
    let status = service.feedback_status(&active.feedback_id).await;
    Json(DataResponse::success("Feedback status".to_string(), status))
}

pub async fn get_feedback_handler(
    session: Option<ActiveSession>,
    service: &State<InterviewService>,
) -> Json<TextResponse> {
    let feedback = match session {
        Some(active) => service.feedback_text(&active.feedback_id).await,
        None => NO_FEEDBACK.to_string(),
    };
    Json(TextResponse::success(feedback))
}
