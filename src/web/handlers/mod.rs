pub mod feedback_handlers;
pub mod interview_handlers;
pub mod system_handlers;

pub use feedback_handlers::*;
pub use interview_handlers::*;
pub use system_handlers::*;

use crate::interview::InterviewError;
use crate::web::types::StandardErrorResponse;
use rocket::serde::json::Json;

/// Maps a service failure onto the standard error envelope.
pub fn interview_error_response(error: &InterviewError) -> Json<StandardErrorResponse> {
    let (code, suggestions) = match error {
        InterviewError::InvalidRequest(_) => (
            "INVALID_REQUEST",
            vec![
                "Provide a job description or a job posting link".to_string(),
                "Ask for at least one question".to_string(),
            ],
        ),
        InterviewError::Persona(_) => (
            "INVALID_AVATAR",
            vec!["Choose one of: Sophia, Diana, Matt".to_string()],
        ),
        InterviewError::SessionNotFound(_) => (
            "SESSION_NOT_FOUND",
            vec!["Start a new interview".to_string()],
        ),
        InterviewError::InvalidRecording(_) => (
            "INVALID_RECORDING",
            vec!["Send the recording as a base64 data URL".to_string()],
        ),
        InterviewError::Storage(_) => (
            "STORAGE_ERROR",
            vec!["Try again in a few moments".to_string()],
        ),
    };

    Json(StandardErrorResponse::new(
        error.to_string(),
        code.to_string(),
        suggestions,
    ))
}
