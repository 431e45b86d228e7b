// src/web/handlers/interview_handlers.rs
use super::interview_error_response;
use crate::interview::{InterviewRequest, InterviewService};
use crate::web::session::ActiveSession;
use crate::web::types::*;

use rocket::http::CookieJar;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

pub const NO_INTRO: &str = "No introduction script available.";
pub const VIDEO_ROUTE: &str = "/static/videos";

pub async fn create_interview_handler(
    request: Json<InterviewRequest>,
    cookies: &CookieJar<'_>,
    service: &State<InterviewService>,
) -> Result<Json<DataResponse<InterviewData>>, Json<StandardErrorResponse>> {
    let request = request.into_inner();
    info!(
        "Preparing interview: {} questions, avatar {}, complexity {}",
        request.num_questions, request.avatar, request.complexity
    );

    let session = service.prepare(request).await.map_err(|e| {
        warn!("Interview preparation rejected: {}", e);
        interview_error_response(&e)
    })?;

    ActiveSession::store(cookies, &session.feedback_id);

    Ok(Json(DataResponse::success(
        "Interview prepared".to_string(),
        InterviewData::from(session),
    )))
}

pub async fn get_intro_handler(
    session: Option<ActiveSession>,
    service: &State<InterviewService>,
) -> Json<TextResponse> {
    let script = match session {
        Some(active) => service
            .session(&active.feedback_id)
            .await
            .ok()
            .map(|s| s.intro_script)
            .filter(|s| !s.trim().is_empty()),
        None => None,
    };

    Json(TextResponse::success(
        script.unwrap_or_else(|| NO_INTRO.to_string()),
    ))
}

pub async fn intro_status_handler(service: &State<InterviewService>) -> Json<DataResponse<IntroStatus>> {
    let exists = service.intro_ready().await;
    Json(DataResponse::success(
        "Intro video status".to_string(),
        IntroStatus { exists },
    ))
}

pub async fn get_questions_handler(
    active: ActiveSession,
    service: &State<InterviewService>,
) -> Result<Json<DataResponse<Vec<QuestionView>>>, Json<StandardErrorResponse>> {
    let session = service
        .session(&active.feedback_id)
        .await
        .map_err(|e| interview_error_response(&e))?;

    let questions: Vec<QuestionView> = service
        .available_questions(&session)
        .await
        .into_iter()
        .filter_map(|q| {
            let name = q.video_path.as_deref()?.file_name()?.to_str()?.to_string();
            Some(QuestionView {
                question: q.question,
                video_url: format!("{}/{}", VIDEO_ROUTE, name),
            })
        })
        .collect();

    if questions.is_empty() {
        warn!("No question videos available for {}", active.feedback_id);
        return Err(Json(StandardErrorResponse::new(
            "No questions available".to_string(),
            "NO_QUESTIONS".to_string(),
            vec![
                "Wait for the question videos to finish rendering".to_string(),
                "Start a new interview".to_string(),
            ],
        )));
    }

    Ok(Json(DataResponse::success(
        format!("{} questions available", questions.len()),
        questions,
    )))
}

pub async fn save_recording_handler(
    active: ActiveSession,
    request: Json<RecordingRequest>,
    service: &State<InterviewService>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let path = service
        .save_recording(&active.feedback_id, &request.video_data)
        .await
        .map_err(|e| {
            warn!("Failed to save recording for {}: {}", active.feedback_id, e);
            interview_error_response(&e)
        })?;

    Ok(Json(
        ActionResponse::success(
            format!("Recording saved to {}", path.display()),
            "recording_saved".to_string(),
        )
        .with_next_actions(vec!["request_feedback".to_string()]),
    ))
}
