// src/web/mod.rs

pub mod handlers;
pub mod session;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::interview::{FeedbackStatus, InterviewRequest, InterviewService};
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::FileServer;
use rocket::http::{CookieJar, Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use session::ActiveSession;
use std::path::PathBuf;
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "POST, GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/interviews", data = "<request>")]
pub async fn create_interview(
    request: Json<InterviewRequest>,
    cookies: &CookieJar<'_>,
    service: &State<InterviewService>,
) -> Result<Json<DataResponse<InterviewData>>, Json<StandardErrorResponse>> {
    handlers::create_interview_handler(request, cookies, service).await
}

#[get("/intro")]
pub async fn get_intro(session: Option<ActiveSession>, service: &State<InterviewService>) -> Json<TextResponse> {
    handlers::get_intro_handler(session, service).await
}

#[get("/intro/status")]
pub async fn intro_status(service: &State<InterviewService>) -> Json<DataResponse<IntroStatus>> {
    handlers::intro_status_handler(service).await
}

#[get("/questions")]
pub async fn get_questions(
    session: ActiveSession,
    service: &State<InterviewService>,
) -> Result<Json<DataResponse<Vec<QuestionView>>>, Json<StandardErrorResponse>> {
    handlers::get_questions_handler(session, service).await
}

#[post("/recording", data = "<request>")]
pub async fn save_recording(
    session: ActiveSession,
    request: Json<RecordingRequest>,
    service: &State<InterviewService>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::save_recording_handler(session, request, service).await
}

#[post("/feedback")]
pub async fn start_feedback(
    session: ActiveSession,
    service: &State<InterviewService>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::start_feedback_handler(session, service).await
}

#[get("/feedback/status")]
pub async fn feedback_status(
    session: ActiveSession,
    service: &State<InterviewService>,
) -> Json<DataResponse<FeedbackStatus>> {
    handlers::feedback_status_handler(session, service).await
}

#[get("/feedback")]
pub async fn get_feedback(session: Option<ActiveSession>, service: &State<InterviewService>) -> Json<TextResponse> {
    handlers::get_feedback_handler(session, service).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(401)]
pub fn no_session() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "No interview in progress".to_string(),
        "NO_SESSION".to_string(),
        vec!["Start a new interview first".to_string()],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the endpoint path".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be parsed".to_string(),
        "UNPROCESSABLE_ENTITY".to_string(),
        vec![
            "Send job_description, num_questions, avatar and complexity".to_string(),
            "num_questions must be a positive integer".to_string(),
        ],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Builds the application without launching it.
pub fn build_rocket(service: InterviewService, video_dir: PathBuf, port: u16) -> Rocket<Build> {
    // Recordings arrive as base64 JSON bodies.
    let limits = Limits::default()
        .limit("json", 512.mebibytes())
        .limit("data-form", 512.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(service)
        .register(
            "/api",
            catchers![bad_request, no_session, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                create_interview,
                get_intro,
                intro_status,
                get_questions,
                save_recording,
                start_feedback,
                feedback_status,
                get_feedback,
                health,
                options,
            ],
        )
        .mount(handlers::VIDEO_ROUTE, FileServer::from(video_dir))
}

// Main server start function
pub async fn start_web_server(service: InterviewService, video_dir: PathBuf, port: u16) -> Result<()> {
    info!("Starting interview coach API server");
    info!("Server: http://0.0.0.0:{}", port);
    info!("Videos served from {}", video_dir.display());

    let _rocket = build_rocket(service, video_dir, port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server failed: {}", e))?;

    Ok(())
}
