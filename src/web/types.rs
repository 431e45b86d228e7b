// src/web/types.rs
use crate::avatar::Persona;
use crate::generation::InterviewQuestion;
use crate::interview::InterviewSession;
use rocket::serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_actions: Option<Vec<String>>,
}

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
            next_actions: None,
        }
    }

    pub fn with_next_actions(mut self, next_actions: Vec<String>) -> Self {
        self.next_actions = Some(next_actions);
        self
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

// Request bodies

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct RecordingRequest {
    /// Data URL as produced by the browser's MediaRecorder (`data:video/...;base64,...`).
    pub video_data: String,
}

// Response payloads

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct InterviewData {
    pub feedback_id: String,
    pub persona: Persona,
    pub job_description: String,
    pub intro_script: String,
    pub questions: Vec<InterviewQuestion>,
}

impl From<InterviewSession> for InterviewData {
    fn from(session: InterviewSession) -> Self {
        Self {
            feedback_id: session.feedback_id,
            persona: session.persona,
            job_description: session.job_description,
            intro_script: session.intro_script,
            questions: session.questions,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct IntroStatus {
    pub exists: bool,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct QuestionView {
    pub question: String,
    /// Public URL of the rendered video under `/static/videos`.
    pub video_url: String,
}
