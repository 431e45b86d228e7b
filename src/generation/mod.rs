// src/generation/mod.rs
//! Interview content produced by the generative-language API: intro script,
//! questions and post-interview feedback.

pub mod feedback;
pub mod gemini;
pub mod prompts;
pub mod questions;

pub use feedback::FeedbackGenerator;
pub use gemini::GeminiClient;
pub use questions::{InterviewGenerator, InterviewQuestion, CLOSING_QUESTION};

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned no text")]
    EmptyContent,

    #[error("video processing failed for {0}")]
    ProcessingFailed(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Prompt in, generated text out.
#[rocket::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Uploads a recording and asks the model about it.
#[rocket::async_trait]
pub trait VideoAnalyzer: Send + Sync {
    async fn analyze_video(&self, video_path: &Path, prompt: &str) -> Result<String, GenerationError>;
}
