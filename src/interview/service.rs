// src/interview/service.rs
use super::description::truncate_description;
use super::feedback::{FeedbackStatus, FeedbackStore};
use super::session::{InterviewSession, SessionStore};
use crate::avatar::{AvatarError, Persona, SpeechRenderer};
use crate::generation::feedback::FEEDBACK_ERROR;
use crate::generation::questions::INTRO_VIDEO;
use crate::generation::{FeedbackGenerator, InterviewGenerator, InterviewQuestion};
use crate::link_resolver::LinkResolver;
use crate::utils;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

pub const NO_RECORDING_FEEDBACK: &str = "No video file found for feedback.";
pub const NO_FEEDBACK: &str = "No feedback available.";

#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Persona(#[from] AvatarError),

    #[error("Interview session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid recording: {0}")]
    InvalidRecording(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewRequest {
    pub job_description: String,
    pub num_questions: usize,
    pub avatar: String,
    pub complexity: String,
}

#[derive(Debug, Clone)]
pub struct InterviewSettings {
    pub avatar_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub max_description_chars: usize,
}

pub struct InterviewService {
    resolver: LinkResolver,
    generator: InterviewGenerator,
    renderer: Arc<dyn SpeechRenderer>,
    feedback: FeedbackGenerator,
    sessions: SessionStore,
    feedback_store: FeedbackStore,
    settings: InterviewSettings,
}

impl InterviewService {
    pub fn new(
        resolver: LinkResolver,
        generator: InterviewGenerator,
        renderer: Arc<dyn SpeechRenderer>,
        feedback: FeedbackGenerator,
        settings: InterviewSettings,
    ) -> Self {
        Self {
            resolver,
            generator,
            renderer,
            feedback,
            sessions: SessionStore::new(),
            feedback_store: FeedbackStore::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &InterviewSettings {
        &self.settings
    }

    pub fn resolver(&self) -> &LinkResolver {
        &self.resolver
    }

    /// Resolves links, caps the description, generates the script and
    /// questions, renders every video inline and opens a new session.
    pub async fn prepare(&self, request: InterviewRequest) -> Result<InterviewSession, InterviewError> {
        let persona = Persona::from_name(&request.avatar)?;
        if request.num_questions == 0 {
            return Err(InterviewError::InvalidRequest(
                "num_questions must be at least 1".to_string(),
            ));
        }
        if request.job_description.trim().is_empty() {
            return Err(InterviewError::InvalidRequest(
                "job_description must not be empty".to_string(),
            ));
        }

        let complexity = utils::normalize_complexity(&request.complexity);
        let resolution = self.resolver.resolve_detailed(&request.job_description).await;
        if let Some(source) = &resolution.source {
            info!("Using {} posting {} as job description", source.board, source.job_id);
        }
        let description = truncate_description(&resolution.text, self.settings.max_description_chars);

        let intro_script = self
            .generator
            .intro_script(&description, request.num_questions, persona.display_name())
            .await;
        let questions = self
            .generator
            .questions(&description, request.num_questions, &complexity, persona.display_name())
            .await;

        self.render_video(&intro_script, INTRO_VIDEO, persona).await;
        for question in &questions {
            let Some(name) = question
                .video_path
                .as_deref()
                .and_then(Path::file_name)
                .and_then(|n| n.to_str())
            else {
                continue;
            };
            self.render_video(&question.question, name, persona).await;
        }

        let session = InterviewSession::new(description, intro_script, questions, persona);
        info!(
            "Interview {} prepared with {} questions as {}",
            session.feedback_id,
            session.questions.len(),
            persona
        );
        self.sessions.insert(session.clone()).await;

        Ok(session)
    }

    async fn render_video(&self, text: &str, output_name: &str, persona: Persona) {
        let target = self.settings.avatar_dir.join(output_name);
        if let Err(e) = utils::remove_file_if_exists(&target).await {
            warn!("Could not clear stale video {}: {}", target.display(), e);
        }

        if let Err(e) = self.renderer.render(text, output_name, persona).await {
            error!("Failed to render {}: {}", output_name, e);
        }
    }

    pub async fn session(&self, feedback_id: &str) -> Result<InterviewSession, InterviewError> {
        self.sessions
            .get(feedback_id)
            .await
            .ok_or_else(|| InterviewError::SessionNotFound(feedback_id.to_string()))
    }

    pub async fn intro_ready(&self) -> bool {
        utils::file_exists(&self.settings.avatar_dir.join(INTRO_VIDEO)).await
    }

    /// Questions whose video made it to disk.
    pub async fn available_questions(&self, session: &InterviewSession) -> Vec<InterviewQuestion> {
        let mut available = Vec::new();
        for question in &session.questions {
            if let Some(path) = &question.video_path {
                if utils::file_exists(path).await {
                    available.push(question.clone());
                }
            }
        }
        available
    }

    /// Stores a browser recording sent as a data URL (`data:...;base64,<payload>`).
    pub async fn save_recording(&self, feedback_id: &str, video_data: &str) -> Result<PathBuf, InterviewError> {
        self.session(feedback_id).await?;

        let payload = video_data
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or(video_data)
            .trim();
        if payload.is_empty() {
            return Err(InterviewError::InvalidRecording("empty video payload".to_string()));
        }

        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| InterviewError::InvalidRecording(e.to_string()))?;

        let path = self
            .settings
            .upload_dir
            .join(format!("recorded_{}.mp4", feedback_id));
        utils::write_bytes_safe(&path, &bytes).await?;

        self.sessions.set_recording(feedback_id, path.clone()).await;
        info!("Video saved at: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Starts the background feedback task for a session. Returns false if
    /// one was already started for this `feedback_id`.
    pub async fn start_feedback(&self, feedback_id: &str) -> Result<bool, InterviewError> {
        let session = self.session(feedback_id).await?;

        if !self.feedback_store.begin(feedback_id).await {
            info!("Feedback for {} already requested", feedback_id);
            return Ok(false);
        }

        info!("Starting background feedback processing for {}", feedback_id);
        let generator = self.feedback.clone();
        let store = self.feedback_store.clone();

        tokio::spawn(async move {
            let job_description = session.job_description.clone();
            let recording = session.recording.clone();
            let job = tokio::spawn(async move {
                match recording {
                    Some(recording) => generator.generate_feedback(&job_description, &recording).await,
                    None => NO_RECORDING_FEEDBACK.to_string(),
                }
            });

            // A panicking analysis still leaves a result behind.
            let feedback = match job.await {
                Ok(feedback) => feedback,
                Err(e) => {
                    error!("Feedback task for {} failed: {}", session.feedback_id, e);
                    FEEDBACK_ERROR.to_string()
                }
            };
            store.complete(&session.feedback_id, feedback).await;

            if let Some(secs) = store.elapsed_secs(&session.feedback_id).await {
                info!("Feedback for {} ready after {}s", session.feedback_id, secs);
            }
        });

        Ok(true)
    }

    pub async fn feedback_status(&self, feedback_id: &str) -> FeedbackStatus {
        self.feedback_store.status(feedback_id).await
    }

    pub async fn feedback_text(&self, feedback_id: &str) -> String {
        self.feedback_store
            .feedback(feedback_id)
            .await
            .unwrap_or_else(|| NO_FEEDBACK.to_string())
    }
}
