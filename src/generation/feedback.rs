// src/generation/feedback.rs
use super::{prompts, VideoAnalyzer};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

pub const FEEDBACK_ERROR: &str =
    "There was an error when requesting interview feedback. Please try again later.";

#[derive(Clone)]
pub struct FeedbackGenerator {
    analyzer: Arc<dyn VideoAnalyzer>,
}

impl FeedbackGenerator {
    pub fn new(analyzer: Arc<dyn VideoAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Feedback text for a recorded interview. Any failure along the way
    /// (upload, processing, timeout) yields [`FEEDBACK_ERROR`].
    pub async fn generate_feedback(&self, job_description: &str, video_path: &Path) -> String {
        let prompt = prompts::feedback_prompt(job_description);

        match self.analyzer.analyze_video(video_path, &prompt).await {
            Ok(feedback) => {
                info!("Feedback received for {} ({} chars)", video_path.display(), feedback.len());
                feedback
            }
            Err(e) => {
                error!("Error generating feedback: {}", e);
                FEEDBACK_ERROR.to_string()
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CannedAnalyzer;
    use super::*;

    #[tokio::test]
    async fn test_feedback_passthrough() {
        let generator = FeedbackGenerator::new(Arc::new(CannedAnalyzer(Some("Good eye contact.".to_string()))));
        let feedback = generator
            .generate_feedback("Nurse", Path::new("uploads/recorded.mp4"))
            .await;
        assert_eq!(feedback, "Good eye contact.");
    }

    #[tokio::test]
    async fn test_processing_failure_becomes_placeholder() {
        let generator = FeedbackGenerator::new(Arc::new(CannedAnalyzer(None)));
        let feedback = generator
            .generate_feedback("Nurse", Path::new("uploads/recorded.mp4"))
            .await;
        assert_eq!(feedback, FEEDBACK_ERROR);
    }
}
