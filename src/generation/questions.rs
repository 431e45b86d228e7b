// src/generation/questions.rs
use super::{prompts, TextGenerator};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Always the last question, exactly once.
pub const CLOSING_QUESTION: &str = "Do you have any questions for me?";

pub const INTRO_ERROR: &str =
    "There was an error generating the intro script. Please try again later.";
pub const QUESTIONS_ERROR: &str =
    "There was an error generating the question videos. Please try again later.";

pub const INTRO_VIDEO: &str = "intro.mp4";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    /// Where the avatar video for this question is (or will be) written.
    /// `None` for the error placeholder, which never gets a video.
    pub video_path: Option<PathBuf>,
}

pub fn question_video_name(index: usize) -> String {
    format!("question_video_{}.mp4", index)
}

/// Trims model output into questions: one per non-blank line, every copy of
/// the closing question removed and a single one appended.
pub fn finalize_questions(raw: &str) -> Vec<String> {
    let mut questions: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != CLOSING_QUESTION)
        .map(str::to_string)
        .collect();

    questions.push(CLOSING_QUESTION.to_string());
    questions
}

pub fn attach_videos(questions: Vec<String>, video_dir: &Path) -> Vec<InterviewQuestion> {
    questions
        .into_iter()
        .enumerate()
        .map(|(i, question)| InterviewQuestion {
            question,
            video_path: Some(video_dir.join(question_video_name(i + 1))),
        })
        .collect()
}

pub struct InterviewGenerator {
    model: Arc<dyn TextGenerator>,
    video_dir: PathBuf,
}

impl InterviewGenerator {
    pub fn new(model: Arc<dyn TextGenerator>, video_dir: PathBuf) -> Self {
        Self { model, video_dir }
    }

    pub fn video_dir(&self) -> &Path {
        &self.video_dir
    }

    pub async fn intro_script(&self, job_description: &str, num_questions: usize, persona: &str) -> String {
        let prompt = prompts::intro_prompt(job_description, num_questions, persona);

        match self.model.generate_text(&prompt).await {
            Ok(script) => script,
            Err(e) => {
                error!("Error generating intro script: {}", e);
                INTRO_ERROR.to_string()
            }
        }
    }

    /// Ordered questions ending with [`CLOSING_QUESTION`]. On failure a single
    /// placeholder question without a video is returned instead.
    pub async fn questions(
        &self,
        job_description: &str,
        num_questions: usize,
        complexity: &str,
        persona: &str,
    ) -> Vec<InterviewQuestion> {
        let prompt = prompts::questions_prompt(job_description, num_questions, complexity, persona);

        match self.model.generate_text(&prompt).await {
            Ok(raw) => {
                let questions = finalize_questions(&raw);
                info!("Generated {} interview questions", questions.len());
                attach_videos(questions, &self.video_dir)
            }
            Err(e) => {
                error!("Error generating questions: {}", e);
                vec![InterviewQuestion {
                    question: QUESTIONS_ERROR.to_string(),
                    video_path: None,
                }]
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::generation::GenerationError;
    use std::sync::Mutex;

    /// Replays canned replies in order and records the prompts it saw.
    #[derive(Default)]
    pub struct ScriptedModel {
        replies: Mutex<Vec<Result<String, ()>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn reply(self, text: &str) -> Self {
            self.replies.lock().unwrap().push(Ok(text.to_string()));
            self
        }

        pub fn fail(self) -> Self {
            self.replies.lock().unwrap().push(Err(()));
            self
        }
    }

    #[rocket::async_trait]
    impl TextGenerator for ScriptedModel {
        async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(GenerationError::EmptyContent);
            }
            replies.remove(0).map_err(|_| GenerationError::Api {
                status: 500,
                message: "scripted failure".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;

    #[test]
    fn test_closing_question_moved_to_end_once() {
        let raw = "Tell me about yourself.\n\nDo you have any questions for me?\n  Why Rust?  \nDo you have any questions for me?\n";
        let questions = finalize_questions(raw);
        assert_eq!(
            questions,
            vec!["Tell me about yourself.", "Why Rust?", CLOSING_QUESTION]
        );
    }

    #[test]
    fn test_empty_output_still_has_closing_question() {
        assert_eq!(finalize_questions("  \n \n"), vec![CLOSING_QUESTION]);
    }

    #[test]
    fn test_videos_numbered_from_one() {
        let questions = attach_videos(
            vec!["A".to_string(), "B".to_string()],
            Path::new("static/videos"),
        );
        assert_eq!(
            questions[1].video_path.as_deref(),
            Some(Path::new("static/videos/question_video_2.mp4"))
        );
    }

    #[tokio::test]
    async fn test_generator_appends_closing_question() {
        let model = Arc::new(ScriptedModel::default().reply("Q1\nDo you have any questions for me?\nQ2"));
        let generator = InterviewGenerator::new(model.clone(), PathBuf::from("videos"));

        let questions = generator.questions("Nurse", 3, "beginner", "Sophia").await;
        let texts: Vec<_> = questions.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["Q1", "Q2", CLOSING_QUESTION]);

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].starts_with("Generate a list of 2 interview questions."));
        assert!(prompts[0].contains("asked by Sophia"));
    }

    #[tokio::test]
    async fn test_failures_become_placeholders() {
        let model = Arc::new(ScriptedModel::default().fail().fail());
        let generator = InterviewGenerator::new(model, PathBuf::from("videos"));

        assert_eq!(generator.intro_script("Nurse", 3, "Diana").await, INTRO_ERROR);

        let questions = generator.questions("Nurse", 3, "beginner", "Diana").await;
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, QUESTIONS_ERROR);
        assert!(questions[0].video_path.is_none());
    }
}
