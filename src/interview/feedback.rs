// src/interview/feedback.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FeedbackStatus {
    Processing,
    Done { feedback: String },
}

#[derive(Debug, Clone)]
struct FeedbackRecord {
    feedback: Option<String>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Feedback results keyed by `feedback_id`. Not evicted.
#[derive(Clone, Default)]
pub struct FeedbackStore {
    records: Arc<RwLock<HashMap<String, FeedbackRecord>>>,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `feedback_id` for processing. False if it was already claimed,
    /// in which case no second task should be started.
    pub async fn begin(&self, feedback_id: &str) -> bool {
        let mut records = self.records.write().await;
        if records.contains_key(feedback_id) {
            return false;
        }
        records.insert(
            feedback_id.to_string(),
            FeedbackRecord {
                feedback: None,
                started_at: Utc::now(),
                completed_at: None,
            },
        );
        true
    }

    pub async fn complete(&self, feedback_id: &str, feedback: String) {
        let mut records = self.records.write().await;
        let record = records
            .entry(feedback_id.to_string())
            .or_insert_with(|| FeedbackRecord {
                feedback: None,
                started_at: Utc::now(),
                completed_at: None,
            });
        record.feedback = Some(feedback);
        record.completed_at = Some(Utc::now());
    }

    /// Unknown ids read as still processing.
    pub async fn status(&self, feedback_id: &str) -> FeedbackStatus {
        match self
            .records
            .read()
            .await
            .get(feedback_id)
            .and_then(|r| r.feedback.clone())
        {
            Some(feedback) => FeedbackStatus::Done { feedback },
            None => FeedbackStatus::Processing,
        }
    }

    pub async fn feedback(&self, feedback_id: &str) -> Option<String> {
        match self.status(feedback_id).await {
            FeedbackStatus::Done { feedback } => Some(feedback),
            FeedbackStatus::Processing => None,
        }
    }

    /// Seconds spent producing the feedback, once done.
    pub async fn elapsed_secs(&self, feedback_id: &str) -> Option<i64> {
        let records = self.records.read().await;
        let record = records.get(feedback_id)?;
        Some((record.completed_at? - record.started_at).num_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_id_is_processing() {
        let store = FeedbackStore::new();
        assert_eq!(store.status("nope").await, FeedbackStatus::Processing);
        assert_eq!(store.feedback("nope").await, None);
    }

    #[tokio::test]
    async fn test_begin_claims_once() {
        let store = FeedbackStore::new();
        assert!(store.begin("abc").await);
        assert!(!store.begin("abc").await);
        assert_eq!(store.status("abc").await, FeedbackStatus::Processing);
    }

    #[tokio::test]
    async fn test_complete_makes_feedback_available() {
        let store = FeedbackStore::new();
        store.begin("abc").await;
        store.complete("abc", "Speak slower.".to_string()).await;

        assert_eq!(
            store.status("abc").await,
            FeedbackStatus::Done {
                feedback: "Speak slower.".to_string()
            }
        );
        assert!(store.elapsed_secs("abc").await.is_some());
    }

    #[test]
    fn test_status_serialization() {
        let done = serde_json::to_value(FeedbackStatus::Done {
            feedback: "ok".to_string(),
        })
        .unwrap();
        assert_eq!(done, serde_json::json!({"status": "done", "feedback": "ok"}));

        let processing = serde_json::to_value(FeedbackStatus::Processing).unwrap();
        assert_eq!(processing, serde_json::json!({"status": "processing"}));
    }
}
