// src/interview/session.rs
use crate::avatar::Persona;
use crate::generation::InterviewQuestion;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Everything one browser needs between requests, keyed by `feedback_id`.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewSession {
    pub feedback_id: String,
    pub job_description: String,
    pub intro_script: String,
    pub questions: Vec<InterviewQuestion>,
    pub persona: Persona,
    pub recording: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new(
        job_description: String,
        intro_script: String,
        questions: Vec<InterviewQuestion>,
        persona: Persona,
    ) -> Self {
        Self {
            feedback_id: uuid::Uuid::new_v4().to_string(),
            job_description,
            intro_script,
            questions,
            persona,
            recording: None,
            created_at: Utc::now(),
        }
    }
}

/// In-process session table. Entries live until the process exits.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, InterviewSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: InterviewSession) {
        self.sessions
            .write()
            .await
            .insert(session.feedback_id.clone(), session);
    }

    pub async fn get(&self, feedback_id: &str) -> Option<InterviewSession> {
        self.sessions.read().await.get(feedback_id).cloned()
    }

    /// Returns false when the session is unknown.
    pub async fn set_recording(&self, feedback_id: &str, recording: PathBuf) -> bool {
        match self.sessions.write().await.get_mut(feedback_id) {
            Some(session) => {
                session.recording = Some(recording);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sessions_get_unique_ids() {
        let a = InterviewSession::new("d".into(), "i".into(), vec![], Persona::Matt);
        let b = InterviewSession::new("d".into(), "i".into(), vec![], Persona::Matt);
        assert_ne!(a.feedback_id, b.feedback_id);
    }

    #[tokio::test]
    async fn test_set_recording() {
        let store = SessionStore::new();
        let session = InterviewSession::new("d".into(), "i".into(), vec![], Persona::Sophia);
        let id = session.feedback_id.clone();
        store.insert(session).await;

        assert!(store.set_recording(&id, PathBuf::from("uploads/r.mp4")).await);
        assert!(!store.set_recording("missing", PathBuf::from("x")).await);
        assert_eq!(
            store.get(&id).await.unwrap().recording,
            Some(PathBuf::from("uploads/r.mp4"))
        );
        assert_eq!(store.len().await, 1);
    }
}
