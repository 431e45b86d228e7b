// src/interview/mod.rs
//! Per-interview state and the flow that ties resolution, generation,
//! rendering and feedback together.

pub mod description;
pub mod feedback;
pub mod service;
pub mod session;

pub use description::{truncate_description, MAX_DESCRIPTION_CHARS};
pub use feedback::{FeedbackStatus, FeedbackStore};
pub use service::{InterviewError, InterviewRequest, InterviewService, InterviewSettings};
pub use session::{InterviewSession, SessionStore};
