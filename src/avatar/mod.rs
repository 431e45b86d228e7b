// src/avatar/mod.rs
//! Talking-avatar videos for the interviewer persona.

pub mod did;

pub use did::DidClient;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("Invalid avatar chosen: {0}")]
    UnknownPersona(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON from avatar service: {0}")]
    Json(#[from] serde_json::Error),

    #[error("clip creation failed (status {status}): {message}")]
    Create { status: u16, message: String },

    #[error("clip creation response had no id")]
    MissingClipId,

    #[error("status check for clip {id} failed (status {status}): {message}")]
    Status { id: String, status: u16, message: String },

    #[error("clip {id} failed: {message}")]
    ClipFailed { id: String, message: String },

    #[error("clip {0} finished without a result URL")]
    MissingResultUrl(String),

    #[error("video download failed with status {0}")]
    Download(u16),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Sophia,
    Diana,
    Matt,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Sophia, Persona::Diana, Persona::Matt];

    /// Case-insensitive; the first persona whose key appears anywhere in
    /// `name` wins, so "Dr. Sophia" picks Sophia.
    pub fn from_name(name: &str) -> Result<Self, AvatarError> {
        let lowered = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|persona| lowered.contains(persona.key()))
            .ok_or_else(|| AvatarError::UnknownPersona(name.to_string()))
    }

    pub fn key(&self) -> &'static str {
        match self {
            Persona::Sophia => "sophia",
            Persona::Diana => "diana",
            Persona::Matt => "matt",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::Sophia => "Sophia",
            Persona::Diana => "Diana",
            Persona::Matt => "Matt",
        }
    }

    pub fn presenter_id(&self) -> &'static str {
        match self {
            Persona::Sophia => "sophia-ndjDZ_Osqg",
            Persona::Diana => "diana-tfTP6K9S9u",
            Persona::Matt => "matt-PEvEohn_gk",
        }
    }

    pub fn voice_id(&self) -> &'static str {
        match self {
            Persona::Sophia => "en-US-ElizabethNeural",
            Persona::Diana => "en-US-CoraNeural",
            Persona::Matt => "en-US-TonyNeural",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Persona {
    type Err = AvatarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Renders `text` as a spoken-avatar video named `output_name` and returns
/// where the file was written.
#[rocket::async_trait]
pub trait SpeechRenderer: Send + Sync {
    async fn render(&self, text: &str, output_name: &str, persona: Persona) -> Result<PathBuf, AvatarError>;
}
