// src/avatar/did.rs
use super::{AvatarError, Persona, SpeechRenderer};
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

const DID_API_URL: &str = "https://api.d-id.com";
const CLIPS_ENDPOINT: &str = "/clips";
const BACKGROUND_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/2/22/Large_meeting_room_%28Unsplash%29.jpg";
const VOICE_STYLE: &str = "Cheerful";

#[derive(Debug, Serialize)]
struct ClipRequest<'a> {
    script: Script<'a>,
    presenter_id: &'a str,
    background: Background<'a>,
}

#[derive(Debug, Serialize)]
struct Script<'a> {
    #[serde(rename = "type")]
    script_type: &'a str,
    input: &'a str,
    provider: Provider<'a>,
}

#[derive(Debug, Serialize)]
struct Provider<'a> {
    #[serde(rename = "type")]
    provider_type: &'a str,
    voice_id: &'a str,
    voice_config: VoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
struct VoiceConfig<'a> {
    style: &'a str,
}

#[derive(Debug, Serialize)]
struct Background<'a> {
    source_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClipCreated {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClipStatus {
    status: Option<String>,
    result_url: Option<String>,
    error: Option<serde_json::Value>,
}

impl<'a> ClipRequest<'a> {
    fn new(text: &'a str, persona: Persona) -> Self {
        Self {
            script: Script {
                script_type: "text",
                input: text,
                provider: Provider {
                    provider_type: "microsoft",
                    voice_id: persona.voice_id(),
                    voice_config: VoiceConfig { style: VOICE_STYLE },
                },
            },
            presenter_id: persona.presenter_id(),
            background: Background {
                source_url: BACKGROUND_URL,
            },
        }
    }
}

/// Reads one status poll. `Ok(None)` means the clip is still rendering.
fn clip_outcome(clip_id: &str, status: u16, body: &str) -> Result<Option<String>, AvatarError> {
    if status != StatusCode::OK.as_u16() {
        return Err(AvatarError::Status {
            id: clip_id.to_string(),
            status,
            message: body.to_string(),
        });
    }

    let clip: ClipStatus = serde_json::from_str(body)?;
    match clip.status.as_deref() {
        Some("done") => clip
            .result_url
            .map(Some)
            .ok_or_else(|| AvatarError::MissingResultUrl(clip_id.to_string())),
        Some("error") => Err(AvatarError::ClipFailed {
            id: clip_id.to_string(),
            message: clip.error.map(|e| e.to_string()).unwrap_or_default(),
        }),
        other => {
            debug!("Clip {} status: {:?}", clip_id, other);
            Ok(None)
        }
    }
}

/// D-ID clips client: submit, poll until terminal, download.
pub struct DidClient {
    client: Client,
    auth_header: String,
    base_url: String,
    output_dir: PathBuf,
    poll_interval: Duration,
}

impl DidClient {
    pub fn new(api_key: &str, output_dir: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            auth_header: format!("Basic {}", STANDARD.encode(format!("{}:", api_key))),
            base_url: DID_API_URL.to_string(),
            output_dir,
            poll_interval: Duration::from_secs(5),
        })
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Validates the persona up front, then renders. Remote failures are
    /// logged and swallowed: callers check whether the file exists.
    pub async fn render_speech(&self, text: &str, output_name: &str, persona_name: &str) -> Result<(), AvatarError> {
        let persona = Persona::from_name(persona_name)?;

        if let Err(e) = self.render(text, output_name, persona).await {
            error!("Failed to render {} as {}: {}", output_name, persona, e);
        }
        Ok(())
    }

    async fn create_clip(&self, text: &str, persona: Persona) -> Result<String, AvatarError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, CLIPS_ENDPOINT))
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .json(&ClipRequest::new(text, persona))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let message = response.text().await.unwrap_or_default();
            return Err(AvatarError::Create {
                status: status.as_u16(),
                message,
            });
        }

        let created: ClipCreated = response.json().await?;
        created.id.ok_or(AvatarError::MissingClipId)
    }

    async fn wait_for_result(&self, clip_id: &str) -> Result<String, AvatarError> {
        let url = format!("{}{}/{}", self.base_url, CLIPS_ENDPOINT, clip_id);

        loop {
            tokio::time::sleep(self.poll_interval).await;

            let response = self
                .client
                .get(&url)
                .header("Authorization", &self.auth_header)
                .header("Accept", "application/json")
                .send()
                .await?;

            let status = response.status().as_u16();
            let body = response.text().await?;
            if let Some(result_url) = clip_outcome(clip_id, status, &body)? {
                return Ok(result_url);
            }
        }
    }

    async fn download(&self, result_url: &str, output_name: &str) -> Result<PathBuf, AvatarError> {
        let response = self.client.get(result_url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(AvatarError::Download(response.status().as_u16()));
        }
        let bytes = response.bytes().await?;

        let video_path = self.output_dir.join(output_name);
        let io_error = |source| AvatarError::Io {
            path: video_path.display().to_string(),
            source,
        };
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(io_error)?;
        tokio::fs::write(&video_path, &bytes).await.map_err(io_error)?;

        Ok(video_path)
    }
}

#[rocket::async_trait]
impl SpeechRenderer for DidClient {
    async fn render(&self, text: &str, output_name: &str, persona: Persona) -> Result<PathBuf, AvatarError> {
        let clip_id = self.create_clip(text, persona).await?;
        info!("Clip {} created for {}", clip_id, output_name);

        let result_url = self.wait_for_result(&clip_id).await?;
        let video_path = self.download(&result_url, output_name).await?;

        info!("Video downloaded and saved as {}", video_path.display());
        Ok(video_path)
    }
}
