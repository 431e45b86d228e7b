// src/generation/gemini.rs
use super::{GenerationError, TextGenerator, VideoAnalyzer};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const VIDEO_MIME_TYPE: &str = "video/mp4";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: FileData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    mime_type: &'a str,
    file_uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiFile {
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: GeminiFile,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    poll_interval: Duration,
    analysis_timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_API_URL.to_string(),
            model,
            poll_interval: Duration::from_secs(10),
            analysis_timeout: Duration::from_secs(1200),
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

    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(
        &self,
        parts: Vec<RequestPart<'_>>,
        timeout: Option<Duration>,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let mut request = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = check_status(request.send().await?).await?;
        let generated: GenerateContentResponse = response.json().await?;

        generated.text().ok_or(GenerationError::EmptyContent)
    }

    pub async fn upload_video(&self, video_path: &Path) -> Result<GeminiFile, GenerationError> {
        let bytes = tokio::fs::read(video_path)
            .await
            .map_err(|source| GenerationError::Io {
                path: video_path.display().to_string(),
                source,
            })?;

        info!("Uploading file: {} ({} bytes)", video_path.display(), bytes.len());

        let response = self
            .client
            .post(format!("{}/upload/v1beta/files", self.base_url))
            .query(&[("key", &self.api_key)])
            .header("X-Goog-Upload-Protocol", "raw")
            .header("Content-Type", VIDEO_MIME_TYPE)
            .body(bytes)
            .send()
            .await?;

        let uploaded: UploadResponse = check_status(response).await?.json().await?;
        info!("Upload completed: {}", uploaded.file.uri);
        Ok(uploaded.file)
    }

    pub async fn get_file(&self, name: &str) -> Result<GeminiFile, GenerationError> {
        let response = self
            .client
            .get(format!("{}/v1beta/{}", self.base_url, name))
            .query(&[("key", &self.api_key)])
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    /// Polls until the uploaded file leaves the `PROCESSING` state.
    pub async fn wait_until_active(&self, mut file: GeminiFile) -> Result<GeminiFile, GenerationError> {
        while file.state == "PROCESSING" {
            debug!("File {} still processing", file.name);
            tokio::time::sleep(self.poll_interval).await;
            file = self.get_file(&file.name).await?;
        }

        if file.state == "FAILED" {
            return Err(GenerationError::ProcessingFailed(file.name));
        }
        Ok(file)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GenerationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    error!("Gemini API error {}: {}", status, message);

    Err(GenerationError::Api {
        status: status.as_u16(),
        message,
    })
}

#[rocket::async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        self.generate_content(vec![RequestPart::Text { text: prompt }], None)
            .await
    }
}

#[rocket::async_trait]
impl VideoAnalyzer for GeminiClient {
    async fn analyze_video(&self, video_path: &Path, prompt: &str) -> Result<String, GenerationError> {
        let uploaded = self.upload_video(video_path).await?;
        let file = self.wait_until_active(uploaded).await?;

        info!("Requesting feedback for {}", file.name);
        let mime_type = file.mime_type.as_deref().unwrap_or(VIDEO_MIME_TYPE);
        let parts = vec![
            RequestPart::File {
                file_data: FileData {
                    mime_type,
                    file_uri: &file.uri,
                },
            },
            RequestPart::Text { text: prompt },
        ];

        self.generate_content(parts, Some(self.analysis_timeout)).await
    }
}
