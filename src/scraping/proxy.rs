// src/scraping/proxy.rs
use super::ScrapeError;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

const SCRAPFLY_API_URL: &str = "https://api.scrapfly.io";
const SCRAPE_ENDPOINT: &str = "/scrape";
const DEFAULT_TIMEOUT_SECS: u64 = 150;

/// Per-request proxy settings: target page, exit country, anti-bot bypass and
/// extra headers forwarded to the target site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub url: String,
    pub country: Option<String>,
    pub asp: bool,
    pub headers: Vec<(String, String)>,
}

impl ScrapeConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            country: None,
            asp: false,
            headers: Vec::new(),
        }
    }

    pub fn with_country(mut self, country: &str) -> Self {
        self.country = Some(country.to_string());
        self
    }

    pub fn with_asp(mut self, asp: bool) -> Self {
        self.asp = asp;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Fetches raw page content on our behalf.
#[rocket::async_trait]
pub trait ScrapeProxy: Send + Sync {
    async fn scrape(&self, config: &ScrapeConfig) -> Result<String, ScrapeError>;
}

#[derive(Debug, Deserialize)]
struct ScrapflyResponse {
    result: ScrapflyResult,
}

#[derive(Debug, Deserialize)]
struct ScrapflyResult {
    #[serde(default)]
    content: String,
    #[serde(default)]
    status_code: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct ScrapflyError {
    message: String,
}

pub struct ScrapflyClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ScrapflyClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: SCRAPFLY_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn query_params(&self, config: &ScrapeConfig) -> Vec<(String, String)> {
        let mut params = vec![
            ("key".to_string(), self.api_key.clone()),
            ("url".to_string(), config.url.clone()),
        ];

        if let Some(country) = &config.country {
            params.push(("country".to_string(), country.clone()));
        }
        if config.asp {
            params.push(("asp".to_string(), "true".to_string()));
        }
        for (name, value) in &config.headers {
            params.push((format!("headers[{}]", name.to_lowercase()), value.clone()));
        }

        params
    }
}

#[rocket::async_trait]
impl ScrapeProxy for ScrapflyClient {
    async fn scrape(&self, config: &ScrapeConfig) -> Result<String, ScrapeError> {
        let url = format!("{}{}", self.base_url, SCRAPE_ENDPOINT);
        debug!("Requesting {} through scraping proxy", config.url);

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(config))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        scrapfly_result(status, &body).inspect_err(|e| {
            if let ScrapeError::Proxy { status, message } = e {
                error!("Scraping proxy error {} for {}: {}", status, config.url, message);
            }
        })
    }
}

/// Maps a proxy reply to page content. A non-2xx reply carries the proxy's
/// error `message`; a target status of 400 or above fails the scrape.
fn scrapfly_result(status: u16, body: &str) -> Result<String, ScrapeError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ScrapflyError>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| body.to_string());
        return Err(ScrapeError::Proxy { status, message });
    }

    let reply: ScrapflyResponse = serde_json::from_str(body)?;
    match reply.result.status_code {
        Some(code) if code >= 400 => Err(ScrapeError::Target(code)),
        _ => Ok(reply.result.content),
    }
}
