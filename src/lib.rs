// src/lib.rs
pub mod avatar;
pub mod cli;
pub mod config;
pub mod generation;
pub mod interview;
pub mod link_resolver;
pub mod scraping;
pub mod utils;
pub mod web;

pub use config::AppConfig;
pub use interview::{InterviewService, InterviewSettings};
pub use web::start_web_server;

use anyhow::{Context, Result};
use avatar::DidClient;
use generation::{FeedbackGenerator, GeminiClient, InterviewGenerator};
use link_resolver::LinkResolver;
use scraping::ScrapflyClient;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

pub const DEFAULT_LOG_FILTER: &str = "interview_coach=info,rocket::server=off";

/// Human-readable logs on stdout, plus JSON lines in `LOG_FILE` when set.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json_layer = match std::env::var("LOG_FILE") {
        Ok(path) if !path.trim().is_empty() => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        _ => None,
    };

    Registry::default()
        .with(filter)
        .with(fmt::layer())
        .with(json_layer)
        .try_init()
        .context("Failed to initialize tracing")?;

    Ok(())
}

/// Wires the remote clients into an `InterviewService`.
pub fn build_service(config: &AppConfig) -> Result<InterviewService> {
    let env = &config.environment;
    let credentials = &config.credentials;

    let proxy = ScrapflyClient::new(credentials.scrapfly_api_key.clone())?;
    let gemini = Arc::new(
        GeminiClient::new(credentials.gemini_api_key.clone(), env.gemini_model.clone())?
            .with_poll_interval(env.feedback_poll_interval())
            .with_analysis_timeout(env.feedback_timeout()),
    );
    let did = DidClient::new(&credentials.did_api_key, env.avatar_path.clone())?
        .with_poll_interval(env.render_poll_interval());

    Ok(InterviewService::new(
        LinkResolver::new(Arc::new(proxy)),
        InterviewGenerator::new(gemini.clone(), env.avatar_path.clone()),
        Arc::new(did),
        FeedbackGenerator::new(gemini),
        InterviewSettings {
            avatar_dir: env.avatar_path.clone(),
            upload_dir: env.upload_path.clone(),
            max_description_chars: env.max_description_chars,
        },
    ))
}

/// Loads configuration, prepares directories and serves until shutdown.
pub async fn run_server() -> Result<()> {
    let config = AppConfig::load()?;
    config.environment.ensure_directories().await?;

    info!("Environment: {}", config.environment_name);
    info!("Gemini model: {}", config.environment.gemini_model);
    info!("Uploads: {}", config.environment.upload_path.display());
    info!("Videos: {}", config.environment.avatar_path.display());

    let service = build_service(&config)?;
    start_web_server(service, config.environment.avatar_path.clone(), config.port).await
}
