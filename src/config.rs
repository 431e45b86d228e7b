// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_PORT: u16 = 8000;
pub const CONFIG_FILE: &str = "config.yaml";

/// Per-environment settings from `config.yaml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub upload_path: PathBuf,
    pub avatar_path: PathBuf,
    pub gemini_model: String,
    pub render_poll_secs: u64,
    pub feedback_poll_secs: u64,
    pub feedback_timeout_secs: u64,
    pub max_description_chars: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            upload_path: PathBuf::from("uploads"),
            avatar_path: PathBuf::from("static/videos"),
            gemini_model: "gemini-1.5-flash".to_string(),
            render_poll_secs: 5,
            feedback_poll_secs: 10,
            feedback_timeout_secs: 1200,
            max_description_chars: crate::interview::MAX_DESCRIPTION_CHARS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentConfig,
    #[serde(default)]
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    pub fn render_poll_interval(&self) -> Duration {
        Duration::from_secs(self.render_poll_secs)
    }

    pub fn feedback_poll_interval(&self) -> Duration {
        Duration::from_secs(self.feedback_poll_secs)
    }

    pub fn feedback_timeout(&self) -> Duration {
        Duration::from_secs(self.feedback_timeout_secs)
    }

    /// Reads the section for `environment` from `path`, or defaults when the file is absent.
    pub fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        if !path.exists() {
            info!("{} not found, using default settings", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Self {
            upload_path: resolve_path(&config.upload_path)?,
            avatar_path: resolve_path(&config.avatar_path)?,
            ..config
        })
    }

    fn parse(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    /// Ensure upload and video directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.upload_path, &self.avatar_path] {
            crate::utils::ensure_dir_exists(dir).await?;
        }
        info!("All configured directories ensured to exist");
        Ok(())
    }
}

/// API keys for the three remote services.
#[derive(Clone)]
pub struct Credentials {
    pub gemini_api_key: String,
    pub did_api_key: String,
    pub scrapfly_api_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            did_api_key: require_env("DID_API_KEY")?,
            scrapfly_api_key: require_env("SCRAPFLY_API_KEY")?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("gemini_api_key", &"<redacted>")
            .field("did_api_key", &"<redacted>")
            .field("scrapfly_api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment_name: String,
    pub environment: EnvironmentConfig,
    pub credentials: Credentials,
    pub port: u16,
}

impl AppConfig {
    /// Loads the required credentials and `config.yaml`. A missing credential
    /// aborts startup. Call [`load_env_file`] first.
    pub fn load() -> Result<Self> {
        let environment_name = get_environment();
        info!("Loading configuration for environment: {}", environment_name);

        let credentials = Credentials::from_env()?;
        let environment = EnvironmentConfig::load_from_file(Path::new(CONFIG_FILE), &environment_name)?;
        let port = parse_port(std::env::var("ROCKET_PORT").ok().as_deref())?;

        Ok(Self {
            environment_name,
            environment,
            credentials,
            port,
        })
    }
}

/// Loads `.env` from the working directory or its parents, if any. Runs before
/// tracing starts so `RUST_LOG` and `LOG_FILE` can come from the file.
pub fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Loads a specific env file. Variables already set in the process win.
pub fn load_env_from(path: &Path) -> Result<()> {
    dotenvy::from_path(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn get_environment() -> String {
    std::env::var("INTERVIEW_ENV")
        .or_else(|_| std::env::var("ENVIRONMENT"))
        .unwrap_or_else(|_| "local".to_string())
}

fn parse_port(value: Option<&str>) -> Result<u16> {
    match value {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .with_context(|| format!("ROCKET_PORT must be a valid port number, got '{}'", raw)),
        None => Ok(DEFAULT_PORT),
    }
}

pub fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.upload_path, PathBuf::from("uploads"));
        assert_eq!(config.avatar_path, PathBuf::from("static/videos"));
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.render_poll_interval(), Duration::from_secs(5));
        assert_eq!(config.feedback_poll_interval(), Duration::from_secs(10));
        assert_eq!(config.feedback_timeout(), Duration::from_secs(1200));
        assert_eq!(config.max_description_chars, 2800);
    }

    #[test]
    fn test_parse_selects_section_and_fills_defaults() {
        let yaml = r#"
local:
  upload_path: tmp/uploads
production:
  avatar_path: /srv/videos
  gemini_model: gemini-1.5-pro
  feedback_timeout_secs: 600
"#;
        let local = EnvironmentConfig::parse(yaml, "local").unwrap();
        assert_eq!(local.upload_path, PathBuf::from("tmp/uploads"));
        assert_eq!(local.gemini_model, "gemini-1.5-flash");

        let production = EnvironmentConfig::parse(yaml, "production").unwrap();
        assert_eq!(production.avatar_path, PathBuf::from("/srv/videos"));
        assert_eq!(production.gemini_model, "gemini-1.5-pro");
        assert_eq!(production.feedback_timeout_secs, 600);
        assert_eq!(production.upload_path, PathBuf::from("uploads"));

        let other = EnvironmentConfig::parse(yaml, "staging").unwrap();
        assert_eq!(other, local);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EnvironmentConfig::load_from_file(&dir.path().join("config.yaml"), "local").unwrap();
        assert_eq!(config, EnvironmentConfig::default());
    }

    #[test]
    fn test_file_paths_made_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "local:\n  avatar_path: /var/videos\n").unwrap();

        let config = EnvironmentConfig::load_from_file(&path, "local").unwrap();
        assert_eq!(config.avatar_path, PathBuf::from("/var/videos"));
        assert!(config.upload_path.is_absolute());
        assert!(config.upload_path.ends_with("uploads"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "local: [not, a, map").unwrap();
        assert!(EnvironmentConfig::load_from_file(&path, "local").is_err());
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port(None).unwrap(), DEFAULT_PORT);
        assert_eq!(parse_port(Some("9000")).unwrap(), 9000);
        assert!(parse_port(Some("ninety")).is_err());
    }

    #[test]
    fn test_env_file_sets_logging_variables() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("coach.log");
        let env_path = dir.path().join(".env");
        std::fs::write(
            &env_path,
            format!("INTERVIEW_COACH_TEST_LOG_FILE={}\n", log_path.display()),
        )
        .unwrap();

        load_env_from(&env_path).unwrap();

        assert_eq!(
            std::env::var("INTERVIEW_COACH_TEST_LOG_FILE").unwrap(),
            log_path.display().to_string()
        );
        assert!(load_env_from(&dir.path().join("missing.env")).is_err());
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = Credentials {
            gemini_api_key: "g-secret".to_string(),
            did_api_key: "d-secret".to_string(),
            scrapfly_api_key: "s-secret".to_string(),
        };
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("secret"));
    }
}
