// src/utils.rs
use anyhow::{Context, Result};
use std::path::Path;

/// Ensure directory exists
pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Write bytes, creating parent directories as needed
pub async fn write_bytes_safe(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent).await?;
    }

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Remove a file, ignoring a file that is already gone
pub async fn remove_file_if_exists(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove file: {}", path.display())),
    }
}

/// Check if a regular file exists at `path`
pub async fn file_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Normalize a free-form form value for use in prompts and logs
pub fn normalize_complexity(complexity: &str) -> String {
    complexity.trim().to_lowercase()
}
