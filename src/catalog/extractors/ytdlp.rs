// yt-dlp InfoExtractor - runs the native binary with --dump-json

use async_trait::async_trait;
use std::process::Command as StdCommand;

use super::diagnostics::extraction_error;
use super::traits::{parse_info_json, ExtractorConfig, InfoExtractor};
use crate::catalog::errors::{CatalogError, Result};
use crate::catalog::models::AssetInfo;
use crate::catalog::utils::run_output_with_timeout;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// CLI-based info extractor using the yt-dlp binary
pub struct YtDlpExtractor {
    ytdlp_path: String,
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            ytdlp_path: Self::find_ytdlp(),
            config,
        }
    }

    /// Use a specific binary instead of searching for one
    pub fn with_binary(mut self, path: impl Into<String>) -> Self {
        self.ytdlp_path = path.into();
        self
    }

    pub fn binary(&self) -> &str {
        &self.ytdlp_path
    }

    /// Find yt-dlp binary
    fn find_ytdlp() -> String {
        let common_paths = [
            "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
            "/usr/local/bin/yt-dlp",
            "/usr/bin/yt-dlp",
        ];

        for path in common_paths {
            if std::path::Path::new(path).exists() {
                return path.to_string();
            }
        }

        "yt-dlp".to_string()
    }

    /// Build command arguments
    fn build_args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.config.socket_timeout_seconds.to_string(),
            "--retries".to_string(),
            "2".to_string(),
            "--user-agent".to_string(),
            USER_AGENT.to_string(),
        ];

        if let Some(path) = &self.config.cookies_path {
            args.push("--cookies".to_string());
            args.push(path.clone());
        }

        if let Some(proxy) = &self.config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        // Keep URLs starting with '-' from being read as options
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

#[async_trait]
impl InfoExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn is_available(&self) -> bool {
        StdCommand::new(&self.ytdlp_path)
            .arg("--version")
            .output()
            .map_or(false, |out| out.status.success())
    }

    async fn extract(&self, url: &str) -> Result<AssetInfo> {
        let args = self.build_args(url);
        tracing::debug!(binary = %self.ytdlp_path, url, "running extractor");

        let output = run_output_with_timeout(&self.ytdlp_path, &args, self.config.timeout_seconds)
            .await
            .map_err(|e| match e {
                CatalogError::ToolNotFound(_) => {
                    CatalogError::ToolNotFound(format!("yt-dlp binary not found at {}", self.ytdlp_path))
                }
                other => other,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let err = extraction_error(&stderr);
            tracing::warn!(url, code = %err.code(), "extractor failed: {}", err);
            return Err(err);
        }

        let info = parse_info_json(&output.stdout)?;
        tracing::info!(
            url,
            id = %info.id_string(),
            formats = info.formats.len(),
            "extracted asset info"
        );
        Ok(info)
    }
}
