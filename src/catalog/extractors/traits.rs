// InfoExtractor trait and extractor configuration

use async_trait::async_trait;

use crate::catalog::errors::{CatalogError, ErrorCode, Result};
use crate::catalog::models::AssetInfo;

/// Configuration for info extraction
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Path to cookies.txt file
    pub cookies_path: Option<String>,
    /// Whole-run timeout in seconds
    pub timeout_seconds: u64,
    /// Network socket timeout passed to the tool
    pub socket_timeout_seconds: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            cookies_path: None,
            timeout_seconds: 60,
            socket_timeout_seconds: 30,
        }
    }
}

impl ExtractorConfig {
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_cookies_path(mut self, path: Option<String>) -> Self {
        self.cookies_path = path;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_socket_timeout(mut self, seconds: u32) -> Self {
        self.socket_timeout_seconds = seconds;
        self
    }
}

/// Trait for info extractors
#[async_trait]
pub trait InfoExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Check if this extractor is available
    fn is_available(&self) -> bool;

    /// Extract asset metadata with its format list
    async fn extract(&self, url: &str) -> Result<AssetInfo>;
}

/// Parse a `--dump-json` document
pub fn parse_info_json(json: &[u8]) -> Result<AssetInfo> {
    let text = String::from_utf8_lossy(json);
    let text = text.trim();
    if text.is_empty() {
        return Err(CatalogError::Extraction {
            code: ErrorCode::ExtractionFailed,
            message: "extractor produced no output".to_string(),
        });
    }

    match serde_json::from_str(text) {
        Ok(info) => Ok(info),
        // Playlists print one document per line; the first one is enough
        Err(err) => match text.lines().next() {
            Some(first) if first.len() < text.len() => Ok(serde_json::from_str(first)?),
            _ => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let info = parse_info_json(
            br#"{"id": 42, "title": "Clip", "formats": [{"url": "https://a/v.mp4", "height": "720"}], "extra": true}"#,
        )
        .unwrap();

        assert_eq!(info.id_string(), "42");
        assert_eq!(info.formats.len(), 1);
        assert_eq!(info.formats[0].height, Some(720));
    }

    #[test]
    fn test_parse_takes_first_line_of_multi_document_output() {
        let out = b"{\"id\": \"a\", \"formats\": []}\n{\"id\": \"b\", \"formats\": []}\n";
        assert_eq!(parse_info_json(out).unwrap().id_string(), "a");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_info_json(b"  "),
            Err(CatalogError::Extraction { .. })
        ));
        assert!(matches!(parse_info_json(b"{oops"), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_config_builders() {
        let config = ExtractorConfig::default()
            .with_proxy(Some("socks5h://127.0.0.1:1080".to_string()))
            .with_timeout(10);
        assert_eq!(config.timeout_seconds, 10);
        assert!(config.proxy.is_some());
        assert_eq!(config.socket_timeout_seconds, 30);
    }
}
