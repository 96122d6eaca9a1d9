// Error types for the catalog collaborators
//
// Selection itself never fails; these cover the layers around it
// (extraction tool, config loading, wrapper URL resolution).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Machine-readable error code returned to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnsupportedPlatform,
    InvalidUrl,
    FetchFailed,
    Timeout,
    RateLimited,
    AgeRestricted,
    PrivateContent,
    DeletedContent,
    LoginRequired,
    GeoRestricted,
    NoMediaFound,
    ExtractionFailed,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform => "UNSUPPORTED_PLATFORM",
            Self::InvalidUrl => "INVALID_URL",
            Self::FetchFailed => "FETCH_FAILED",
            Self::Timeout => "TIMEOUT",
            Self::RateLimited => "RATE_LIMITED",
            Self::AgeRestricted => "AGE_RESTRICTED",
            Self::PrivateContent => "PRIVATE_CONTENT",
            Self::DeletedContent => "DELETED_CONTENT",
            Self::LoginRequired => "LOGIN_REQUIRED",
            Self::GeoRestricted => "GEO_RESTRICTED",
            Self::NoMediaFound => "NO_MEDIA_FOUND",
            Self::ExtractionFailed => "EXTRACTION_FAILED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Extraction tool missing from the system
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Extraction tool could not be run
    #[error("execution error: {0}")]
    ExecutionError(String),

    #[error("timed out after {0}s")]
    Timeout(u64),

    /// Extractor output was not valid JSON
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Extractor ran and reported a failure
    #[error("{message}")]
    Extraction { code: ErrorCode, message: String },

    #[error("no playable media found")]
    NoMediaFound,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Wrapper URL could not be followed
    #[error("failed to resolve {url}: {message}")]
    Resolve { url: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ToolNotFound(_)
            | Self::ExecutionError(_)
            | Self::InvalidConfig(_)
            | Self::Io(_) => ErrorCode::InternalError,
            Self::Timeout(_) => ErrorCode::Timeout,
            Self::Parse(_) => ErrorCode::ExtractionFailed,
            Self::Extraction { code, .. } => *code,
            Self::NoMediaFound => ErrorCode::NoMediaFound,
            Self::Resolve { .. } => ErrorCode::FetchFailed,
        }
    }

    /// Client-facing error envelope
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.code(), self.to_string())
    }
}

/// `{"success": false, "error": {"code", "message"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::NoMediaFound).unwrap();
        assert_eq!(json, "\"NO_MEDIA_FOUND\"");
        assert_eq!(ErrorCode::GeoRestricted.to_string(), "GEO_RESTRICTED");
    }

    #[test]
    fn test_error_envelope() {
        let err = CatalogError::Extraction {
            code: ErrorCode::PrivateContent,
            message: "Private video".to_string(),
        };
        let value = serde_json::to_value(err.to_response()).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "PRIVATE_CONTENT");
        assert_eq!(value["error"]["message"], "Private video");
    }

    #[test]
    fn test_parse_error_maps_to_extraction_failed() {
        let err: CatalogError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), ErrorCode::ExtractionFailed);
    }
}
