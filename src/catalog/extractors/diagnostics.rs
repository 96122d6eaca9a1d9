// Error diagnostics - maps extractor failure text to an ErrorCode
//
// Patterns are checked in order and the first hit wins, so broader patterns
// (404, 403) sit at the end behind the more specific ones.

use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::errors::{CatalogError, ErrorCode};

lazy_static! {
    static ref ERROR_PATTERNS: Vec<(Regex, ErrorCode)> = [
        (r"age[_-]?restricted|18\+|mature|adult.only", ErrorCode::AgeRestricted),
        (r"private|members.only", ErrorCode::PrivateContent),
        (
            r"deleted|removed|taken.down|no.longer|unavailable|not.available",
            ErrorCode::DeletedContent,
        ),
        (r"login|sign.in|authenticate|session", ErrorCode::LoginRequired),
        (r"geo[_-]?blocked|country|region|not.available.in.your", ErrorCode::GeoRestricted),
        (r"rate.limit|too.many|429|throttl", ErrorCode::RateLimited),
        (r"timeout|timed?.out", ErrorCode::Timeout),
        (r"404|not.found|does.not.exist", ErrorCode::DeletedContent),
        (r"403|forbidden|access.denied", ErrorCode::PrivateContent),
    ]
    .into_iter()
    .filter_map(|(pattern, code)| {
        Regex::new(&format!("(?i){}", pattern))
            .ok()
            .map(|re| (re, code))
    })
    .collect();
}

/// Classify an error message; anything unrecognised is EXTRACTION_FAILED
pub fn diagnose_error(message: &str) -> ErrorCode {
    if message.trim().is_empty() {
        return ErrorCode::ExtractionFailed;
    }

    ERROR_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(message))
        .map(|(_, code)| *code)
        .unwrap_or(ErrorCode::ExtractionFailed)
}

/// First line that looks like the actual error, without yt-dlp's prefix
pub fn error_summary(stderr: &str) -> String {
    let line = stderr
        .lines()
        .map(str::trim)
        .find(|l| l.to_lowercase().starts_with("error:"))
        .or_else(|| stderr.lines().map(str::trim).find(|l| !l.is_empty()))
        .unwrap_or("extraction failed");

    line.strip_prefix("ERROR:")
        .or_else(|| line.strip_prefix("error:"))
        .unwrap_or(line)
        .trim()
        .to_string()
}

/// Build an Extraction error from the tool's stderr
pub fn extraction_error(stderr: &str) -> CatalogError {
    CatalogError::Extraction {
        code: diagnose_error(stderr),
        message: error_summary(stderr),
    }
}
