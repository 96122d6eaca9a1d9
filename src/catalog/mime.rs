// MIME <-> extension mapping

use serde::{Deserialize, Serialize};

/// Which side of the table to consult for ambiguous extensions (webm)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }

    /// Extension assumed when the extractor reports none
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Audio => "m4a",
        }
    }
}

const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("flv", "video/x-flv"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
];

const AUDIO_TYPES: &[(&str, &str)] = &[
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("ogg", "audio/ogg"),
    ("opus", "audio/opus"),
    ("webm", "audio/webm"),
    ("wav", "audio/wav"),
    ("flac", "audio/flac"),
];

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// MIME type for an extension, falling back to "{kind}/{ext}"
pub fn mime_for_extension(ext: &str, kind: MediaKind) -> String {
    let ext = ext.trim().trim_start_matches('.').to_lowercase();
    if ext.is_empty() {
        return match kind {
            MediaKind::Video => "video/mp4".to_string(),
            MediaKind::Audio => "audio/mpeg".to_string(),
        };
    }

    let primary = match kind {
        MediaKind::Video => VIDEO_TYPES,
        MediaKind::Audio => AUDIO_TYPES,
    };

    primary
        .iter()
        .chain(IMAGE_TYPES)
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| mime.to_string())
        .unwrap_or_else(|| format!("{}/{}", kind.as_str(), ext))
}

/// Extension for a MIME type; parameters after ';' are ignored
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
    match essence.as_str() {
        "audio/mp3" | "audio/mpeg" => Some("mp3"),
        "audio/x-m4a" | "audio/mp4" => Some("m4a"),
        "image/jpeg" => Some("jpg"),
        other => VIDEO_TYPES
            .iter()
            .chain(AUDIO_TYPES)
            .chain(IMAGE_TYPES)
            .find(|(_, m)| *m == other)
            .map(|(e, _)| *e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_for_extension("mp4", MediaKind::Video), "video/mp4");
        assert_eq!(mime_for_extension(".MP3", MediaKind::Audio), "audio/mpeg");
        assert_eq!(mime_for_extension("m4a", MediaKind::Audio), "audio/mp4");
    }

    #[test]
    fn test_webm_depends_on_kind() {
        assert_eq!(mime_for_extension("webm", MediaKind::Video), "video/webm");
        assert_eq!(mime_for_extension("webm", MediaKind::Audio), "audio/webm");
    }

    #[test]
    fn test_unknown_and_empty_extensions() {
        assert_eq!(mime_for_extension("3gp", MediaKind::Video), "video/3gp");
        assert_eq!(mime_for_extension("", MediaKind::Video), "video/mp4");
        assert_eq!(mime_for_extension("", MediaKind::Audio), "audio/mpeg");
    }

    #[test]
    fn test_extension_lookup_ignores_parameters() {
        assert_eq!(extension_for_mime("video/mp4; codecs=\"avc1\""), Some("mp4"));
        assert_eq!(extension_for_mime("audio/x-m4a"), Some("m4a"));
        assert_eq!(extension_for_mime("application/json"), None);
    }
}
