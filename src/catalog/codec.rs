// Codec normalization - raw extractor codec tokens to canonical names
//
// Extractors report codecs as profile strings ("avc1.4d401f", "mp4a.40.2",
// "av01.0.08M.08") or bare names ("vp9", "opus"). Everything downstream
// compares canonical names only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical codec label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CanonicalCodec {
    H264,
    Vp9,
    Av1,
    Hevc,
    Aac,
    Opus,
    Mp3,
    Vorbis,
    Flac,
    /// Unrecognized token, first dot segment uppercased
    Other(String),
}

/// Audio codecs in selection preference order
pub const AUDIO_PREFERENCE: [CanonicalCodec; 5] = [
    CanonicalCodec::Aac,
    CanonicalCodec::Opus,
    CanonicalCodec::Mp3,
    CanonicalCodec::Vorbis,
    CanonicalCodec::Flac,
];

static VIDEO_RULES: [(&[&str], CanonicalCodec); 4] = [
    (&["avc", "h264", "h.264"], CanonicalCodec::H264),
    (&["vp9", "vp09"], CanonicalCodec::Vp9),
    (&["av01", "av1"], CanonicalCodec::Av1),
    (&["hevc", "h265", "h.265", "hev1", "hvc1"], CanonicalCodec::Hevc),
];

static AUDIO_RULES: [(&[&str], CanonicalCodec); 5] = [
    (&["mp4a", "aac"], CanonicalCodec::Aac),
    (&["opus"], CanonicalCodec::Opus),
    (&["mp3", "mpeg"], CanonicalCodec::Mp3),
    (&["vorbis"], CanonicalCodec::Vorbis),
    (&["flac"], CanonicalCodec::Flac),
];

impl CanonicalCodec {
    /// Normalize a video codec token (`vcodec`)
    pub fn from_video(raw: &str) -> Option<Self> {
        Self::match_rules(raw, &VIDEO_RULES)
    }

    /// Normalize an audio codec token (`acodec`)
    pub fn from_audio(raw: &str) -> Option<Self> {
        Self::match_rules(raw, &AUDIO_RULES)
    }

    /// Normalize a token of unknown role: video rules first, then audio
    pub fn parse(raw: &str) -> Option<Self> {
        let token = significant(raw)?;
        let lower = token.to_lowercase();
        VIDEO_RULES
            .iter()
            .chain(AUDIO_RULES.iter())
            .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
            .map(|(_, codec)| codec.clone())
            .or_else(|| Some(Self::fallback(token)))
    }

    fn match_rules(raw: &str, rules: &[(&[&str], CanonicalCodec)]) -> Option<Self> {
        let token = significant(raw)?;
        let lower = token.to_lowercase();

        for (needles, codec) in rules {
            if needles.iter().any(|n| lower.contains(n)) {
                return Some(codec.clone());
            }
        }

        Some(Self::fallback(token))
    }

    fn fallback(token: &str) -> Self {
        let head = token.split('.').next().unwrap_or(token);
        Self::Other(head.to_uppercase())
    }

    /// Look up a canonical label ("H.264", "Opus", ...)
    pub fn from_label(label: &str) -> Self {
        match label {
            "H.264" => Self::H264,
            "VP9" => Self::Vp9,
            "AV1" => Self::Av1,
            "HEVC" => Self::Hevc,
            "AAC" => Self::Aac,
            "Opus" => Self::Opus,
            "MP3" => Self::Mp3,
            "Vorbis" => Self::Vorbis,
            "FLAC" => Self::Flac,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::H264 => "H.264",
            Self::Vp9 => "VP9",
            Self::Av1 => "AV1",
            Self::Hevc => "HEVC",
            Self::Aac => "AAC",
            Self::Opus => "Opus",
            Self::Mp3 => "MP3",
            Self::Vorbis => "Vorbis",
            Self::Flac => "FLAC",
            Self::Other(label) => label.as_str(),
        }
    }
}

/// Trimmed token, or None for empty / "none"
fn significant(raw: &str) -> Option<&str> {
    let token = raw.trim();
    if token.is_empty() || token.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(token)
    }
}

impl fmt::Display for CanonicalCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<CanonicalCodec> for String {
    fn from(codec: CanonicalCodec) -> Self {
        codec.label().to_string()
    }
}

impl From<String> for CanonicalCodec {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}
