// Common data models for the catalog
//
// RawFormat / AssetInfo are what an extractor hands us (yt-dlp JSON shape).
// Source / Item / ExtractionResult are what the player client consumes, so
// their serialized field names are part of the public contract.

use serde::{Deserialize, Deserializer, Serialize};

use super::codec::CanonicalCodec;

/// One downloadable variant as reported by the extraction tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFormat {
    /// Direct media URL (formats without one are dropped)
    pub url: Option<String>,
    /// Video codec (avc1, vp9, av01, none)
    pub vcodec: Option<String>,
    /// Audio codec (mp4a, opus, none)
    pub acodec: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub height: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub width: Option<u32>,
    pub fps: Option<f64>,
    /// File extension (mp4, webm, m4a)
    pub ext: Option<String>,
    /// Audio bitrate in kbps
    pub abr: Option<f64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub filesize: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub filesize_approx: Option<u64>,
    /// Format note (e.g., "720p", "medium")
    pub format_note: Option<String>,
    /// Format ID (e.g., "137", "140")
    pub format_id: Option<String>,
    /// Delivery protocol (https, m3u8_native, dash)
    pub protocol: Option<String>,
}

impl RawFormat {
    /// URL if present and non-empty
    pub fn playable_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Whether the format carries a video stream
    pub fn has_video(&self) -> bool {
        is_present_codec(self.vcodec.as_deref())
    }

    /// Whether the format carries an audio stream
    pub fn has_audio(&self) -> bool {
        is_present_codec(self.acodec.as_deref())
    }

    /// Get effective file size (exact or approximate)
    pub fn effective_size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx).filter(|s| *s > 0)
    }

    /// Height with 0 standing in for "unknown"
    pub fn height_or_zero(&self) -> u32 {
        self.height.unwrap_or(0)
    }

    /// Audio bitrate with 0 standing in for "unknown"
    pub fn abr_or_zero(&self) -> f64 {
        self.abr.filter(|b| b.is_finite()).unwrap_or(0.0)
    }

    /// "WxH" when both dimensions are known
    pub fn resolution(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(format!("{}x{}", w, h)),
            _ => None,
        }
    }

    pub fn video_codec(&self) -> Option<CanonicalCodec> {
        self.vcodec.as_deref().and_then(CanonicalCodec::from_video)
    }

    pub fn audio_codec(&self) -> Option<CanonicalCodec> {
        self.acodec.as_deref().and_then(CanonicalCodec::from_audio)
    }

    fn non_empty(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn note(&self) -> Option<&str> {
        Self::non_empty(&self.format_note)
    }

    pub fn id(&self) -> Option<&str> {
        Self::non_empty(&self.format_id)
    }

    pub fn extension(&self) -> Option<&str> {
        Self::non_empty(&self.ext)
    }
}

/// yt-dlp reports missing streams as the literal string "none"
fn is_present_codec(codec: Option<&str>) -> bool {
    codec.map_or(false, |c| {
        let c = c.trim();
        !c.is_empty() && !c.eq_ignore_ascii_case("none")
    })
}

/// Asset metadata plus its raw format list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetInfo {
    /// Extractor id (string on most sites, numeric on a few)
    pub id: Option<serde_json::Value>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    pub artist: Option<String>,
    pub uploader_id: Option<String>,
    pub uploader_url: Option<String>,
    pub channel_url: Option<String>,
    pub thumbnail: Option<String>,
    /// Top-level media URL (single-format extractors)
    pub url: Option<String>,
    pub ext: Option<String>,
    pub webpage_url: Option<String>,
    pub description: Option<String>,
    pub upload_date: Option<String>,
    pub duration: Option<f64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub view_count: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub like_count: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub comment_count: Option<u64>,
    pub formats: Vec<RawFormat>,
    /// Playlist entries
    pub entries: Option<Vec<AssetInfo>>,
}

impl AssetInfo {
    /// Unwrap a playlist to its first entry carrying formats
    pub fn primary(&self) -> &AssetInfo {
        if !self.formats.is_empty() {
            return self;
        }

        self.entries
            .as_deref()
            .and_then(|entries| entries.iter().find(|e| !e.formats.is_empty()))
            .unwrap_or(self)
    }

    /// Format list, treating a bare top-level URL as a single format
    pub fn effective_formats(&self) -> Vec<RawFormat> {
        if !self.formats.is_empty() {
            return self.formats.clone();
        }

        match self.url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => vec![RawFormat {
                url: Some(url.to_string()),
                ext: self.ext.clone(),
                ..RawFormat::default()
            }],
            None => Vec::new(),
        }
    }

    pub fn author(&self) -> Option<&str> {
        [&self.uploader, &self.channel, &self.artist, &self.uploader_id]
            .into_iter()
            .find_map(|v| v.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn author_url(&self) -> Option<&str> {
        self.uploader_url.as_deref().or(self.channel_url.as_deref())
    }

    pub fn id_string(&self) -> String {
        match &self.id {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// Delivery style of a Source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Muxed video+audio, playable as-is
    Progressive,
    /// Separate stream, may need merging
    Dash,
    /// Segmented playlist, needs the rewriting proxy
    Hls,
}

/// Playable source as delivered to the player client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Display label (e.g., "720p", "720p 60fps", "128kbps")
    pub quality: String,
    pub url: String,
    /// "WIDTHxHEIGHT"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    pub mime: String,
    pub extension: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<CanonicalCodec>,
    /// Audio bitrate in kbps (audio sources only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub has_audio: bool,
    pub needs_merge: bool,
    pub format: SourceFormat,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub needs_proxy: bool,
}

impl Source {
    /// Height parsed from the resolution string
    pub fn height(&self) -> Option<u32> {
        let (_, h) = self.resolution.as_deref()?.split_once('x')?;
        h.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Video,
    Audio,
}

/// Group of sources sharing a track role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: ItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Set on the HLS variant item only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<SourceFormat>,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
}

/// Successful extraction envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub success: bool,
    pub platform: String,
    pub content_type: ItemType,
    pub title: Option<String>,
    pub author: Option<String>,
    pub author_url: Option<String>,
    pub id: String,
    pub description: Option<String>,
    pub upload_date: Option<String>,
    pub duration: Option<f64>,
    pub stats: Stats,
    pub items: Vec<Item>,
}

impl ExtractionResult {
    /// Every source across every item, in item order
    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.items.iter().flat_map(|item| item.sources.iter())
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    // Extractors emit sizes and counts as ints, floats or null
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u64(deserializer)?.and_then(|v| u32::try_from(v).ok()))
}
