// Format classifier - partitions raw formats by delivery style
//
// HLS is tested first and wins over codec fields: an m3u8 variant with both
// codecs set is still a playlist, not a progressive file.

use super::models::RawFormat;

/// Delivery class of a single format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Hls,
    /// Video + audio in one stream
    Progressive,
    /// Video without audio (DASH)
    VideoOnly,
    AudioOnly,
    /// Neither codec present
    Unplayable,
}

impl FormatKind {
    pub fn of(format: &RawFormat) -> Self {
        if is_hls(format) {
            return Self::Hls;
        }

        match (format.has_video(), format.has_audio()) {
            (true, true) => Self::Progressive,
            (true, false) => Self::VideoOnly,
            (false, true) => Self::AudioOnly,
            (false, false) => Self::Unplayable,
        }
    }
}

/// Whether a format is an HLS playlist
pub fn is_hls(format: &RawFormat) -> bool {
    let url = format.url.as_deref().unwrap_or("").to_lowercase();
    if url.contains(".m3u8") || url.contains("/manifest/") || url.contains("index.m3u8") {
        return true;
    }

    let protocol = format.protocol.as_deref().unwrap_or("").trim().to_lowercase();
    if matches!(protocol.as_str(), "m3u8" | "m3u8_native" | "hls") {
        return true;
    }

    format
        .ext
        .as_deref()
        .map_or(false, |ext| ext.trim().eq_ignore_ascii_case("m3u8"))
}

/// Formats partitioned by kind, borrowing from the caller's list
#[derive(Debug, Default, Clone)]
pub struct ClassifiedFormats<'a> {
    /// Progressive and video-only, in input order
    pub video: Vec<&'a RawFormat>,
    pub progressive: Vec<&'a RawFormat>,
    pub video_only: Vec<&'a RawFormat>,
    pub audio_only: Vec<&'a RawFormat>,
    pub hls: Vec<&'a RawFormat>,
}

impl<'a> ClassifiedFormats<'a> {
    /// Partition formats, dropping those without a URL
    pub fn classify(formats: &'a [RawFormat]) -> Self {
        let mut classified = Self::default();
        let mut dropped = 0usize;

        for format in formats {
            if format.playable_url().is_none() {
                dropped += 1;
                continue;
            }

            match FormatKind::of(format) {
                FormatKind::Hls => classified.hls.push(format),
                FormatKind::Progressive => {
                    classified.video.push(format);
                    classified.progressive.push(format);
                }
                FormatKind::VideoOnly => {
                    classified.video.push(format);
                    classified.video_only.push(format);
                }
                FormatKind::AudioOnly => classified.audio_only.push(format),
                FormatKind::Unplayable => dropped += 1,
            }
        }

        tracing::debug!(
            progressive = classified.progressive.len(),
            video_only = classified.video_only.len(),
            audio_only = classified.audio_only.len(),
            hls = classified.hls.len(),
            dropped,
            "classified formats"
        );

        classified
    }

    pub fn is_empty(&self) -> bool {
        self.video.is_empty()
            && self.audio_only.is_empty()
            && self.hls.is_empty()
    }
}
