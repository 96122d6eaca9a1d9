// Working record for selection
//
// A Candidate carries the ranking keys the selectors sort on. It borrows the
// raw format and is only ever turned into a Source at the very end; it is
// never serialized.

use std::cmp::Reverse;

use crate::catalog::codec::CanonicalCodec;
use crate::catalog::config::SelectionConfig;
use crate::catalog::mime::{mime_for_extension, MediaKind};
use crate::catalog::models::{RawFormat, Source, SourceFormat};

#[derive(Debug, Clone)]
pub(crate) struct Candidate<'a> {
    pub format: &'a RawFormat,
    /// 0 when unknown
    pub height: u32,
    pub codec: Option<CanonicalCodec>,
    pub codec_rank: u32,
    /// 0 = has audio (preferred), 1 = video only
    pub audio_score: u8,
}

impl<'a> Candidate<'a> {
    pub fn new(format: &'a RawFormat, config: &SelectionConfig) -> Self {
        let codec = format.video_codec();
        let codec_rank = config.codec_rank(codec.as_ref());

        Self {
            format,
            height: format.height_or_zero(),
            codec,
            codec_rank,
            audio_score: if format.has_audio() { 0 } else { 1 },
        }
    }

    pub fn collect(formats: &[&'a RawFormat], config: &SelectionConfig) -> Vec<Self> {
        formats.iter().map(|f| Self::new(f, config)).collect()
    }

    /// Highest first, then preferred codec; stable for equal keys
    pub fn sort_by_height_desc(candidates: &mut [Self]) {
        candidates.sort_by_key(|c| (Reverse(c.height), c.codec_rank));
    }

    pub fn into_source(self, delivery: SourceFormat) -> Source {
        video_source(self.format, self.codec, delivery)
    }
}

/// Build a video Source
///
/// HLS variants are already muxed, so they always report audio and never
/// need a merge.
pub(crate) fn video_source(
    format: &RawFormat,
    codec: Option<CanonicalCodec>,
    delivery: SourceFormat,
) -> Source {
    let is_hls = delivery == SourceFormat::Hls;
    let has_audio = is_hls || format.has_audio();

    let (mime, extension) = if is_hls {
        // Served as MP4 once the proxy has stitched the segments
        ("video/mp4".to_string(), "mp4".to_string())
    } else {
        let ext = format
            .extension()
            .unwrap_or(MediaKind::Video.default_extension())
            .to_lowercase();
        (mime_for_extension(&ext, MediaKind::Video), ext)
    };

    Source {
        quality: video_quality_label(format),
        url: format.playable_url().unwrap_or_default().to_string(),
        resolution: format.resolution(),
        mime,
        extension,
        codec,
        bitrate: None,
        size: format.effective_size(),
        has_audio,
        needs_merge: !has_audio,
        format: delivery,
        needs_proxy: is_hls,
    }
}

/// Build an audio-only Source
pub(crate) fn audio_source(format: &RawFormat) -> Source {
    let ext = format
        .extension()
        .unwrap_or(MediaKind::Audio.default_extension())
        .to_lowercase();
    let abr = format.abr_or_zero();

    Source {
        quality: audio_quality_label(format),
        url: format.playable_url().unwrap_or_default().to_string(),
        resolution: None,
        mime: mime_for_extension(&ext, MediaKind::Audio),
        extension: ext,
        codec: format.audio_codec(),
        bitrate: (abr > 0.0).then(|| abr as u32),
        size: format.effective_size(),
        has_audio: true,
        needs_merge: false,
        format: SourceFormat::Dash,
        needs_proxy: false,
    }
}

/// format_note, "{height}p", format_id or "default", plus " {fps}fps" above 30
pub(crate) fn video_quality_label(format: &RawFormat) -> String {
    let mut label = match (format.note(), format.height_or_zero(), format.id()) {
        (Some(note), _, _) => note.to_string(),
        (None, h, _) if h > 0 => format!("{}p", h),
        (None, _, Some(id)) => id.to_string(),
        _ => "default".to_string(),
    };

    if let Some(fps) = format.fps.filter(|f| f.is_finite() && *f > 30.0) {
        label.push_str(&format!(" {}fps", format_fps(fps)));
    }

    label
}

/// format_note, "{bitrate}kbps", format_id or "audio"
pub(crate) fn audio_quality_label(format: &RawFormat) -> String {
    if let Some(note) = format.note() {
        return note.to_string();
    }

    let abr = format.abr_or_zero();
    if abr > 0.0 {
        return format!("{}kbps", abr as u32);
    }

    format.id().unwrap_or("audio").to_string()
}

fn format_fps(fps: f64) -> String {
    if fps.fract() == 0.0 {
        format!("{}", fps as u32)
    } else {
        format!("{}", fps)
    }
}
