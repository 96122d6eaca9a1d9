// Audio selector - one track per preferred codec
//
// For each codec in preference order, keep the track whose bitrate is nearest
// the target. If none of the preferred codecs show up, fall back to the
// highest-bitrate track of whatever else is available.

use super::candidate::audio_source;
use crate::catalog::codec::AUDIO_PREFERENCE;
use crate::catalog::models::{RawFormat, Source};

pub fn select_audio(formats: &[&RawFormat], target_kbps: u32) -> Vec<Source> {
    let target = f64::from(target_kbps);
    let mut selected = Vec::new();

    for codec in AUDIO_PREFERENCE.iter() {
        // min_by keeps the first of equal elements
        let best = formats
            .iter()
            .filter(|f| f.audio_codec().as_ref() == Some(codec))
            .min_by(|a, b| {
                let da = (a.abr_or_zero() - target).abs();
                let db = (b.abr_or_zero() - target).abs();
                da.total_cmp(&db)
            });

        if let Some(format) = best {
            tracing::debug!(codec = %codec, abr = format.abr_or_zero(), "audio selected");
            selected.push(audio_source(format));
        }
    }

    if selected.is_empty() {
        if let Some(format) = highest_bitrate(formats) {
            tracing::debug!(abr = format.abr_or_zero(), "audio fallback to unranked codec");
            selected.push(audio_source(format));
        }
    }

    selected
}

/// First of the highest-bitrate formats
fn highest_bitrate<'a>(formats: &[&'a RawFormat]) -> Option<&'a RawFormat> {
    let mut best: Option<&'a RawFormat> = None;
    for &format in formats {
        match best {
            Some(current) if format.abr_or_zero() <= current.abr_or_zero() => {}
            _ => best = Some(format),
        }
    }
    best
}
