// Height-bucket selector - one video per target height
//
// Formats are bucketed by exact height. Each target, in config order, claims
// the nearest unclaimed bucket within tolerance; within a bucket the best
// candidate has audio first, then the preferred codec.

use std::collections::BTreeMap;

use super::candidate::Candidate;
use crate::catalog::config::SelectionConfig;
use crate::catalog::models::{RawFormat, Source, SourceFormat};

/// Pick at most one video source per configured target height
pub fn select_by_height(formats: &[&RawFormat], config: &SelectionConfig) -> Vec<Source> {
    let mut buckets: BTreeMap<u32, Vec<Candidate>> = BTreeMap::new();
    for candidate in Candidate::collect(formats, config) {
        if candidate.height == 0 {
            continue;
        }
        buckets.entry(candidate.height).or_default().push(candidate);
    }

    let mut selected = Vec::new();

    for &target in &config.target_heights {
        let Some(height) = nearest_bucket(&buckets, target, config) else {
            tracing::debug!(target, "no bucket within tolerance");
            continue;
        };

        // Each bucket is consumed at most once
        let Some(mut candidates) = buckets.remove(&height) else {
            continue;
        };
        candidates.sort_by_key(|c| (c.audio_score, c.codec_rank));

        if let Some(best) = candidates.into_iter().next() {
            let delivery = if best.audio_score == 0 {
                SourceFormat::Progressive
            } else {
                SourceFormat::Dash
            };
            tracing::debug!(target, height, codec = ?best.codec, "bucket selected");
            selected.push(best.into_source(delivery));
        }
    }

    selected
}

/// Closest remaining bucket height to `target`; ties go to the taller bucket
fn nearest_bucket(
    buckets: &BTreeMap<u32, Vec<Candidate>>,
    target: u32,
    config: &SelectionConfig,
) -> Option<u32> {
    buckets
        .keys()
        .copied()
        .filter(|h| config.within_tolerance(*h, target))
        .min_by(|a, b| {
            a.abs_diff(target)
                .cmp(&b.abs_diff(target))
                .then_with(|| b.cmp(a))
        })
}
