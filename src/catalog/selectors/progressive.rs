// Progressive-priority selector
//
// Muxed files are served first since they play without a merge step. DASH
// video-only formats only fill targets that no progressive format already
// covers. HLS variants go to a separate list with the same coverage rule.

use std::collections::BTreeSet;

use super::candidate::Candidate;
use crate::catalog::classifier::ClassifiedFormats;
use crate::catalog::config::SelectionConfig;
use crate::catalog::models::{Source, SourceFormat};

/// Output of the progressive-priority pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressiveSelection {
    /// Progressive (height descending) followed by DASH
    pub videos: Vec<Source>,
    pub hls: Vec<Source>,
}

/// Target heights each consumed at most once
struct Coverage<'c> {
    config: &'c SelectionConfig,
    covered: BTreeSet<u32>,
}

impl<'c> Coverage<'c> {
    fn new(config: &'c SelectionConfig) -> Self {
        Self {
            config,
            covered: BTreeSet::new(),
        }
    }

    /// Claim the closest uncovered target within tolerance of `height`
    fn claim(&mut self, height: u32) -> Option<u32> {
        let uncovered = self
            .config
            .target_heights
            .iter()
            .copied()
            .filter(|t| !self.covered.contains(t));
        let target = self.config.closest_target(height, uncovered)?;
        self.covered.insert(target);
        Some(target)
    }
}

pub fn select_progressive_first(
    classified: &ClassifiedFormats,
    config: &SelectionConfig,
) -> ProgressiveSelection {
    let mut coverage = Coverage::new(config);
    let mut seen_heights = BTreeSet::new();
    let mut videos = Vec::new();

    let mut progressive = Candidate::collect(&classified.progressive, config);
    Candidate::sort_by_height_desc(&mut progressive);

    for candidate in progressive {
        if candidate.height > config.max_progressive_height {
            tracing::debug!(
                height = candidate.height,
                max = config.max_progressive_height,
                "progressive above ceiling"
            );
            continue;
        }
        if !seen_heights.insert(candidate.height) {
            continue;
        }
        if coverage.claim(candidate.height).is_none() && config.near_any_target(candidate.height) {
            tracing::debug!(height = candidate.height, "progressive target already covered");
            continue;
        }
        videos.push(candidate.into_source(SourceFormat::Progressive));
    }

    let mut dash = Candidate::collect(&classified.video_only, config);
    Candidate::sort_by_height_desc(&mut dash);

    for candidate in dash {
        if candidate.height == 0 || seen_heights.contains(&candidate.height) {
            continue;
        }
        let Some(target) = coverage.claim(candidate.height) else {
            continue;
        };
        tracing::debug!(target, height = candidate.height, "dash fills target");
        seen_heights.insert(candidate.height);
        videos.push(candidate.into_source(SourceFormat::Dash));
    }

    let hls = if config.include_hls {
        select_hls(classified, config)
    } else {
        Vec::new()
    };

    ProgressiveSelection { videos, hls }
}

/// One HLS variant per target height, tallest first
fn select_hls(classified: &ClassifiedFormats, config: &SelectionConfig) -> Vec<Source> {
    let mut coverage = Coverage::new(config);
    let mut seen_heights = BTreeSet::new();

    let mut variants = Candidate::collect(&classified.hls, config);
    Candidate::sort_by_height_desc(&mut variants);

    let mut selected = Vec::new();
    for candidate in variants {
        if candidate.height == 0 || !seen_heights.insert(candidate.height) {
            continue;
        }
        if coverage.claim(candidate.height).is_none() {
            continue;
        }
        selected.push(candidate.into_source(SourceFormat::Hls));
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::RawFormat;

    fn make_video_format(height: u32, vcodec: &str, acodec: &str) -> RawFormat {
        RawFormat {
            url: Some(format!("https://cdn.example/{}-{}-{}.mp4", height, vcodec, acodec)),
            vcodec: Some(vcodec.to_string()),
            acodec: Some(acodec.to_string()),
            height: Some(height),
            width: Some(height * 16 / 9),
            ext: Some("mp4".to_string()),
            ..RawFormat::default()
        }
    }

    fn make_hls_format(height: u32) -> RawFormat {
        RawFormat {
            url: Some(format!("https://cdn.example/hls/{}/index.m3u8", height)),
            protocol: Some("m3u8_native".to_string()),
            height: Some(height),
            width: Some(height * 16 / 9),
            ..RawFormat::default()
        }
    }

    fn run(formats: &[RawFormat], config: &SelectionConfig) -> ProgressiveSelection {
        select_progressive_first(&ClassifiedFormats::classify(formats), config)
    }

    #[test]
    fn test_progressive_shadows_dash_at_same_target() {
        let formats = vec![
            make_video_format(720, "avc1", "none"),
            make_video_format(720, "avc1", "mp4a"),
        ];

        let selection = run(&formats, &SelectionConfig::default());
        assert_eq!(selection.videos.len(), 1);
        assert_eq!(selection.videos[0].format, SourceFormat::Progressive);
        assert!(selection.videos[0].has_audio);
    }

    #[test]
    fn test_ceiling_pushes_tall_formats_to_dash() {
        let formats = vec![
            make_video_format(1080, "avc1", "mp4a"),
            make_video_format(1080, "avc1", "none"),
            make_video_format(720, "avc1", "mp4a"),
        ];

        let selection = run(&formats, &SelectionConfig::default());
        let kinds: Vec<_> = selection
            .videos
            .iter()
            .map(|s| (s.height(), s.format))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (Some(720), SourceFormat::Progressive),
                (Some(1080), SourceFormat::Dash),
            ]
        );
    }

    #[test]
    fn test_dash_within_tolerance_of_progressive_is_skipped() {
        let formats = vec![
            make_video_format(720, "avc1", "mp4a"),
            make_video_format(700, "vp9", "none"),
            make_video_format(480, "vp9", "none"),
        ];

        let selection = run(&formats, &SelectionConfig::default());
        let heights: Vec<_> = selection.videos.iter().filter_map(Source::height).collect();
        assert_eq!(heights, vec![720, 480]);
    }

    #[test]
    fn test_one_progressive_per_target() {
        let formats = vec![
            make_video_format(720, "avc1", "mp4a"),
            make_video_format(700, "avc1", "mp4a"),
            make_video_format(680, "avc1", "mp4a"),
        ];

        let selection = run(&formats, &SelectionConfig::default());
        let heights: Vec<_> = selection.videos.iter().filter_map(Source::height).collect();
        assert_eq!(heights, vec![720]);
    }

    #[test]
    fn test_progressive_off_target_is_kept() {
        let formats = vec![
            make_video_format(720, "avc1", "mp4a"),
            make_video_format(144, "avc1", "mp4a"),
        ];

        let selection = run(&formats, &SelectionConfig::default());
        let heights: Vec<_> = selection.videos.iter().filter_map(Source::height).collect();
        assert_eq!(heights, vec![720, 144]);
    }

    #[test]
    fn test_dash_prefers_codec_at_same_height() {
        let formats = vec![
            make_video_format(1080, "vp09.00.40.08", "none"),
            make_video_format(1080, "avc1.640028", "none"),
        ];

        let selection = run(&formats, &SelectionConfig::default());
        assert_eq!(selection.videos.len(), 1);
        assert_eq!(selection.videos[0].codec.as_ref().map(|c| c.label()), Some("H.264"));
    }

    #[test]
    fn test_dash_outside_every_target_is_dropped() {
        let formats = vec![make_video_format(240, "avc1", "none")];
        assert!(run(&formats, &SelectionConfig::default()).videos.is_empty());
    }

    #[test]
    fn test_hls_deduplicated_per_target() {
        let formats = vec![
            make_hls_format(720),
            make_hls_format(1080),
            make_hls_format(710),
            make_hls_format(144),
        ];

        let selection = run(&formats, &SelectionConfig::default());
        let heights: Vec<_> = selection.hls.iter().filter_map(Source::height).collect();
        assert_eq!(heights, vec![1080, 720]);
        assert!(selection.hls.iter().all(|s| s.needs_proxy && !s.needs_merge));
        assert!(selection.hls.iter().all(|s| s.mime == "video/mp4"));
    }

    #[test]
    fn test_hls_disabled() {
        let config = SelectionConfig::default().with_include_hls(false);
        assert!(run(&[make_hls_format(720)], &config).hls.is_empty());
    }
}
