// Platform quality remapper
//
// Some platforms serve portrait video where the reported height is the long
// edge, so "1024p" is really a 720P stream. A height -> label table rewrites
// the quality label after selection.

use std::collections::BTreeMap;

use super::models::Source;

/// Heights served by vertical-video platforms and the label each one means
pub fn vertical_video_labels() -> BTreeMap<u32, String> {
    [
        (1080, "1080P"),
        (1024, "720P"),
        (720, "720P"),
        (852, "480P"),
        (480, "480P"),
        (640, "360P"),
        (360, "360P"),
        (426, "240P"),
        (240, "240P"),
        (256, "144P"),
        (144, "144P"),
    ]
    .into_iter()
    .map(|(h, label)| (h, label.to_string()))
    .collect()
}

/// Target heights matching `vertical_video_labels`, tallest first
pub fn vertical_video_targets() -> Vec<u32> {
    vec![1080, 1024, 852, 720, 640, 480, 426, 360, 256, 240, 144]
}

/// Rewrite quality labels for sources whose height is in the table
///
/// Returns the number of labels changed. Sources without a known height are
/// left alone.
pub fn apply_quality_labels(sources: &mut [Source], labels: &BTreeMap<u32, String>) -> usize {
    if labels.is_empty() {
        return 0;
    }

    let mut changed = 0;
    for source in sources.iter_mut() {
        let Some(label) = source.height().and_then(|h| labels.get(&h)) else {
            continue;
        };
        if source.quality != *label {
            source.quality = label.clone();
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::SourceFormat;

    fn make_source(resolution: Option<&str>, quality: &str) -> Source {
        Source {
            quality: quality.to_string(),
            url: "https://cdn.example/v.mp4".to_string(),
            resolution: resolution.map(str::to_string),
            mime: "video/mp4".to_string(),
            extension: "mp4".to_string(),
            codec: None,
            bitrate: None,
            size: None,
            has_audio: true,
            needs_merge: false,
            format: SourceFormat::Progressive,
            needs_proxy: false,
        }
    }

    #[test]
    fn test_vertical_heights_relabelled() {
        let mut sources = vec![
            make_source(Some("576x1024"), "1024p"),
            make_source(Some("480x852"), "852p"),
            make_source(Some("1920x1080"), "1080p"),
        ];

        let changed = apply_quality_labels(&mut sources, &vertical_video_labels());
        assert_eq!(changed, 3);
        let labels: Vec<_> = sources.iter().map(|s| s.quality.as_str()).collect();
        assert_eq!(labels, vec!["720P", "480P", "1080P"]);
    }

    #[test]
    fn test_unknown_height_untouched() {
        let mut sources = vec![make_source(None, "default"), make_source(Some("100x900"), "900p")];

        assert_eq!(apply_quality_labels(&mut sources, &vertical_video_labels()), 0);
        assert_eq!(sources[0].quality, "default");
        assert_eq!(sources[1].quality, "900p");
    }

    #[test]
    fn test_every_target_has_a_label() {
        let labels = vertical_video_labels();
        assert!(vertical_video_targets().iter().all(|h| labels.contains_key(h)));
    }
}
