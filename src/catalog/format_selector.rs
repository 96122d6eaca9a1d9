// FormatSelector - entry point of the selection engine
//
// Turns a raw format list into video, audio and HLS Source lists. Which
// pipeline runs is decided by the caller through PipelineKind; the engine
// itself never looks at platform identity.
//
// Every call is a pure function of (formats, config).

use serde::{Deserialize, Serialize};

use super::classifier::ClassifiedFormats;
use super::config::SelectionConfig;
use super::models::{RawFormat, Source};
use super::remap::apply_quality_labels;
use super::selectors::{select_audio, select_by_height, select_progressive_first};

/// Selection pipeline to run for a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    /// Height buckets over every video-capable format
    #[default]
    Generic,
    /// Progressive files first, DASH fills the gaps
    ProgressivePriority,
    /// Audio tracks only
    AudioOnly,
}

/// Source lists produced by one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub videos: Vec<Source>,
    pub audios: Vec<Source>,
    /// Empty unless the progressive-priority pipeline found HLS variants
    pub hls: Vec<Source>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty() && self.audios.is_empty() && self.hls.is_empty()
    }

    /// Whether any video source still needs a separate audio track
    pub fn needs_audio_track(&self) -> bool {
        self.videos.iter().any(|s| s.needs_merge)
    }
}

/// Format selection engine
pub struct FormatSelector;

impl FormatSelector {
    /// Run the given pipeline and apply the config's quality labels
    pub fn run(kind: PipelineKind, formats: &[RawFormat], config: &SelectionConfig) -> Selection {
        let mut selection = match kind {
            PipelineKind::Generic => {
                let (videos, audios) = Self::process(formats, config);
                Selection {
                    videos,
                    audios,
                    hls: Vec::new(),
                }
            }
            PipelineKind::ProgressivePriority => {
                let (videos, audios, hls) = Self::process_progressive(formats, config);
                Selection { videos, audios, hls }
            }
            PipelineKind::AudioOnly => Selection {
                audios: Self::process_audio_only(formats, config),
                ..Selection::default()
            },
        };

        let relabelled = apply_quality_labels(&mut selection.videos, &config.quality_labels)
            + apply_quality_labels(&mut selection.hls, &config.quality_labels);
        if relabelled > 0 {
            tracing::debug!(relabelled, "applied platform quality labels");
        }

        tracing::debug!(
            pipeline = ?kind,
            videos = selection.videos.len(),
            audios = selection.audios.len(),
            hls = selection.hls.len(),
            "selection finished"
        );

        selection
    }

    /// Generic pipeline: one video per target height plus audio tracks
    pub fn process(formats: &[RawFormat], config: &SelectionConfig) -> (Vec<Source>, Vec<Source>) {
        let classified = ClassifiedFormats::classify(formats);

        let videos = select_by_height(&classified.video, config);
        let audios = select_audio(&classified.audio_only, config.target_audio_bitrate);

        (videos, audios)
    }

    /// Progressive-priority pipeline: (videos, audios, hls)
    pub fn process_progressive(
        formats: &[RawFormat],
        config: &SelectionConfig,
    ) -> (Vec<Source>, Vec<Source>, Vec<Source>) {
        let classified = ClassifiedFormats::classify(formats);

        let selection = select_progressive_first(&classified, config);
        let audios = select_audio(&classified.audio_only, config.target_audio_bitrate);

        (selection.videos, audios, selection.hls)
    }

    /// Audio-only pipeline
    ///
    /// Progressive formats count as audio sources here since some platforms
    /// label audio streams with a video codec.
    pub fn process_audio_only(formats: &[RawFormat], config: &SelectionConfig) -> Vec<Source> {
        let classified = ClassifiedFormats::classify(formats);

        let audios = select_audio(&classified.audio_only, config.target_audio_bitrate);
        if !audios.is_empty() {
            return audios;
        }
        select_audio(&classified.progressive, config.target_audio_bitrate)
    }
}
