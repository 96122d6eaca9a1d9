// Selection configuration
//
// Every knob the selectors read lives here and is passed explicitly into each
// call. Nothing in the engine keeps process-wide defaults.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::codec::CanonicalCodec;
use super::errors::{CatalogError, Result};

/// Codec priority for unlisted or missing codecs
pub const UNRANKED_CODEC_PRIORITY: u32 = 99;

/// Immutable selection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
    /// Target heights in descending priority order
    pub target_heights: Vec<u32>,
    /// Fractional tolerance (0.1 = 10%)
    pub height_tolerance: f64,
    /// Lower value = preferred
    pub codec_priority: HashMap<CanonicalCodec, u32>,
    /// Preferred audio bitrate in kbps
    pub target_audio_bitrate: u32,
    /// Highest height served from progressive formats
    pub max_progressive_height: u32,
    /// Surface HLS variants as a separate list
    pub include_hls: bool,
    /// Height -> label overrides applied after selection
    pub quality_labels: BTreeMap<u32, String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            target_heights: vec![1080, 720, 480, 360],
            height_tolerance: 0.1,
            codec_priority: default_codec_priority(),
            target_audio_bitrate: 128,
            max_progressive_height: 720,
            include_hls: true,
            quality_labels: BTreeMap::new(),
        }
    }
}

/// H.264 > VP9 > AV1 > HEVC (broadest playback support first)
pub fn default_codec_priority() -> HashMap<CanonicalCodec, u32> {
    HashMap::from([
        (CanonicalCodec::H264, 0),
        (CanonicalCodec::Vp9, 1),
        (CanonicalCodec::Av1, 2),
        (CanonicalCodec::Hevc, 3),
    ])
}

impl SelectionConfig {
    /// Parse a JSON config; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_heights.is_empty() {
            return Err(CatalogError::InvalidConfig(
                "targetHeights must not be empty".to_string(),
            ));
        }
        if self.target_heights.contains(&0) {
            return Err(CatalogError::InvalidConfig(
                "targetHeights must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.height_tolerance) {
            return Err(CatalogError::InvalidConfig(format!(
                "heightTolerance must be in [0, 1), got {}",
                self.height_tolerance
            )));
        }
        if self.max_progressive_height == 0 {
            return Err(CatalogError::InvalidConfig(
                "maxProgressiveHeight must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Rank of a codec; unknown or absent codecs sort last
    pub fn codec_rank(&self, codec: Option<&CanonicalCodec>) -> u32 {
        codec
            .and_then(|c| self.codec_priority.get(c).copied())
            .unwrap_or(UNRANKED_CODEC_PRIORITY)
    }

    /// Inclusive tolerance test: |height - target| <= target * tolerance
    pub fn within_tolerance(&self, height: u32, target: u32) -> bool {
        let delta = (f64::from(height) - f64::from(target)).abs();
        delta <= f64::from(target) * self.height_tolerance
    }

    /// Whether `height` falls within tolerance of any target
    pub fn near_any_target(&self, height: u32) -> bool {
        self.target_heights
            .iter()
            .any(|t| self.within_tolerance(height, *t))
    }

    /// Closest target within tolerance; ties go to the larger target
    pub fn closest_target<I>(&self, height: u32, targets: I) -> Option<u32>
    where
        I: IntoIterator<Item = u32>,
    {
        targets
            .into_iter()
            .filter(|t| self.within_tolerance(height, *t))
            .min_by(|a, b| {
                height
                    .abs_diff(*a)
                    .cmp(&height.abs_diff(*b))
                    .then_with(|| b.cmp(a))
            })
    }

    pub fn with_target_heights(mut self, heights: Vec<u32>) -> Self {
        self.target_heights = heights;
        self
    }

    pub fn with_height_tolerance(mut self, tolerance: f64) -> Self {
        self.height_tolerance = tolerance;
        self
    }

    pub fn with_codec_priority(mut self, priority: HashMap<CanonicalCodec, u32>) -> Self {
        self.codec_priority = priority;
        self
    }

    pub fn with_target_audio_bitrate(mut self, kbps: u32) -> Self {
        self.target_audio_bitrate = kbps;
        self
    }

    pub fn with_max_progressive_height(mut self, height: u32) -> Self {
        self.max_progressive_height = height;
        self
    }

    pub fn with_include_hls(mut self, enabled: bool) -> Self {
        self.include_hls = enabled;
        self
    }

    pub fn with_quality_labels(mut self, labels: BTreeMap<u32, String>) -> Self {
        self.quality_labels = labels;
        self
    }
}
