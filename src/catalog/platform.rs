// Platform profiles
//
// The platform arrives as metadata and is mapped here, once, to a pipeline
// kind plus a SelectionConfig. Nothing downstream branches on the platform.

use std::fmt;
use std::str::FromStr;

use super::config::SelectionConfig;
use super::format_selector::PipelineKind;
use super::remap::{vertical_video_labels, vertical_video_targets};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    YouTube,
    BiliBili,
    SoundCloud,
    Eporner,
    Rule34Video,
    /// Anything without a dedicated profile
    Other(String),
}

impl Platform {
    pub fn as_str(&self) -> &str {
        match self {
            Self::YouTube => "youtube",
            Self::BiliBili => "bilibili",
            Self::SoundCloud => "soundcloud",
            Self::Eporner => "eporner",
            Self::Rule34Video => "rule34video",
            Self::Other(name) => name.as_str(),
        }
    }

    pub fn profile(&self) -> PlatformProfile {
        PlatformProfile::for_platform(self)
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    /// Never fails: unknown names become `Other`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Ok(match name.as_str() {
            "youtube" | "yt" => Self::YouTube,
            "bilibili" | "bili" => Self::BiliBili,
            "soundcloud" => Self::SoundCloud,
            "eporner" => Self::Eporner,
            "rule34video" => Self::Rule34Video,
            _ => Self::Other(name),
        })
    }
}

impl From<&str> for Platform {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(platform) => platform,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything selection needs to know about a platform
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformProfile {
    pub pipeline: PipelineKind,
    pub config: SelectionConfig,
    /// Follow wrapper links to their final media URL after selection
    pub resolve_wrappers: bool,
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self {
            pipeline: PipelineKind::Generic,
            config: SelectionConfig::default(),
            resolve_wrappers: false,
        }
    }
}

impl PlatformProfile {
    pub fn for_platform(platform: &Platform) -> Self {
        match platform {
            Platform::YouTube => Self {
                pipeline: PipelineKind::ProgressivePriority,
                ..Self::default()
            },
            Platform::BiliBili => Self {
                config: SelectionConfig::default()
                    .with_target_heights(vertical_video_targets())
                    .with_height_tolerance(0.15)
                    .with_quality_labels(vertical_video_labels()),
                ..Self::default()
            },
            Platform::SoundCloud => Self {
                pipeline: PipelineKind::AudioOnly,
                ..Self::default()
            },
            Platform::Eporner | Platform::Rule34Video => Self {
                resolve_wrappers: true,
                ..Self::default()
            },
            Platform::Other(_) => Self::default(),
        }
    }

    /// Replace the selection config, keeping pipeline and wrapper handling
    pub fn with_config(mut self, config: SelectionConfig) -> Self {
        self.config = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Platform::from("YouTube"), Platform::YouTube);
        assert_eq!(Platform::from(" BiliBili "), Platform::BiliBili);
        assert_eq!(Platform::from("Vimeo"), Platform::Other("vimeo".to_string()));
        assert_eq!(Platform::from("vimeo").to_string(), "vimeo");
    }

    #[test]
    fn test_profiles() {
        assert_eq!(
            Platform::YouTube.profile().pipeline,
            PipelineKind::ProgressivePriority
        );
        assert_eq!(Platform::SoundCloud.profile().pipeline, PipelineKind::AudioOnly);
        assert!(Platform::Eporner.profile().resolve_wrappers);
        assert!(!Platform::YouTube.profile().resolve_wrappers);

        let bili = Platform::BiliBili.profile();
        assert_eq!(bili.pipeline, PipelineKind::Generic);
        assert_eq!(bili.config.height_tolerance, 0.15);
        assert_eq!(bili.config.target_heights[1], 1024);
        assert_eq!(bili.config.quality_labels.get(&852).map(String::as_str), Some("480P"));
        assert!(bili.config.validate().is_ok());
    }

    #[test]
    fn test_unknown_platform_gets_defaults() {
        assert_eq!(Platform::from("twitter").profile(), PlatformProfile::default());
    }
}
