// Result transform - wraps selected sources into items and the envelope
//
// Item layout for video content:
//   0       video item (always; a default source stands in when nothing matched)
//   next    HLS video item, when HLS variants were selected
//   next    audio item, only when some video source needs a separate track
// Audio-only content gets a single audio item at index 0.

use super::errors::{CatalogError, Result};
use super::format_selector::{PipelineKind, Selection};
use super::mime::{mime_for_extension, MediaKind};
use super::models::{
    AssetInfo, ExtractionResult, Item, ItemType, Source, SourceFormat, Stats,
};
use super::platform::Platform;

/// Placeholder thumbnails some extractors emit instead of a URL
const THUMBNAIL_PLACEHOLDERS: &[&str] = &["nsfw", "default", "self", "spoiler", "image"];

/// Build the success envelope from an asset and its selection
pub fn build_result(
    platform: &Platform,
    pipeline: PipelineKind,
    info: &AssetInfo,
    selection: Selection,
) -> Result<ExtractionResult> {
    let thumbnail = valid_thumbnail(info.thumbnail.as_deref());

    let (content_type, items) = match pipeline {
        PipelineKind::AudioOnly => (ItemType::Audio, audio_items(info, selection, thumbnail)?),
        PipelineKind::Generic | PipelineKind::ProgressivePriority => {
            (ItemType::Video, video_items(info, selection, thumbnail)?)
        }
    };

    Ok(ExtractionResult {
        success: true,
        platform: platform.to_string(),
        content_type,
        title: info.title.clone(),
        author: info.author().map(str::to_string),
        author_url: info.author_url().map(str::to_string),
        id: info.id_string(),
        description: info.description.clone(),
        upload_date: info.upload_date.clone(),
        duration: info.duration,
        stats: Stats {
            views: info.view_count,
            likes: info.like_count,
            comments: info.comment_count,
        },
        items,
    })
}

fn video_items(
    info: &AssetInfo,
    selection: Selection,
    thumbnail: Option<String>,
) -> Result<Vec<Item>> {
    let needs_audio_track = selection.needs_audio_track();
    let Selection {
        mut videos,
        audios,
        hls,
    } = selection;

    if videos.is_empty() {
        match default_video_source(info) {
            Some(source) => videos.push(source),
            None if hls.is_empty() => return Err(CatalogError::NoMediaFound),
            None => {}
        }
    }

    let mut items = Vec::new();
    if !videos.is_empty() {
        items.push(Item {
            index: 0,
            kind: ItemType::Video,
            thumbnail: thumbnail.clone(),
            format: None,
            sources: videos,
        });
    }

    if !hls.is_empty() {
        items.push(Item {
            index: items.len(),
            kind: ItemType::Video,
            thumbnail: thumbnail.clone(),
            format: Some(SourceFormat::Hls),
            sources: hls,
        });
    }

    if needs_audio_track && !audios.is_empty() {
        items.push(Item {
            index: items.len(),
            kind: ItemType::Audio,
            thumbnail,
            format: None,
            sources: audios,
        });
    } else if needs_audio_track {
        tracing::warn!("video needs a separate audio track but none was selected");
    }

    Ok(items)
}

fn audio_items(
    info: &AssetInfo,
    selection: Selection,
    thumbnail: Option<String>,
) -> Result<Vec<Item>> {
    let mut sources = selection.audios;
    if sources.is_empty() {
        sources.push(default_audio_source(info).ok_or(CatalogError::NoMediaFound)?);
    }

    Ok(vec![Item {
        index: 0,
        kind: ItemType::Audio,
        thumbnail,
        format: None,
        sources,
    }])
}

/// First URL the asset offers: a format's, else the top-level one
fn fallback_url(info: &AssetInfo) -> Option<String> {
    info.formats
        .iter()
        .find_map(|f| f.playable_url())
        .or_else(|| info.url.as_deref().filter(|u| !u.trim().is_empty()))
        .map(str::to_string)
}

/// Stand-in when no format matched a target
fn default_video_source(info: &AssetInfo) -> Option<Source> {
    let url = fallback_url(info)?;
    tracing::debug!("no video matched, using default source");

    Some(Source {
        quality: "default".to_string(),
        url,
        resolution: None,
        mime: mime_for_extension("mp4", MediaKind::Video),
        extension: "mp4".to_string(),
        codec: None,
        bitrate: None,
        size: None,
        has_audio: true,
        needs_merge: false,
        format: SourceFormat::Progressive,
        needs_proxy: false,
    })
}

fn default_audio_source(info: &AssetInfo) -> Option<Source> {
    let url = fallback_url(info)?;
    tracing::debug!("no audio matched, using default source");

    Some(Source {
        quality: "default".to_string(),
        url,
        resolution: None,
        mime: mime_for_extension("mp3", MediaKind::Audio),
        extension: "mp3".to_string(),
        codec: None,
        bitrate: None,
        size: None,
        has_audio: true,
        needs_merge: false,
        format: SourceFormat::Progressive,
        needs_proxy: false,
    })
}

/// Thumbnail URL, or None for placeholders like "nsfw"
pub fn valid_thumbnail(thumbnail: Option<&str>) -> Option<String> {
    let thumbnail = thumbnail?.trim();
    if thumbnail.starts_with("http://") || thumbnail.starts_with("https://") {
        return Some(thumbnail.to_string());
    }
    if thumbnail.is_empty() || THUMBNAIL_PLACEHOLDERS.contains(&thumbnail.to_lowercase().as_str()) {
        return None;
    }
    // Protocol-relative or otherwise odd, but still a reference
    Some(thumbnail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::config::SelectionConfig;
    use crate::catalog::format_selector::FormatSelector;
    use crate::catalog::models::RawFormat;

    fn make_video_format(height: u32, acodec: &str) -> RawFormat {
        RawFormat {
            url: Some(format!("https://cdn.example/{}-{}.mp4", height, acodec)),
            vcodec: Some("avc1".to_string()),
            acodec: Some(acodec.to_string()),
            height: Some(height),
            width: Some(height * 16 / 9),
            ext: Some("mp4".to_string()),
            ..RawFormat::default()
        }
    }

    fn make_audio_format(abr: f64) -> RawFormat {
        RawFormat {
            url: Some(format!("https://cdn.example/{}.m4a", abr)),
            vcodec: Some("none".to_string()),
            acodec: Some("mp4a.40.2".to_string()),
            abr: Some(abr),
            ext: Some("m4a".to_string()),
            ..RawFormat::default()
        }
    }

    fn make_info(formats: Vec<RawFormat>) -> AssetInfo {
        AssetInfo {
            id: Some(serde_json::json!("abc123")),
            title: Some("Clip".to_string()),
            uploader: Some("someone".to_string()),
            thumbnail: Some("https://cdn.example/thumb.jpg".to_string()),
            formats,
            ..AssetInfo::default()
        }
    }

    fn build(kind: PipelineKind, info: &AssetInfo) -> Result<ExtractionResult> {
        let selection = FormatSelector::run(kind, &info.formats, &SelectionConfig::default());
        build_result(&Platform::from("example"), kind, info, selection)
    }

    #[test]
    fn test_audio_item_only_with_dash_video() {
        let muxed = make_info(vec![make_video_format(720, "mp4a"), make_audio_format(128.0)]);
        let result = build(PipelineKind::Generic, &muxed).unwrap();
        assert_eq!(result.items.len(), 1);

        let dash = make_info(vec![make_video_format(1080, "none"), make_audio_format(128.0)]);
        let result = build(PipelineKind::Generic, &dash).unwrap();
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[1].kind, ItemType::Audio);
        assert_eq!(result.items[1].index, 1);
    }

    #[test]
    fn test_hls_item_between_video_and_audio() {
        let hls = RawFormat {
            url: Some("https://cdn.example/hls/index.m3u8".to_string()),
            height: Some(720),
            width: Some(1280),
            ..RawFormat::default()
        };
        let info = make_info(vec![
            make_video_format(1080, "none"),
            hls,
            make_audio_format(128.0),
        ]);

        let result = build(PipelineKind::ProgressivePriority, &info).unwrap();
        let layout: Vec<_> = result
            .items
            .iter()
            .map(|i| (i.index, i.kind, i.format))
            .collect();
        assert_eq!(
            layout,
            vec![
                (0, ItemType::Video, None),
                (1, ItemType::Video, Some(SourceFormat::Hls)),
                (2, ItemType::Audio, None),
            ]
        );
    }

    #[test]
    fn test_default_video_source_from_info_url() {
        let mut info = make_info(Vec::new());
        info.url = Some("https://cdn.example/direct.mp4".to_string());

        let result = build(PipelineKind::Generic, &info).unwrap();
        let source = &result.items[0].sources[0];
        assert_eq!(source.quality, "default");
        assert_eq!(source.url, "https://cdn.example/direct.mp4");
        assert!(source.has_audio && !source.needs_merge);
    }

    #[test]
    fn test_no_media_at_all() {
        let err = build(PipelineKind::Generic, &make_info(Vec::new())).unwrap_err();
        assert!(matches!(err, CatalogError::NoMediaFound));
    }

    #[test]
    fn test_audio_only_envelope() {
        let info = make_info(vec![make_audio_format(128.0), make_audio_format(320.0)]);
        let result = build(PipelineKind::AudioOnly, &info).unwrap();

        assert_eq!(result.content_type, ItemType::Audio);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].sources[0].bitrate, Some(128));
        assert_eq!(result.author.as_deref(), Some("someone"));
        assert_eq!(result.id, "abc123");
    }

    #[test]
    fn test_placeholder_thumbnails_dropped() {
        assert_eq!(valid_thumbnail(Some("nsfw")), None);
        assert_eq!(valid_thumbnail(Some("  ")), None);
        assert_eq!(
            valid_thumbnail(Some("https://cdn.example/t.jpg")).as_deref(),
            Some("https://cdn.example/t.jpg")
        );
    }
}
