// CatalogService - extract, select, wrap
//
// Extractors are tried in the order they were added. Content errors
// (private, deleted, geo-blocked, ...) are final since another extractor
// would see the same thing; tool failures fall through to the next one.

use std::sync::Arc;

use super::config::SelectionConfig;
use super::errors::{CatalogError, ErrorCode, Result};
use super::extractors::InfoExtractor;
use super::format_selector::FormatSelector;
use super::models::{AssetInfo, ExtractionResult};
use super::platform::{Platform, PlatformProfile};
use super::resolver::{
    apply_resolved_urls, collect_source_urls, resolve_wrapper_urls, UrlResolver,
    DEFAULT_MAX_WORKERS,
};
use super::transform::build_result;

pub struct CatalogService {
    extractors: Vec<Box<dyn InfoExtractor>>,
    resolver: Option<Arc<dyn UrlResolver>>,
    max_workers: usize,
    /// Replaces the platform's own selection config when set
    selection_config: Option<SelectionConfig>,
}

impl CatalogService {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
            resolver: None,
            max_workers: DEFAULT_MAX_WORKERS,
            selection_config: None,
        }
    }

    pub fn add_extractor(&mut self, extractor: Box<dyn InfoExtractor>) {
        self.extractors.push(extractor);
    }

    pub fn with_extractor(mut self, extractor: Box<dyn InfoExtractor>) -> Self {
        self.add_extractor(extractor);
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn UrlResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers.max(1);
        self
    }

    pub fn with_selection_config(mut self, config: Option<SelectionConfig>) -> Self {
        self.selection_config = config;
        self
    }

    /// Profile for a platform, with the config override applied
    pub fn profile(&self, platform: &Platform) -> PlatformProfile {
        let profile = platform.profile();
        match &self.selection_config {
            Some(config) => profile.with_config(config.clone()),
            None => profile,
        }
    }

    /// Extract, select and wrap a URL
    pub async fn fetch(&self, url: &str, platform: &Platform) -> Result<ExtractionResult> {
        let info = self.extract(url).await?;
        self.catalog(info, platform).await
    }

    /// Run the first extractor that succeeds
    pub async fn extract(&self, url: &str) -> Result<AssetInfo> {
        let mut last_error = None;

        for extractor in &self.extractors {
            tracing::debug!(extractor = extractor.name(), url, "trying extractor");

            match extractor.extract(url).await {
                Ok(info) => {
                    tracing::info!(extractor = extractor.name(), "extraction succeeded");
                    return Ok(info);
                }
                Err(e) if is_content_error(&e) => {
                    tracing::warn!(extractor = extractor.name(), code = %e.code(), "content unavailable: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(extractor = extractor.name(), "extractor failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| CatalogError::ToolNotFound("no extractors configured".to_string())))
    }

    /// Select and wrap an already-extracted asset
    pub async fn catalog(&self, info: AssetInfo, platform: &Platform) -> Result<ExtractionResult> {
        let profile = self.profile(platform);
        let asset = info.primary();
        let formats = asset.effective_formats();

        tracing::debug!(
            platform = %platform,
            pipeline = ?profile.pipeline,
            formats = formats.len(),
            "selecting formats"
        );

        let selection = FormatSelector::run(profile.pipeline, &formats, &profile.config);
        let mut result = build_result(platform, profile.pipeline, asset, selection)?;

        if profile.resolve_wrappers {
            self.resolve_wrappers(&mut result).await;
        }

        Ok(result)
    }

    async fn resolve_wrappers(&self, result: &mut ExtractionResult) {
        let Some(resolver) = &self.resolver else {
            tracing::debug!("no resolver configured, leaving wrapper URLs as-is");
            return;
        };

        let urls = collect_source_urls(&result.items);
        let resolved = resolve_wrapper_urls(Arc::clone(resolver), &urls, self.max_workers).await;
        apply_resolved_urls(&mut result.items, &resolved);
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}

fn is_content_error(err: &CatalogError) -> bool {
    matches!(
        err,
        CatalogError::Extraction { code, .. } if *code != ErrorCode::ExtractionFailed
    )
}
