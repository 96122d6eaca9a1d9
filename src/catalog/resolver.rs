// Wrapper URL resolver
//
// Some hosts hand out "get_file" or redirect links that only turn into the
// real media URL after a redirect chain. These are followed after selection,
// a bounded number at a time. A failure on one URL leaves that URL as it was
// and never fails the batch.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::errors::{CatalogError, Result};
use super::models::Item;

/// Concurrent resolutions per batch
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// Query parameters that force a download dialog instead of streaming
const DOWNLOAD_PARAMS: &[&str] = &["download", "download_filename"];

lazy_static! {
    static ref WRAPPER_PATTERNS: Vec<Regex> = [r"rule34video\.com/get_file/", r"eporner\.com/.*redirect"]
        .into_iter()
        .filter_map(|p| Regex::new(&format!("(?i){}", p)).ok())
        .collect();
}

/// Whether a URL is a wrapper that must be followed to reach the media
pub fn is_wrapper_url(url: &str) -> bool {
    WRAPPER_PATTERNS.iter().any(|re| re.is_match(url))
}

/// Resolves one URL to its final location
#[async_trait]
pub trait UrlResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<String>;
}

/// Follows redirects with a HEAD request
pub struct HttpUrlResolver {
    client: reqwest::Client,
}

impl HttpUrlResolver {
    pub fn new(timeout: Duration, proxy: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                CatalogError::InvalidConfig(format!("invalid proxy {}: {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| CatalogError::ExecutionError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl UrlResolver for HttpUrlResolver {
    async fn resolve(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| CatalogError::Resolve {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(finalize_resolved(url, response.url()))
    }
}

/// Clean the final URL of a redirect chain, or keep the original
///
/// A chain ending on YouTube means the wrapper link has expired.
pub fn finalize_resolved(original: &str, final_url: &Url) -> String {
    let host = final_url.host_str().unwrap_or("").to_lowercase();
    if is_youtube_host(&host) {
        tracing::debug!(url = original, "wrapper redirected to youtube, keeping original");
        return original.to_string();
    }

    strip_download_params(final_url.clone()).to_string()
}

fn is_youtube_host(host: &str) -> bool {
    ["youtube.com", "youtu.be"]
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

/// Drop download-forcing query parameters and the fragment
fn strip_download_params(mut url: Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !DOWNLOAD_PARAMS.iter().any(|p| k.eq_ignore_ascii_case(p)))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url.set_fragment(None);
    url
}

/// Resolve every wrapper URL in `urls`, preserving order
///
/// Non-wrapper URLs pass through untouched. At most `max_workers`
/// resolutions run at once.
pub async fn resolve_wrapper_urls(
    resolver: Arc<dyn UrlResolver>,
    urls: &[String],
    max_workers: usize,
) -> Vec<String> {
    let mut resolved = urls.to_vec();
    let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
    let mut tasks = JoinSet::new();

    for (index, url) in urls.iter().enumerate() {
        if !is_wrapper_url(url) {
            continue;
        }

        let resolver = Arc::clone(&resolver);
        let semaphore = Arc::clone(&semaphore);
        let url = url.clone();

        tasks.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (index, None);
            };
            match resolver.resolve(&url).await {
                Ok(final_url) => (index, Some(final_url)),
                Err(e) => {
                    tracing::warn!(url = %url, "wrapper resolution failed, keeping original: {}", e);
                    (index, None)
                }
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Some(final_url))) => resolved[index] = final_url,
            Ok((_, None)) => {}
            Err(e) => tracing::warn!("resolver task failed: {}", e),
        }
    }

    resolved
}

/// Source URLs of every item, in item then source order
pub fn collect_source_urls(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.sources.iter().map(|s| s.url.clone()))
        .collect()
}

/// Write resolved URLs back in the order `collect_source_urls` produced
pub fn apply_resolved_urls(items: &mut [Item], resolved: &[String]) {
    let sources = items.iter_mut().flat_map(|item| item.sources.iter_mut());
    for (source, url) in sources.zip(resolved) {
        if source.url != *url {
            source.url = url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_patterns() {
        assert!(is_wrapper_url("https://rule34video.com/get_file/1/abc/720.mp4"));
        assert!(is_wrapper_url("https://www.EPORNER.com/dload/x/redirect?y=1"));
        assert!(!is_wrapper_url("https://cdn.example/video.mp4"));
        assert!(!is_wrapper_url("https://eporner.com/video/abc"));
    }

    #[test]
    fn test_download_params_stripped() {
        let final_url =
            Url::parse("https://cdn.example/v.mp4?download=true&token=abc&download_filename=x.mp4#t=1").unwrap();
        assert_eq!(
            finalize_resolved("https://rule34video.com/get_file/1", &final_url),
            "https://cdn.example/v.mp4?token=abc"
        );

        let only_download = Url::parse("https://cdn.example/v.mp4?download=1").unwrap();
        assert_eq!(
            finalize_resolved("https://rule34video.com/get_file/1", &only_download),
            "https://cdn.example/v.mp4"
        );
    }

    #[test]
    fn test_youtube_redirect_means_expired() {
        let original = "https://rule34video.com/get_file/1/abc";
        let final_url = Url::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(finalize_resolved(original, &final_url), original);
    }

    #[test]
    fn test_youtube_lookalike_host_is_resolved() {
        let original = "https://rule34video.com/get_file/1/abc";

        let short = Url::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(finalize_resolved(original, &short), original);

        let lookalike = Url::parse("https://cdn.notyoutube.com/v.mp4?download=true").unwrap();
        assert_eq!(
            finalize_resolved(original, &lookalike),
            "https://cdn.notyoutube.com/v.mp4"
        );
    }
}
