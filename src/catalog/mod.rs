// Catalog module - format selection and normalization
//
// Layers, leaves first:
//   codec / classifier    normalize and partition raw formats
//   selectors             height buckets, progressive priority, audio
//   format_selector       pipeline entry point (pure, synchronous)
//   remap / platform      platform-specific labels and profiles
//   transform             items and the result envelope
//   extractors / resolver / service   async collaborators around selection

pub mod classifier;
pub mod codec;
pub mod config;
pub mod errors;
pub mod extractors;
pub mod format_selector;
pub mod mime;
pub mod models;
pub mod platform;
pub mod remap;
pub mod resolver;
pub mod selectors;
pub mod service;
pub mod transform;
pub mod utils;

pub use classifier::{ClassifiedFormats, FormatKind};
pub use codec::{CanonicalCodec, AUDIO_PREFERENCE};
pub use config::SelectionConfig;
pub use errors::{CatalogError, ErrorCode, ErrorResponse, Result};
pub use extractors::{diagnose_error, ExtractorConfig, InfoExtractor, YtDlpExtractor};
pub use format_selector::{FormatSelector, PipelineKind, Selection};
pub use models::{AssetInfo, ExtractionResult, Item, ItemType, RawFormat, Source, SourceFormat};
pub use platform::{Platform, PlatformProfile};
pub use resolver::{is_wrapper_url, resolve_wrapper_urls, HttpUrlResolver, UrlResolver};
pub use service::CatalogService;
