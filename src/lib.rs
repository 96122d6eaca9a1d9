pub mod catalog;
pub mod logging;

pub use catalog::{
    CatalogError, CatalogService, ExtractionResult, FormatSelector, PipelineKind, Platform,
    RawFormat, Result, Selection, SelectionConfig, Source,
};
