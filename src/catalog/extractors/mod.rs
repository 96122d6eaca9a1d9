// InfoExtractor module - asset metadata extraction
//
// The yt-dlp binary is the only built-in extractor. Anything else that can
// produce an AssetInfo plugs in through the InfoExtractor trait.

mod diagnostics;
mod traits;
mod ytdlp;

pub use diagnostics::{diagnose_error, error_summary, extraction_error};
pub use traits::{parse_info_json, ExtractorConfig, InfoExtractor};
pub use ytdlp::YtDlpExtractor;
