// Selection algorithms over classified formats

mod audio;
mod candidate;
mod height_bucket;
mod progressive;

pub use audio::select_audio;
pub use height_bucket::select_by_height;
pub use progressive::{select_progressive_first, ProgressiveSelection};
