//! Mock implementations of the extraction service
//!
//! The mock writes real files into the download dir so cleanup and artifact
//! lifetime are exercised the same way as with yt-dlp.

pub mod mock_extractor;

#[allow(unused_imports)]
pub use mock_extractor::{MockExtractor, MockStep};
