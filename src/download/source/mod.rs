//! Extraction service abstraction.
//!
//! The orchestrator only sees the `ExtractionService` trait, so tests can
//! script outcomes while production code shells out to yt-dlp.

pub mod ytdlp;

use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

use crate::download::builder::ExtractionAttemptSpec;
use crate::download::error::ExtractionError;

pub use ytdlp::YtDlpService;

/// What a successful extraction left on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMedia {
    /// Finished file inside the download dir
    pub file_path: PathBuf,
    /// Title from the extractor metadata
    pub title: Option<String>,
    /// File size in bytes
    pub file_size: u64,
}

/// Something that can turn a link plus an attempt spec into a file.
///
/// Implementations must write only files whose names start with the stem of
/// `spec.output_template`; the orchestrator relies on that for cleanup.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Human-readable name (e.g., "yt-dlp")
    fn name(&self) -> &str;

    /// Runs one attempt. Dropping the returned future must stop the work.
    async fn extract(&self, url: &Url, spec: &ExtractionAttemptSpec) -> Result<ExtractedMedia, ExtractionError>;
}
