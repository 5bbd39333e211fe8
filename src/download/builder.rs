//! Builder for the ordered chain of extraction attempts.
//!
//! The chain always ends with an anonymous attempt, so a request can still
//! succeed when the cookie file is missing or broken.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::config::{self, AppConfig};
use crate::download::cookies::{CredentialReport, CredentialStatus};
use crate::download::request::DownloadRequest;

/// Desktop browser User-Agent sent together with cookies
pub const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Accept-Language sent with every attempt
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// One way of invoking the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionAttemptSpec {
    /// Short name for logs (`with-cookies`, `anonymous`)
    pub label: &'static str,
    /// yt-dlp format selector
    pub format: String,
    /// yt-dlp output template, unique per request
    pub output_template: String,
    /// Per-socket timeout handed to yt-dlp
    pub socket_timeout: Duration,
    /// yt-dlp internal retries
    pub retries: u32,
    /// Pass the cookie file to the extractor
    pub attach_credentials: bool,
    /// Cookie file path; set only when `attach_credentials` is
    pub cookies_path: Option<PathBuf>,
    /// Extra HTTP headers (`name`, `value`)
    pub headers: Vec<(String, String)>,
}

/// Single-file mp4 preferred, capped at `height`.
///
/// Only pre-muxed formats are selected so no ffmpeg merge step is needed.
pub fn format_for_height(height: u32) -> String {
    format!(
        "best[height<={h}][ext=mp4]/best[height<={h}]/best[ext=mp4]/best",
        h = height
    )
}

/// Builds the fallback chain for a request.
///
/// # Example
///
/// ```ignore
/// let chain = AttemptChainBuilder::new("/tmp/clipdrop")
///     .max_height(1080)
///     .cookies_file("cookies.txt")
///     .build(&request, &report);
/// ```
#[derive(Debug, Clone)]
pub struct AttemptChainBuilder {
    download_dir: PathBuf,
    cookies_file: PathBuf,
    max_height: u32,
    fallback_height: u32,
}

impl AttemptChainBuilder {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            cookies_file: PathBuf::from(config::credentials::DEFAULT_COOKIES_FILE),
            max_height: config::download::MAX_HEIGHT,
            fallback_height: config::download::FALLBACK_HEIGHT,
        }
    }

    pub fn from_config(app: &AppConfig) -> Self {
        Self::new(&app.download_dir)
            .cookies_file(&app.cookies_file)
            .max_height(app.max_height)
            .fallback_height(app.fallback_height)
    }

    /// Cookie file attached to the credentialed attempt.
    pub fn cookies_file(mut self, path: impl AsRef<Path>) -> Self {
        self.cookies_file = path.as_ref().to_path_buf();
        self
    }

    /// Height ceiling of the credentialed attempt.
    pub fn max_height(mut self, height: u32) -> Self {
        self.max_height = height;
        self
    }

    /// Height ceiling of the anonymous attempt.
    pub fn fallback_height(mut self, height: u32) -> Self {
        self.fallback_height = height;
        self
    }

    /// `<download_dir>/<request stem>.%(ext)s`
    pub fn output_template(&self, request: &DownloadRequest) -> String {
        self.download_dir
            .join(format!("{}.%(ext)s", request.artifact_stem()))
            .to_string_lossy()
            .into_owned()
    }

    /// Returns the attempts in the order they must be tried. Never empty.
    pub fn build(&self, request: &DownloadRequest, report: &CredentialReport) -> Vec<ExtractionAttemptSpec> {
        let output_template = self.output_template(request);
        let mut chain = Vec::with_capacity(2);

        if report.status == CredentialStatus::Valid {
            chain.push(ExtractionAttemptSpec {
                label: "with-cookies",
                format: format_for_height(self.max_height),
                output_template: output_template.clone(),
                socket_timeout: Duration::from_secs(config::download::PRIMARY_SOCKET_TIMEOUT_SECS),
                retries: config::download::PRIMARY_RETRIES,
                attach_credentials: true,
                cookies_path: Some(self.cookies_file.clone()),
                headers: vec![
                    ("User-Agent".to_string(), DESKTOP_USER_AGENT.to_string()),
                    ("Accept-Language".to_string(), ACCEPT_LANGUAGE.to_string()),
                ],
            });
        }

        chain.push(ExtractionAttemptSpec {
            label: "anonymous",
            format: format_for_height(self.fallback_height.min(self.max_height)),
            output_template,
            socket_timeout: Duration::from_secs(config::download::FALLBACK_SOCKET_TIMEOUT_SECS),
            retries: config::download::FALLBACK_RETRIES,
            attach_credentials: false,
            cookies_path: None,
            headers: vec![("Accept-Language".to_string(), ACCEPT_LANGUAGE.to_string())],
        });

        chain
    }
}
