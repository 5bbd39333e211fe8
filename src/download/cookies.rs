//! Cookie file probing for authenticated yt-dlp attempts
//!
//! The cookie file is operator-managed and read-only from the bot's side.
//! It is re-read on every request, so an operator can swap cookies without
//! restarting the process.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::config;

/// Coarse state of the cookie file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    /// File does not exist
    Missing,
    /// File exists but is too small, unreadable, or not scoped to the expected site
    Malformed,
    /// File looks usable
    Valid,
}

/// Result of probing the cookie file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialReport {
    pub status: CredentialStatus,
    /// Human-readable explanation (underlying I/O message preserved on failure)
    pub diagnostic: String,
    /// Path that was probed
    pub path: PathBuf,
    /// File size in bytes, when it could be read
    pub size: Option<u64>,
}

impl CredentialReport {
    fn new(status: CredentialStatus, path: &Path, size: Option<u64>, diagnostic: impl Into<String>) -> Self {
        Self {
            status,
            diagnostic: diagnostic.into(),
            path: path.to_path_buf(),
            size,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == CredentialStatus::Valid
    }

    /// Multi-line report for `clipdrop check-cookies`
    pub fn format_report(&self) -> String {
        let status = match self.status {
            CredentialStatus::Valid => "✅ valid",
            CredentialStatus::Malformed => "⚠️ malformed",
            CredentialStatus::Missing => "❌ missing",
        };
        let mut report = format!("📄 File: {}\n🍪 Status: {}\n", self.path.display(), status);
        if let Some(size) = self.size {
            report.push_str(&format!("📏 Size: {} bytes\n", size));
        }
        report.push_str(&format!("ℹ️  {}", self.diagnostic));
        report
    }
}

/// Counts cookie lines in Netscape format: `domain\tflag\tpath\tsecure\texpiry\tname\tvalue`.
///
/// `#HttpOnly_` prefixed lines are real cookies, every other `#` line is a comment.
fn count_cookie_lines<'a>(contents: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    contents
        .lines()
        .map(|line| line.strip_prefix("#HttpOnly_").unwrap_or(line))
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter(|line| line.split('\t').count() >= 7)
}

/// Inspects the cookie file and reports whether authenticated attempts make sense.
///
/// Never fails: every I/O problem is reported as [`CredentialStatus::Malformed`]
/// (or `Missing` for a nonexistent file) with the underlying message preserved.
///
/// # Arguments
/// * `path` - Cookie file location
/// * `site_marker` - Substring (usually a domain) the file must mention
pub fn probe_credentials(path: &Path, site_marker: &str) -> CredentialReport {
    let metadata = match fs_err::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return CredentialReport::new(CredentialStatus::Missing, path, None, "cookie file not found");
        }
        Err(e) => {
            return CredentialReport::new(CredentialStatus::Malformed, path, None, e.to_string());
        }
    };

    if !metadata.is_file() {
        return CredentialReport::new(CredentialStatus::Malformed, path, None, "cookie path is not a regular file");
    }

    let size = metadata.len();
    if size < config::credentials::MIN_COOKIE_FILE_BYTES {
        return CredentialReport::new(
            CredentialStatus::Malformed,
            path,
            Some(size),
            format!(
                "cookie file is too small ({} bytes, need at least {})",
                size,
                config::credentials::MIN_COOKIE_FILE_BYTES
            ),
        );
    }

    let contents = match fs_err::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return CredentialReport::new(CredentialStatus::Malformed, path, Some(size), e.to_string()),
    };

    let marker = site_marker.to_lowercase();
    if !contents.to_lowercase().contains(&marker) {
        return CredentialReport::new(
            CredentialStatus::Malformed,
            path,
            Some(size),
            format!("cookie file has no entries for '{}'", site_marker),
        );
    }

    let total = count_cookie_lines(&contents).count();
    let scoped = count_cookie_lines(&contents)
        .filter(|line| line.to_lowercase().contains(&marker))
        .count();

    CredentialReport::new(
        CredentialStatus::Valid,
        path,
        Some(size),
        format!("{} cookies, {} for '{}'", total, scoped, site_marker),
    )
}
