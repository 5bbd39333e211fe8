//! Link and filename validation utilities
//!
//! Provides validation for user inputs:
//! - Link validation (cheap syntactic check, no network)
//! - Filename sanitization (remove filesystem-unsafe characters)

use lazy_regex::regex_is_match;
use thiserror::Error;
use url::Url;

use crate::core::config;

/// Validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Text does not start with `http://` or `https://`
    #[error("Not a link (missing http/https scheme): {0}")]
    MissingScheme(String),

    /// Text has a scheme but cannot be parsed or has no host
    #[error("Malformed link: {0}")]
    Malformed(String),

    /// Text is longer than any link we are willing to hand to yt-dlp
    #[error("Link is too long ({0} characters)")]
    TooLong(usize),
}

/// Returns `true` when the text looks like a link worth downloading.
///
/// The check is purely syntactic: the trimmed text must start with
/// `http://` or `https://` (scheme is case-insensitive).
///
/// # Examples
/// ```
/// use clipdrop::core::validation::is_valid_link;
///
/// assert!(is_valid_link("https://example.com/video"));
/// assert!(is_valid_link("  HTTP://youtu.be/abc  "));
/// assert!(!is_valid_link("not-a-url"));
/// assert!(!is_valid_link("ftp://example.com/file.mp4"));
/// ```
pub fn is_valid_link(text: &str) -> bool {
    parse_link(text).is_ok()
}

/// Validates the text and parses it into a [`Url`].
///
/// # Errors
/// * [`ValidationError::MissingScheme`] - no `http://`/`https://` prefix
/// * [`ValidationError::TooLong`] - longer than `config::validation::MAX_URL_LENGTH`
/// * [`ValidationError::Malformed`] - prefix present but the URL does not parse or has no host
pub fn parse_link(text: &str) -> Result<Url, ValidationError> {
    let trimmed = text.trim();

    if !regex_is_match!(r"(?i)^https?://", trimmed) {
        return Err(ValidationError::MissingScheme(trimmed.to_string()));
    }

    let len = trimmed.chars().count();
    if len > config::validation::MAX_URL_LENGTH {
        return Err(ValidationError::TooLong(len));
    }

    let parsed = Url::parse(trimmed).map_err(|e| ValidationError::Malformed(format!("{} ({})", trimmed, e)))?;
    if parsed.host_str().map(str::is_empty).unwrap_or(true) {
        return Err(ValidationError::Malformed(format!("{} (no host)", trimmed)));
    }

    Ok(parsed)
}

/// Sanitizes a filename by removing filesystem-unsafe characters.
///
/// Removes path separators, characters reserved on Windows
/// (`:`, `*`, `?`, `"`, `<`, `>`, `|`) and control characters.
///
/// # Examples
/// ```
/// use clipdrop::core::validation::sanitize_filename;
///
/// assert_eq!(sanitize_filename("video.mp4"), "video.mp4");
/// assert_eq!(sanitize_filename("video:file.mp4"), "videofile.mp4");
/// assert_eq!(sanitize_filename("path/to/file.mp4"), "pathtofile.mp4");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !['/', '\\', ':', '*', '?', '"', '<', '>', '|'].contains(c))
        .filter(|c| !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_links() {
        let valid = vec![
            "https://example.com/video",
            "http://example.com/video",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "HTTPS://vimeo.com/12345",
            "  https://x.com/user/status/1  ",
        ];

        for url in valid {
            assert!(is_valid_link(url), "Failed for: {}", url);
        }
    }

    #[test]
    fn test_rejects_text_without_scheme() {
        let invalid = vec![
            "not-a-url",
            "",
            "   ",
            "youtube.com/watch?v=abc",
            "ftp://example.com/file.mp4",
            "file:///etc/passwd",
            "javascript:alert(1)",
            "look at https://example.com",
        ];

        for text in invalid {
            assert!(!is_valid_link(text), "Should fail for: {}", text);
            assert!(matches!(parse_link(text), Err(ValidationError::MissingScheme(_))));
        }
    }

    #[test]
    fn test_rejects_scheme_without_host() {
        assert!(matches!(parse_link("https://"), Err(ValidationError::Malformed(_))));
        assert!(matches!(parse_link("http:// spaced"), Err(ValidationError::Malformed(_))));
    }

    #[test]
    fn test_rejects_overlong_link() {
        let long = format!("https://example.com/{}", "a".repeat(config::validation::MAX_URL_LENGTH));
        assert!(matches!(parse_link(&long), Err(ValidationError::TooLong(_))));
    }

    #[test]
    fn test_parse_link_trims_whitespace() {
        let url = parse_link("\n https://example.com/video \t").unwrap();
        assert_eq!(url.as_str(), "https://example.com/video");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("file*.mp4"), "file.mp4");
        assert_eq!(sanitize_filename("a<b>c|d.mp4"), "abcd.mp4");
        assert_eq!(sanitize_filename("tab\there.mp4"), "tabhere.mp4");
    }
}
