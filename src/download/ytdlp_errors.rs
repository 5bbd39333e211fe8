//! Classification of yt-dlp failures
//!
//! Maps raw yt-dlp error text onto a small set of failure kinds, decides which
//! kinds justify trying the next attempt in the chain, and provides the
//! user-facing line for each kind.

use std::fmt;

/// Why a download did not produce a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Cookies are required but the file does not exist
    CredentialMissing,
    /// Cookie file is unusable (found before attempting, or implied by an exhausted chain)
    CredentialInvalid,
    /// Login, age, region, membership or bot-check gate
    AccessRestricted,
    /// Video removed, never existed, or unavailable
    NotFound,
    /// Network stall or the whole yt-dlp run timed out
    Timeout,
    /// The user cancelled the request
    Cancelled,
    /// Anything we do not recognise
    Unknown,
}

impl FailureKind {
    /// Only access gates are worth another attempt with a different configuration.
    pub fn allows_fallback(self) -> bool {
        matches!(self, FailureKind::AccessRestricted)
    }

    /// Stable identifier for log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::CredentialMissing => "credential_missing",
            FailureKind::CredentialInvalid => "credential_invalid",
            FailureKind::AccessRestricted => "access_restricted",
            FailureKind::NotFound => "not_found",
            FailureKind::Timeout => "timeout",
            FailureKind::Cancelled => "cancelled",
            FailureKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered signal table. First matching row wins, so access gates are listed
/// before "unavailable" style signals ("private video ... unavailable" is a gate).
static RULES: &[(FailureKind, &[&str])] = &[
    (
        FailureKind::AccessRestricted,
        &[
            "sign in to confirm",
            "please sign in",
            "private",
            "login required",
            "log in to",
            "requires authentication",
            "age-restricted",
            "confirm your age",
            "inappropriate for some users",
            "members-only",
            "join this channel",
            "in your country",
            "geo restriction",
            "http error 403",
            "403: forbidden",
            "cookies are no longer valid",
            "cookies have likely been rotated",
            "use --cookies",
        ],
    ),
    (
        FailureKind::NotFound,
        &[
            "video unavailable",
            "is not available",
            "unavailable",
            "does not exist",
            "has been removed",
            "no longer available",
            "http error 404",
            "404: not found",
            "unsupported url",
        ],
    ),
    (
        FailureKind::Timeout,
        &[
            "timed out",
            "timeout",
            "socket",
            "connection reset",
            "connection refused",
            "connection aborted",
            "name resolution",
            "network is unreachable",
        ],
    ),
];

/// Classifies raw yt-dlp error text.
///
/// Only the `ERROR:` lines are matched when there are any: yt-dlp prints
/// cookie and 403 hints as warnings even when the real error is terminal.
/// Matching is case-insensitive substring search over [`RULES`]; text that
/// matches nothing (including empty text) is [`FailureKind::Unknown`].
///
/// # Example
///
/// ```
/// use clipdrop::download::ytdlp_errors::{classify_failure, FailureKind};
///
/// assert_eq!(classify_failure("ERROR: Sign in to confirm you're not a bot"), FailureKind::AccessRestricted);
/// assert_eq!(classify_failure("ERROR: Video unavailable"), FailureKind::NotFound);
/// ```
pub fn classify_failure(text: &str) -> FailureKind {
    let errors: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("ERROR:"))
        .collect();
    let lower = if errors.is_empty() {
        text.to_lowercase()
    } else {
        errors.join("\n").to_lowercase()
    };
    RULES
        .iter()
        .find(|(_, signals)| signals.iter().any(|s| lower.contains(s)))
        .map(|(kind, _)| *kind)
        .unwrap_or(FailureKind::Unknown)
}

/// Header of every failure reply
pub const FAILURE_HEADER: &str = "❌ فشل التحميل:";

/// One user-facing line per failure kind
pub fn user_message(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::AccessRestricted => "- الفيديو خاص أو محمي",
        FailureKind::NotFound => "- الفيديو غير متاح",
        FailureKind::Timeout => "- انتهت مهلة الاتصال، حاول مرة أخرى لاحقاً",
        FailureKind::CredentialMissing => "- ملف الكوكيز غير موجود، يرجى إبلاغ المشرف",
        FailureKind::CredentialInvalid => "- ملف الكوكيز غير صالح، يرجى إبلاغ المشرف لتحديثه",
        FailureKind::Cancelled => "- تم إلغاء التحميل",
        FailureKind::Unknown => "- حاول رابطاً آخر",
    }
}

/// Full failure reply, with the raw diagnostic appended when requested
pub fn failure_text(kind: FailureKind, diagnostic: Option<&str>) -> String {
    let mut text = format!("{}\n{}", FAILURE_HEADER, user_message(kind));
    if let Some(detail) = diagnostic.map(str::trim).filter(|d| !d.is_empty()) {
        text.push_str("\n\n🔍 ");
        text.push_str(detail);
    }
    text
}

/// Operator hint logged next to terminal failures
pub fn fix_recommendation(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::CredentialMissing | FailureKind::CredentialInvalid => {
            "🔧 Export fresh cookies in Netscape format and point YTDL_COOKIES_FILE at them"
        }
        FailureKind::AccessRestricted => "🔧 Refresh cookies or update yt-dlp; the site gated every attempt",
        FailureKind::Timeout => "🔧 Check connectivity to the site; raise YTDLP_TIMEOUT_SECS if it keeps happening",
        FailureKind::Unknown => "🔧 Check the raw yt-dlp output above and make sure yt-dlp is up to date",
        FailureKind::NotFound | FailureKind::Cancelled => "ℹ️  No action needed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_restricted_signals() {
        for text in [
            "ERROR: [youtube] abc: Sign in to confirm you're not a bot. Use --cookies-from-browser",
            "ERROR: [youtube] abc: Private video. Sign in if you've been granted access",
            "ERROR: unable to download video data: HTTP Error 403: Forbidden",
            "ERROR: The uploader has not made this video available in your country",
            "WARNING: The provided YouTube account cookies are no longer valid",
            "ERROR: This video may be inappropriate for some users. Sign in to confirm your age",
            "ERROR: Join this channel to get access to members-only content",
            "ERROR: [Instagram] abc: Private account",
            "ERROR: [youtube:tab] PLx: This playlist is private",
            "ERROR: [TikTok] abc: This account is private",
        ] {
            assert_eq!(classify_failure(text), FailureKind::AccessRestricted, "{}", text);
        }
    }

    #[test]
    fn test_not_found_signals() {
        for text in [
            "ERROR: [youtube] xyz: Video unavailable",
            "ERROR: This video has been removed by the uploader",
            "ERROR: HTTP Error 404: Not Found",
            "ERROR: Unsupported URL: https://example.com/",
        ] {
            assert_eq!(classify_failure(text), FailureKind::NotFound, "{}", text);
        }
    }

    #[test]
    fn test_timeout_signals() {
        for text in [
            "ERROR: Read timed out.",
            "yt-dlp timed out after 300s",
            "ERROR: [Errno 104] Connection reset by peer",
            "ERROR: <urlopen error [Errno -3] Temporary failure in name resolution>",
        ] {
            assert_eq!(classify_failure(text), FailureKind::Timeout, "{}", text);
        }
    }

    #[test]
    fn test_private_beats_unavailable() {
        assert_eq!(
            classify_failure("Video unavailable. This video is private"),
            FailureKind::AccessRestricted
        );
    }

    #[test]
    fn test_warning_hints_do_not_override_error_line() {
        let stderr = "WARNING: [youtube] abc: Use --cookies-from-browser or --cookies for the authentication\n\
                      WARNING: [youtube] abc: HTTP Error 403: Forbidden. Retrying (1/3)...\n\
                      ERROR: [youtube] abc: Video unavailable";
        assert_eq!(classify_failure(stderr), FailureKind::NotFound);
    }

    #[test]
    fn test_warnings_alone_are_classified() {
        let stderr = "WARNING: [youtube] The provided YouTube account cookies are no longer valid\n\
                      yt-dlp exited with status 1";
        assert_eq!(classify_failure(stderr), FailureKind::AccessRestricted);
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(classify_failure(""), FailureKind::Unknown);
        assert_eq!(classify_failure("ERROR: something odd happened"), FailureKind::Unknown);
    }

    #[test]
    fn test_only_access_restricted_allows_fallback() {
        assert!(FailureKind::AccessRestricted.allows_fallback());
        for kind in [
            FailureKind::CredentialMissing,
            FailureKind::CredentialInvalid,
            FailureKind::NotFound,
            FailureKind::Timeout,
            FailureKind::Cancelled,
            FailureKind::Unknown,
        ] {
            assert!(!kind.allows_fallback(), "{}", kind);
        }
    }

    #[test]
    fn test_failure_text() {
        let text = failure_text(FailureKind::AccessRestricted, None);
        assert_eq!(text, "❌ فشل التحميل:\n- الفيديو خاص أو محمي");

        let detailed = failure_text(FailureKind::Unknown, Some("  ERROR: boom "));
        assert!(detailed.ends_with("🔍 ERROR: boom"));

        assert_eq!(failure_text(FailureKind::NotFound, Some("  ")), failure_text(FailureKind::NotFound, None));
    }
}
