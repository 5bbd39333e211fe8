/// Truncates text to at most `max_chars` characters, appending `…` when cut.
///
/// Works on `char` boundaries, so it is safe for Arabic/Cyrillic/emoji text
/// where byte slicing (`&s[..n]`) would panic.
///
/// # Example
///
/// ```
/// use clipdrop::core::utils::truncate_chars;
///
/// assert_eq!(truncate_chars("hello", 10), "hello");
/// assert_eq!(truncate_chars("hello world", 5), "hello…");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}…", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Picks the most useful line out of multi-line tool output.
///
/// yt-dlp prints warnings before the actual `ERROR:` line; the error line is
/// what users and logs care about. Falls back to the last non-empty line.
pub fn error_line(output: &str) -> &str {
    output
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("ERROR:"))
        .or_else(|| output.lines().map(str::trim).filter(|l| !l.is_empty()).last())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_multibyte() {
        let text = "فشل التحميل بسبب خطأ";
        let cut = truncate_chars(text, 4);
        assert_eq!(cut, "فشل …");
    }

    #[test]
    fn test_truncate_chars_exact_length_untouched() {
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn test_error_line_prefers_error_prefix() {
        let out = "WARNING: something\nERROR: [youtube] abc: Private video\n";
        assert_eq!(error_line(out), "ERROR: [youtube] abc: Private video");
    }

    #[test]
    fn test_error_line_falls_back_to_last_line() {
        assert_eq!(error_line("first\nsecond\n\n"), "second");
        assert_eq!(error_line(""), "");
    }
}
