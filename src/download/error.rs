use std::time::Duration;
use thiserror::Error;

/// Failure of one call into the extraction service.
///
/// [`ExtractionError::raw_text`] is what gets classified, so variants keep the
/// extractor's own wording wherever there is one.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The binary could not be started
    #[error("failed to start yt-dlp: {0}")]
    Spawn(String),

    /// The extractor exited with an error; the payload is its stderr
    #[error("{stderr}")]
    Failed { stderr: String, exit_code: Option<i32> },

    /// The whole run exceeded the process timeout and was killed
    #[error("yt-dlp timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    /// The extractor reported success but no file could be found
    #[error("downloaded file not found: {0}")]
    OutputMissing(String),

    /// Metadata printed by the extractor could not be parsed
    #[error("failed to parse yt-dlp metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl ExtractionError {
    /// Text handed to the classifier and kept as diagnostic.
    pub fn raw_text(&self) -> String {
        self.to_string()
    }

    /// Subcategory for log lines
    pub fn subcategory(&self) -> &'static str {
        match self {
            ExtractionError::Spawn(_) => "spawn",
            ExtractionError::Failed { .. } => "ytdlp",
            ExtractionError::TimedOut(_) => "timeout",
            ExtractionError::OutputMissing(_) => "file_not_found",
            ExtractionError::Metadata(_) => "metadata",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::ytdlp_errors::{classify_failure, FailureKind};

    #[test]
    fn test_failed_keeps_stderr_verbatim() {
        let err = ExtractionError::Failed {
            stderr: "ERROR: Video unavailable".to_string(),
            exit_code: Some(1),
        };
        assert_eq!(err.raw_text(), "ERROR: Video unavailable");
        assert_eq!(err.subcategory(), "ytdlp");
    }

    #[test]
    fn test_timed_out_classifies_as_timeout() {
        let err = ExtractionError::TimedOut(Duration::from_secs(300));
        assert_eq!(err.raw_text(), "yt-dlp timed out after 300s");
        assert_eq!(classify_failure(&err.raw_text()), FailureKind::Timeout);
    }

    #[test]
    fn test_spawn_failure_is_unknown() {
        let err = ExtractionError::Spawn("No such file or directory (os error 2)".to_string());
        assert_eq!(classify_failure(&err.raw_text()), FailureKind::Unknown);
    }
}
