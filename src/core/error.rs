use thiserror::Error;

/// Centralized error types for the application
///
/// Per-request failures of the extraction service are NOT errors in this
/// sense: they travel as `ExtractionOutcome::Failure` values through the
/// orchestrator. `AppError` covers startup, configuration, I/O and Telegram
/// transport problems.
///
/// # Example
///
/// ```no_run
/// use clipdrop::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Missing or invalid process configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sending the result back to the chat took longer than allowed
    #[error("Send timed out after {0}s")]
    SendTimeout(u64),

    /// Filesystem errors (scratch directory, artifacts)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_timeout_display() {
        assert_eq!(AppError::SendTimeout(120).to_string(), "Send timed out after 120s");
    }

    #[test]
    fn test_io_error_converts() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(err.to_string(), "IO error: gone");
    }
}
