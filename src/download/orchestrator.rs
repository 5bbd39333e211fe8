//! Runs the fallback chain against the extraction service.
//!
//! Attempts are strictly sequential: attempt `i + 1` starts only after
//! attempt `i` failed with a kind that allows fallback. The same spec is never
//! retried here; yt-dlp does its own network retries.

use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::core::config;
use crate::core::utils::{error_line, truncate_chars};
use crate::download::artifact::{cleanup_partial_files, cleanup_request_files, DownloadedArtifact};
use crate::download::builder::ExtractionAttemptSpec;
use crate::download::cookies::{CredentialReport, CredentialStatus};
use crate::download::request::DownloadRequest;
use crate::download::source::ExtractionService;
use crate::download::ytdlp_errors::{classify_failure, fix_recommendation, FailureKind};

/// Final result of running a chain.
#[derive(Debug)]
pub enum ExtractionOutcome {
    Success(DownloadedArtifact),
    Failure {
        /// Truncated extractor text (or probe diagnostic for credential failures)
        raw_error: String,
        kind: FailureKind,
    },
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success(_))
    }

    /// Failure kind, `None` on success
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            ExtractionOutcome::Success(_) => None,
            ExtractionOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Single log entry for a terminal failure: kind, diagnostic and operator hint.
fn failure_summary(short_id: &str, kind: FailureKind, raw_error: &str) -> String {
    format!(
        "❌ [{}] Download failed ({}): {} | {}",
        short_id,
        kind,
        raw_error,
        fix_recommendation(kind)
    )
}

/// Owns the extraction service and the scratch dir it writes into.
pub struct DownloadOrchestrator {
    service: Arc<dyn ExtractionService>,
    download_dir: PathBuf,
    require_cookies: bool,
}

impl DownloadOrchestrator {
    pub fn new(service: Arc<dyn ExtractionService>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            service,
            download_dir: download_dir.into(),
            require_cookies: false,
        }
    }

    /// Refuse every request before attempting when cookies are not usable.
    pub fn require_cookies(mut self, required: bool) -> Self {
        self.require_cookies = required;
        self
    }

    fn failure(&self, request: &DownloadRequest, kind: FailureKind, raw: &str) -> ExtractionOutcome {
        let raw_error = truncate_chars(error_line(raw), config::download::DIAGNOSTIC_MAX_CHARS);
        if kind == FailureKind::Cancelled {
            log::info!("🛑 [{}] Download cancelled", request.short_id());
        } else {
            log::error!("{}", failure_summary(&request.short_id(), kind, &raw_error));
        }
        ExtractionOutcome::Failure { raw_error, kind }
    }

    /// Runs `chain` for `request` and returns the first success or the terminal failure.
    ///
    /// When `cancel` fires the running attempt is dropped (which kills the
    /// child process) and leftovers are removed.
    pub async fn run(
        &self,
        request: &DownloadRequest,
        chain: &[ExtractionAttemptSpec],
        report: &CredentialReport,
        cancel: &CancellationToken,
    ) -> ExtractionOutcome {
        if self.require_cookies {
            match report.status {
                CredentialStatus::Missing => {
                    return self.failure(request, FailureKind::CredentialMissing, &report.diagnostic);
                }
                CredentialStatus::Malformed => {
                    return self.failure(request, FailureKind::CredentialInvalid, &report.diagnostic);
                }
                CredentialStatus::Valid => {}
            }
        }

        if chain.is_empty() {
            return self.failure(request, FailureKind::Unknown, "no extraction attempts configured");
        }

        let stem = request.artifact_stem();
        let total = chain.len();

        for (index, spec) in chain.iter().enumerate() {
            if cancel.is_cancelled() {
                cleanup_request_files(&self.download_dir, &stem);
                return self.failure(request, FailureKind::Cancelled, "cancelled by user");
            }

            log::info!(
                "📡 [{}] attempt {}/{} [{}] via {}: {}",
                request.short_id(),
                index + 1,
                total,
                spec.label,
                self.service.name(),
                request.url
            );

            let result = tokio::select! {
                _ = cancel.cancelled() => None,
                result = self.service.extract(&request.url, spec) => Some(result),
            };

            let error = match result {
                None => {
                    cleanup_request_files(&self.download_dir, &stem);
                    return self.failure(request, FailureKind::Cancelled, "cancelled by user");
                }
                Some(Ok(media)) => {
                    log::info!(
                        "✅ [{}] attempt {}/{} [{}] succeeded ({:.2} MB)",
                        request.short_id(),
                        index + 1,
                        total,
                        spec.label,
                        media.file_size as f64 / (1024.0 * 1024.0)
                    );
                    cleanup_partial_files(&self.download_dir, &stem);
                    return ExtractionOutcome::Success(DownloadedArtifact::new(media.file_path, media.title));
                }
                Some(Err(e)) => e,
            };

            let raw = error.raw_text();
            let kind = classify_failure(&raw);
            log::warn!(
                "⚠️ [{}] attempt {}/{} [{}] failed ({}, {}): {}",
                request.short_id(),
                index + 1,
                total,
                spec.label,
                error.subcategory(),
                kind,
                raw
            );
            cleanup_request_files(&self.download_dir, &stem);

            let has_next = index + 1 < total;
            if kind.allows_fallback() && has_next {
                log::info!("🔄 [{}] falling back to [{}]", request.short_id(), chain[index + 1].label);
                continue;
            }

            let kind = if kind == FailureKind::AccessRestricted && report.status == CredentialStatus::Malformed {
                FailureKind::CredentialInvalid
            } else {
                kind
            };
            return self.failure(request, kind, &raw);
        }

        // Every iteration returns or continues; the last one cannot continue.
        self.failure(request, FailureKind::Unknown, "fallback chain exhausted")
    }
}
