//! Download management: credential probing, fallback chain, extraction and dispatch

pub mod artifact;
pub mod builder;
pub mod cookies;
pub mod dispatch;
pub mod error;
pub mod inflight;
pub mod orchestrator;
pub mod pipeline;
pub mod request;
pub mod source;
pub mod ytdlp_errors;

// Re-exports for convenience
pub use artifact::DownloadedArtifact;
pub use builder::{AttemptChainBuilder, ExtractionAttemptSpec};
pub use cookies::{probe_credentials, CredentialReport, CredentialStatus};
pub use dispatch::{ChatSender, DispatchAction, DispatchReport, ResultDispatcher};
pub use error::ExtractionError;
pub use inflight::{InFlightGuard, InFlightRegistry};
pub use orchestrator::{DownloadOrchestrator, ExtractionOutcome};
pub use pipeline::VideoPipeline;
pub use request::DownloadRequest;
pub use source::{ExtractedMedia, ExtractionService, YtDlpService};
pub use ytdlp_errors::{classify_failure, FailureKind};
