//! clipdrop - Telegram bot that turns video links into video messages
//!
//! A link goes through validation, a per-request cookie probe, an ordered
//! chain of yt-dlp attempts with failure classification, and finally back to
//! the chat as a video or an error message.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, validation and common utilities
//! - `download`: Credential probe, attempt chain, orchestrator, dispatch
//! - `telegram`: Bot creation, commands and the dispatcher schema

pub mod cli;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppConfig, AppError, AppResult};
pub use download::{DispatchAction, DownloadRequest, ExtractionOutcome, FailureKind, VideoPipeline};
