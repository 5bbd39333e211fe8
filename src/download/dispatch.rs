//! Sends the pipeline's result back to the chat.
//!
//! The artifact is removed on every path out of [`ResultDispatcher::dispatch`]:
//! after a successful send, after a send error and after a send timeout.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::core::error::{AppError, AppResult};
use crate::download::artifact::DownloadedArtifact;
use crate::download::ytdlp_errors::{failure_text, FailureKind};

/// What the pipeline wants sent to the chat.
#[derive(Debug)]
pub enum DispatchAction {
    SendVideo { artifact: DownloadedArtifact, caption: String },
    SendText { text: String },
}

/// What actually reached the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchReport {
    VideoSent,
    TextSent,
    /// The artifact vanished before sending; a failure notice was sent instead
    ArtifactMissing,
}

/// Outbound side of the chat transport.
#[async_trait]
pub trait ChatSender: Send + Sync {
    async fn send_video(&self, chat_id: i64, path: &Path, caption: &str) -> AppResult<()>;

    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<()>;
}

pub struct ResultDispatcher {
    sender: Arc<dyn ChatSender>,
    send_timeout: Duration,
}

impl ResultDispatcher {
    pub fn new(sender: Arc<dyn ChatSender>, send_timeout: Duration) -> Self {
        Self { sender, send_timeout }
    }

    pub async fn dispatch(&self, chat_id: i64, action: DispatchAction) -> AppResult<DispatchReport> {
        match action {
            DispatchAction::SendText { text } => {
                self.sender.send_text(chat_id, &text).await?;
                Ok(DispatchReport::TextSent)
            }
            DispatchAction::SendVideo { artifact, caption } => self.send_artifact(chat_id, artifact, &caption).await,
        }
    }

    async fn send_artifact(
        &self,
        chat_id: i64,
        artifact: DownloadedArtifact,
        caption: &str,
    ) -> AppResult<DispatchReport> {
        if !artifact.exists() {
            log::error!("❌ Artifact missing before send: {}", artifact.path().display());
            drop(artifact);
            self.sender
                .send_text(chat_id, &failure_text(FailureKind::Unknown, None))
                .await?;
            return Ok(DispatchReport::ArtifactMissing);
        }

        let size = fs_err::metadata(artifact.path()).map(|m| m.len()).unwrap_or(0);
        log::info!(
            "📤 Sending {} ({:.2} MB) to chat {}",
            artifact.path().display(),
            size as f64 / (1024.0 * 1024.0),
            chat_id
        );

        let result = tokio::time::timeout(
            self.send_timeout,
            self.sender.send_video(chat_id, artifact.path(), caption),
        )
        .await;

        if let Err(e) = artifact.remove() {
            log::warn!("Failed to remove artifact after send: {}", e);
        }

        let error = match result {
            Ok(Ok(())) => {
                log::info!("✅ Video sent to chat {}", chat_id);
                return Ok(DispatchReport::VideoSent);
            }
            Ok(Err(e)) => e,
            Err(_) => AppError::SendTimeout(self.send_timeout.as_secs()),
        };

        log::error!("❌ Failed to send video to chat {}: {}", chat_id, error);
        let kind = match error {
            AppError::SendTimeout(_) => FailureKind::Timeout,
            _ => FailureKind::Unknown,
        };
        if let Err(e) = self.sender.send_text(chat_id, &failure_text(kind, None)).await {
            log::warn!("Failed to send failure notice to chat {}: {}", chat_id, e);
        }
        Err(error)
    }
}
