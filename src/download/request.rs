//! Validated download request.

use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

/// One validated link submitted by one chat.
///
/// Created only after the link passed validation; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Unique id; artifact file names are derived from it
    pub id: Uuid,
    /// Link to download
    pub url: Url,
    /// Requesting chat
    pub chat_id: i64,
    /// When the message was accepted
    pub submitted_at: DateTime<Utc>,
}

impl DownloadRequest {
    pub fn new(url: Url, chat_id: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            chat_id,
            submitted_at: Utc::now(),
        }
    }

    /// File stem shared by every file this request may create in the download dir.
    pub fn artifact_stem(&self) -> String {
        self.id.simple().to_string()
    }

    /// Short id for log lines.
    pub fn short_id(&self) -> String {
        self.artifact_stem().chars().take(8).collect()
    }
}
