//! Chat sender that records what would have been sent to Telegram
//!
//! For videos it records whether the file still existed when sending began,
//! which is how tests check artifact lifetime around transmission.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clipdrop::core::error::{AppError, AppResult};
use clipdrop::download::ChatSender;

/// One recorded outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Video {
        chat_id: i64,
        path: PathBuf,
        caption: String,
        file_existed: bool,
    },
    Text {
        chat_id: i64,
        text: String,
    },
}

/// How `send_video` behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendBehavior {
    Succeed,
    Fail,
    Hang,
}

pub struct RecordingSender {
    behavior: SendBehavior,
    sent: Mutex<Vec<Sent>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::with_behavior(SendBehavior::Succeed)
    }

    pub fn with_behavior(behavior: SendBehavior) -> Self {
        Self {
            behavior,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                Sent::Video { .. } => None,
            })
            .collect()
    }

    pub fn videos(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::Video { .. }))
            .collect()
    }
}

#[async_trait]
impl ChatSender for RecordingSender {
    async fn send_video(&self, chat_id: i64, path: &Path, caption: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(Sent::Video {
            chat_id,
            path: path.to_path_buf(),
            caption: caption.to_string(),
            file_existed: path.is_file(),
        });
        match self.behavior {
            SendBehavior::Succeed => Ok(()),
            SendBehavior::Fail => Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "upload rejected",
            ))),
            SendBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        }
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }
}
