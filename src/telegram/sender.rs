//! teloxide-backed [`ChatSender`].

use async_trait::async_trait;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::InputFile;

use crate::core::error::AppResult;
use crate::download::dispatch::ChatSender;

#[derive(Clone)]
pub struct TeloxideSender {
    bot: Bot,
}

impl TeloxideSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatSender for TeloxideSender {
    async fn send_video(&self, chat_id: i64, path: &Path, caption: &str) -> AppResult<()> {
        self.bot
            .send_video(ChatId(chat_id), InputFile::file(path))
            .caption(caption)
            .supports_streaming(true)
            .await?;
        Ok(())
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }
}
