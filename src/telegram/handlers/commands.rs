//! `/start`, `/help` and `/cancel`

use teloxide::prelude::*;
use teloxide::types::{Message, ParseMode};

use super::types::{HandlerDeps, HandlerError};
use crate::core::messages;

pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, messages::WELCOME)
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}

pub(super) async fn handle_help_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, messages::HELP).await?;
    Ok(())
}

pub(super) async fn handle_cancel_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let text = if deps.inflight.cancel(msg.chat.id.0) {
        log::info!("🛑 Cancel requested by chat {}", msg.chat.id);
        messages::CANCEL_REQUESTED
    } else {
        messages::NOTHING_TO_CANCEL
    };
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}
