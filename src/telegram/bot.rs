//! Bot initialization
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command registration in the Telegram UI

use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use crate::core::config::{self, AppConfig};

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "الأوامر المتاحة:")]
pub enum Command {
    #[command(description = "رسالة الترحيب")]
    Start,
    #[command(description = "طريقة الاستخدام")]
    Help,
    #[command(description = "إلغاء التحميل الجاري")]
    Cancel,
}

/// Creates a Bot instance with custom or default API URL
///
/// The HTTP client timeout is longer than the send timeout so uploads are
/// bounded by the dispatcher, not cut short by reqwest.
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token, invalid BOT_API_URL or client build failure
pub fn create_bot(app: &AppConfig) -> anyhow::Result<Bot> {
    let token = app.require_bot_token()?;
    let client_timeout = config::network::timeout().max(app.send_timeout + std::time::Duration::from_secs(30));
    let client = ClientBuilder::new().timeout(client_timeout).build()?;
    let bot = Bot::with_client(token.expose_secret(), client);

    let bot = match &app.bot_api_url {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}

/// Registers the command list shown in the Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = Command::bot_commands();
    bot.set_my_commands(commands).await?;
    Ok(())
}
