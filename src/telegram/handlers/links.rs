//! Plain text messages: link candidates

use teloxide::prelude::*;
use teloxide::types::{Message, MessageId};

use super::types::{HandlerDeps, HandlerError};
use crate::core::messages;
use crate::download::inflight::InFlightGuard;
use crate::download::pipeline::admit;
use crate::download::request::DownloadRequest;

/// Validates the text, claims the chat and spawns the download.
///
/// Returns as soon as the request is queued; the dispatcher is never blocked
/// by a running download.
pub(super) async fn handle_link_message(bot: Bot, msg: Message, deps: HandlerDeps) -> Result<(), HandlerError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    let request = match admit(text, chat_id.0) {
        Ok(request) => request,
        Err(action) => {
            deps.dispatcher.dispatch(chat_id.0, action).await?;
            return Ok(());
        }
    };

    let Some(guard) = deps.inflight.try_begin(chat_id.0, request.id) else {
        log::info!("⏳ Chat {} already has a download running", chat_id);
        bot.send_message(chat_id, messages::BUSY).await?;
        return Ok(());
    };

    let progress = bot.send_message(chat_id, messages::PROGRESS).await?;

    tokio::spawn(process_request(bot, deps, request, guard, progress.id));
    Ok(())
}

async fn process_request(
    bot: Bot,
    deps: HandlerDeps,
    request: DownloadRequest,
    guard: InFlightGuard,
    progress_id: MessageId,
) {
    let chat_id = ChatId(request.chat_id);

    let permit = match deps.download_slots.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            log::error!("Download slots closed: {}", e);
            return;
        }
    };

    let waited = chrono::Utc::now() - request.submitted_at;
    if waited.num_seconds() > 0 {
        log::info!("[{}] waited {}s for a download slot", request.short_id(), waited.num_seconds());
    }

    let started = std::time::Instant::now();
    let action = deps.pipeline.handle(&request, guard.token()).await;
    drop(permit);

    match deps.dispatcher.dispatch(request.chat_id, action).await {
        Ok(report) => log::info!(
            "[{}] finished in {:.1}s: {:?}",
            request.short_id(),
            started.elapsed().as_secs_f64(),
            report
        ),
        Err(e) => log::error!("[{}] dispatch failed: {}", request.short_id(), e),
    }

    if let Err(e) = bot.delete_message(chat_id, progress_id).await {
        log::debug!("Failed to delete progress message in chat {}: {}", chat_id, e);
    }

    drop(guard);
}
