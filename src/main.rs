use anyhow::Result;
use dotenvy::dotenv;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use clipdrop::cli::{Cli, Commands};
use clipdrop::core::validation::{parse_link, sanitize_filename};
use clipdrop::core::{config, init_logger, log_cookies_configuration, AppConfig};
use clipdrop::download::{
    DispatchAction, DownloadRequest, ExtractionService, ResultDispatcher, VideoPipeline, YtDlpService,
};
use clipdrop::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps, TeloxideSender};

/// Attempts to reach the Bot API at startup before giving up
const STARTUP_MAX_RETRIES: u32 = 12;

/// Main entry point
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, configuration, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Log panics inside spawned tasks instead of losing them on stderr
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // .env first so LOG_FILE_PATH / LOG_LEVEL from it are honoured
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH, &config::LOG_LEVEL)?;

    let app = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Run) => run_bot(app).await,
        Some(Commands::Download { url, output }) => run_cli_download(app, &url, &output).await,
        Some(Commands::CheckCookies) => {
            let report = app.probe_cookies();
            println!("{}", report.format_report());
            if app.require_cookies && !report.is_valid() {
                return Err(anyhow::anyhow!("REQUIRE_COOKIES=true but the cookie file is not usable"));
            }
            Ok(())
        }
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot(app).await
        }
    }
}

fn build_pipeline(app: &AppConfig) -> Result<Arc<VideoPipeline>> {
    let service: Arc<dyn ExtractionService> = Arc::new(YtDlpService::from_config(app));
    let pipeline = VideoPipeline::new(app, service);
    pipeline.ensure_download_dir()?;
    Ok(Arc::new(pipeline))
}

/// Run one download without Telegram and move the result into `output`
async fn run_cli_download(app: AppConfig, url: &str, output: &Path) -> Result<()> {
    let url = parse_link(url)?;
    let pipeline = build_pipeline(&app)?;

    println!("🎬 clipdrop download");
    println!("URL: {}", url);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let request = DownloadRequest::new(url, 0);
    match pipeline.handle(&request, &cancel).await {
        DispatchAction::SendVideo { artifact, caption } => {
            let name = artifact
                .title()
                .map(sanitize_filename)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| request.artifact_stem());
            let dest = output.join(format!("{}.{}", name, artifact.extension()));
            let saved = artifact.persist_to(&dest)?;
            println!("{}", caption);
            println!("✅ Saved to {}", saved.display());
            Ok(())
        }
        DispatchAction::SendText { text } => Err(anyhow::anyhow!("{}", text)),
    }
}

async fn run_bot(app: AppConfig) -> Result<()> {
    log::info!("Starting bot...");

    // Missing token is fatal before anything touches the network
    let bot = create_bot(&app)?;

    log_cookies_configuration(&app.probe_cookies(), app.require_cookies);
    log::info!("📁 Download dir: {}", app.download_dir.display());
    log::info!(
        "⚙️ yt-dlp: {} (timeout {}s), send timeout {}s, {} concurrent download(s)",
        app.ytdl_bin,
        app.ytdlp_timeout.as_secs(),
        app.send_timeout.as_secs(),
        app.max_concurrent_downloads
    );

    let pipeline = build_pipeline(&app)?;

    // Retry if Bot API is still initializing
    let mut startup_retry = 0;
    let me = loop {
        match bot.get_me().await {
            Ok(me) => break me,
            Err(e) => {
                startup_retry += 1;
                if startup_retry >= STARTUP_MAX_RETRIES {
                    return Err(anyhow::anyhow!(
                        "Failed to connect to Bot API after {} retries: {}",
                        startup_retry,
                        e
                    ));
                }
                log::warn!(
                    "Bot API not ready (attempt {}/{}): {}. Retrying in 5 seconds...",
                    startup_retry,
                    STARTUP_MAX_RETRIES,
                    e
                );
                sleep(Duration::from_secs(5)).await;
            }
        }
    };
    log::info!("Bot username: {:?}, Bot ID: {}", me.username.as_deref(), me.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let sender = Arc::new(TeloxideSender::new(bot.clone()));
    let dispatcher = Arc::new(ResultDispatcher::new(sender, app.send_timeout));
    let deps = HandlerDeps::new(pipeline, dispatcher, app.max_concurrent_downloads);

    log::info!("✅ Bot is running");

    Dispatcher::builder(bot, schema(deps))
        .default_handler(|upd| async move {
            log::debug!("Unhandled update: {:?}", upd.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("An error from the update listener"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Bot stopped");
    Ok(())
}
