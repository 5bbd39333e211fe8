//! Request pipeline: probe → chain → orchestrator → dispatch action.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::core::config::{self, AppConfig};
use crate::core::error::AppResult;
use crate::core::messages;
use crate::core::utils::truncate_chars;
use crate::core::validation::parse_link;
use crate::download::builder::AttemptChainBuilder;
use crate::download::cookies::probe_credentials;
use crate::download::dispatch::DispatchAction;
use crate::download::orchestrator::{DownloadOrchestrator, ExtractionOutcome};
use crate::download::request::DownloadRequest;
use crate::download::source::ExtractionService;
use crate::download::ytdlp_errors::failure_text;

/// `🎬 <title>`, capped at the Telegram caption limit.
pub fn caption_for(title: Option<&str>) -> String {
    let caption = format!("🎬 {}", title.unwrap_or(messages::DEFAULT_TITLE));
    truncate_chars(&caption, config::validation::MAX_CAPTION_CHARS - 1)
}

/// Validates user text into a request, or returns the reply for bad input.
pub fn admit(text: &str, chat_id: i64) -> Result<DownloadRequest, DispatchAction> {
    match parse_link(text) {
        Ok(url) => Ok(DownloadRequest::new(url, chat_id)),
        Err(e) => {
            log::info!("⚠️ Rejected input from chat {}: {}", chat_id, e);
            Err(DispatchAction::SendText {
                text: messages::INVALID_LINK.to_string(),
            })
        }
    }
}

/// Turns one request into one dispatch action.
pub struct VideoPipeline {
    builder: AttemptChainBuilder,
    orchestrator: DownloadOrchestrator,
    cookies_file: PathBuf,
    site_marker: String,
    download_dir: PathBuf,
    show_error_details: bool,
}

impl VideoPipeline {
    pub fn new(config: &AppConfig, service: Arc<dyn ExtractionService>) -> Self {
        Self {
            builder: AttemptChainBuilder::from_config(config),
            orchestrator: DownloadOrchestrator::new(service, &config.download_dir)
                .require_cookies(config.require_cookies),
            cookies_file: config.cookies_file.clone(),
            site_marker: config.cookies_site_marker.clone(),
            download_dir: config.download_dir.clone(),
            show_error_details: config.show_error_details,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Creates the scratch directory if needed.
    pub fn ensure_download_dir(&self) -> AppResult<()> {
        fs_err::create_dir_all(&self.download_dir)?;
        Ok(())
    }

    /// Downloads the request and decides what to send back.
    ///
    /// Credentials are probed on every call, so cookie file edits take effect
    /// without a restart.
    pub async fn handle(&self, request: &DownloadRequest, cancel: &CancellationToken) -> DispatchAction {
        log::info!(
            "📥 [{}] chat {} requested {}",
            request.short_id(),
            request.chat_id,
            request.url
        );

        let report = probe_credentials(&self.cookies_file, &self.site_marker);
        log::debug!("[{}] cookies: {:?} ({})", request.short_id(), report.status, report.diagnostic);

        let chain = self.builder.build(request, &report);
        let labels: Vec<&str> = chain.iter().map(|s| s.label).collect();
        log::debug!("[{}] chain: {:?}", request.short_id(), labels);

        match self.orchestrator.run(request, &chain, &report, cancel).await {
            ExtractionOutcome::Success(artifact) => {
                let caption = caption_for(artifact.title());
                DispatchAction::SendVideo { artifact, caption }
            }
            ExtractionOutcome::Failure { raw_error, kind } => {
                let detail = self.show_error_details.then_some(raw_error.as_str());
                DispatchAction::SendText {
                    text: failure_text(kind, detail),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_defaults_to_video() {
        assert_eq!(caption_for(None), "🎬 فيديو");
        assert_eq!(caption_for(Some("Demo")), "🎬 Demo");
    }

    #[test]
    fn test_caption_is_capped() {
        let title = "ع".repeat(5000);
        let caption = caption_for(Some(&title));
        assert!(caption.chars().count() <= config::validation::MAX_CAPTION_CHARS);
        assert!(caption.ends_with('…'));
    }

    #[test]
    fn test_admit_rejects_non_links() {
        match admit("not-a-url", 1) {
            Err(DispatchAction::SendText { text }) => assert_eq!(text, "⚠️ الرابط غير صحيح"),
            other => panic!("unexpected: {:?}", other),
        }
        let request = admit("  https://example.com/video ", 9).unwrap();
        assert_eq!(request.chat_id, 9);
        assert_eq!(request.url.as_str(), "https://example.com/video");
    }
}
