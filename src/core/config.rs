use once_cell::sync::Lazy;
use secrecy::SecretString;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{AppError, AppResult};

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Read before `AppConfig` exists because the logger comes up first.
/// Default: clipdrop.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "clipdrop.log".to_string()));

/// Log level (error, warn, info, debug, trace)
/// Read from LOG_LEVEL environment variable
/// Default: info
pub static LOG_LEVEL: Lazy<String> = Lazy::new(|| env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

/// Download configuration
pub mod download {
    /// Timeout for a whole yt-dlp run (in seconds)
    pub const YTDLP_TIMEOUT_SECS: u64 = 300;

    /// Height ceiling for the first (credentialed) attempt
    pub const MAX_HEIGHT: u32 = 720;

    /// Height ceiling for the anonymous fallback attempt
    pub const FALLBACK_HEIGHT: u32 = 480;

    /// Socket timeout passed to yt-dlp for the credentialed attempt
    pub const PRIMARY_SOCKET_TIMEOUT_SECS: u64 = 30;

    /// Socket timeout passed to yt-dlp for the anonymous attempt
    pub const FALLBACK_SOCKET_TIMEOUT_SECS: u64 = 15;

    /// yt-dlp internal retries for the credentialed attempt
    pub const PRIMARY_RETRIES: u32 = 3;

    /// yt-dlp internal retries for the anonymous attempt
    pub const FALLBACK_RETRIES: u32 = 2;

    /// Maximum length of a raw diagnostic kept in outcomes and shown to users
    pub const DIAGNOSTIC_MAX_CHARS: usize = 300;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Upper bound for sending one video to Telegram (in seconds)
    /// Separate from the download timeout: uploads of large files are slow on their own.
    pub const SEND_TIMEOUT_SECS: u64 = 120;

    /// HTTP client timeout for the Bot API client; must exceed the send timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 180;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Cookie file configuration
pub mod credentials {
    /// Default cookie file location (Netscape format)
    pub const DEFAULT_COOKIES_FILE: &str = "cookies.txt";

    /// Substring that must appear in a usable cookie file
    pub const DEFAULT_SITE_MARKER: &str = "youtube.com";

    /// Files smaller than this cannot hold even one Netscape cookie line
    pub const MIN_COOKIE_FILE_BYTES: u64 = 64;
}

/// Queue processing configuration
pub mod queue {
    /// Maximum number of concurrent downloads
    /// Kept low: parallel yt-dlp runs from one IP get rate limited quickly
    pub const MAX_CONCURRENT_DOWNLOADS: usize = 2;
}

/// Validation configuration
pub mod validation {
    /// Maximum URL length (longer input is rejected before parsing)
    pub const MAX_URL_LENGTH: usize = 2048;

    /// Telegram caption limit (characters)
    pub const MAX_CAPTION_CHARS: usize = 1024;
}

/// Runtime configuration passed explicitly into the pipeline and dispatcher.
///
/// Built once in `main` from the environment. Tests build it with
/// [`AppConfig::from_lookup`] so they never touch process env.
#[derive(Debug)]
pub struct AppConfig {
    /// Bot token; only required by the `run` command
    pub bot_token: Option<SecretString>,
    /// Custom Bot API server (local telegram-bot-api)
    pub bot_api_url: Option<String>,
    /// yt-dlp binary
    pub ytdl_bin: String,
    /// Cookie file handed to yt-dlp for authenticated attempts
    pub cookies_file: PathBuf,
    /// Substring a cookie file must contain to be considered scoped to the right site
    pub cookies_site_marker: String,
    /// When set, a request without valid cookies fails before any attempt
    pub require_cookies: bool,
    /// Scratch directory for artifacts
    pub download_dir: PathBuf,
    /// Height ceiling of the first attempt
    pub max_height: u32,
    /// Height ceiling of the anonymous attempt
    pub fallback_height: u32,
    /// Whole-process yt-dlp timeout
    pub ytdlp_timeout: Duration,
    /// Upper bound on one transmission to Telegram
    pub send_timeout: Duration,
    /// Concurrent requests allowed to run yt-dlp
    pub max_concurrent_downloads: usize,
    /// Append truncated raw yt-dlp error to user-facing failure messages
    pub show_error_details: bool,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Numeric values that fail to parse
    /// are configuration errors rather than silently replaced by defaults.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("BOT_TOKEN")
            .or_else(|| get("TELOXIDE_TOKEN"))
            .or_else(|| get("TELEGRAM_BOT_TOKEN"))
            .map(SecretString::from);

        let cookies_file = get("YTDL_COOKIES_FILE").unwrap_or_else(|| credentials::DEFAULT_COOKIES_FILE.to_string());
        let download_dir = get("DOWNLOAD_FOLDER").unwrap_or_else(|| "~/downloads/clipdrop".to_string());

        let max_height = parse_or(&get, "VIDEO_MAX_HEIGHT", download::MAX_HEIGHT)?;
        let fallback_height = parse_or(&get, "VIDEO_FALLBACK_HEIGHT", download::FALLBACK_HEIGHT)?;
        if fallback_height > max_height {
            return Err(AppError::Config(format!(
                "VIDEO_FALLBACK_HEIGHT ({}) must not exceed VIDEO_MAX_HEIGHT ({})",
                fallback_height, max_height
            )));
        }

        let max_concurrent_downloads = parse_or(&get, "MAX_CONCURRENT_DOWNLOADS", queue::MAX_CONCURRENT_DOWNLOADS)?;
        if max_concurrent_downloads == 0 {
            return Err(AppError::Config("MAX_CONCURRENT_DOWNLOADS must be at least 1".to_string()));
        }

        Ok(Self {
            bot_token,
            bot_api_url: get("BOT_API_URL"),
            ytdl_bin: get("YTDL_BIN").unwrap_or_else(|| "yt-dlp".to_string()),
            cookies_file: PathBuf::from(shellexpand::tilde(&cookies_file).into_owned()),
            cookies_site_marker: get("COOKIES_SITE_MARKER")
                .unwrap_or_else(|| credentials::DEFAULT_SITE_MARKER.to_string()),
            require_cookies: parse_or(&get, "REQUIRE_COOKIES", false)?,
            download_dir: PathBuf::from(shellexpand::tilde(&download_dir).into_owned()),
            max_height,
            fallback_height,
            ytdlp_timeout: Duration::from_secs(parse_or(&get, "YTDLP_TIMEOUT_SECS", download::YTDLP_TIMEOUT_SECS)?),
            send_timeout: Duration::from_secs(parse_or(&get, "SEND_TIMEOUT_SECS", network::SEND_TIMEOUT_SECS)?),
            max_concurrent_downloads,
            show_error_details: parse_or(&get, "SHOW_ERROR_DETAILS", false)?,
        })
    }

    /// Returns the bot token or a fatal configuration error.
    pub fn require_bot_token(&self) -> AppResult<&SecretString> {
        self.bot_token
            .as_ref()
            .ok_or_else(|| AppError::Config("BOT_TOKEN (or TELOXIDE_TOKEN) environment variable not set".to_string()))
    }

    /// Probes the configured cookie file.
    pub fn probe_cookies(&self) -> crate::download::cookies::CredentialReport {
        crate::download::cookies::probe_credentials(&self.cookies_file, &self.cookies_site_marker)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("{}={:?} is invalid: {}", key, raw, e))),
        None => Ok(default),
    }
}
