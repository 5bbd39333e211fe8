//! Logging initialization and configuration checking
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Cookies configuration reporting at startup

use anyhow::Result;
use simplelog::*;
use std::str::FromStr;

use crate::download::cookies::{CredentialReport, CredentialStatus};

/// Parses a textual level, falling back to `Info` for unknown values.
pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim()).unwrap_or(LevelFilter::Info)
}

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file (created or truncated)
/// * `level` - Textual level (`info`, `debug`, ...)
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already set
pub fn init_logger(log_file_path: &str, level: &str) -> Result<()> {
    let log_file =
        fs_err::File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;
    let level = parse_level(level);

    CombinedLogger::init(vec![
        TermLogger::new(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, Config::default(), log_file.into_parts().0),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the cookies configuration at application startup
///
/// Only reports; a missing or malformed file never stops the bot because
/// the anonymous attempt does not need cookies.
pub fn log_cookies_configuration(report: &CredentialReport, require_cookies: bool) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🍪 Cookies Configuration Check");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match report.status {
        CredentialStatus::Valid => {
            log::info!("✅ YTDL_COOKIES_FILE: {}", report.path.display());
            log::info!("   {}", report.diagnostic);
            log::info!("   Authenticated attempts will be tried first");
        }
        CredentialStatus::Malformed => {
            log::warn!("⚠️  YTDL_COOKIES_FILE: {} (MALFORMED)", report.path.display());
            log::warn!("   {}", report.diagnostic);
            log::warn!("   Only anonymous attempts will be made until the file is replaced");
        }
        CredentialStatus::Missing => {
            log::warn!("⚠️  YTDL_COOKIES_FILE: {} (not found)", report.path.display());
            log::warn!("   Only anonymous attempts will be made");
        }
    }

    if require_cookies && report.status != CredentialStatus::Valid {
        log::error!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        log::error!("❌ REQUIRE_COOKIES=true but cookies are not usable - every download will be refused");
        log::error!("   Export cookies in Netscape format and point YTDL_COOKIES_FILE at them");
        log::error!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
}
