use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clipdrop")]
#[command(author, version, about = "Telegram bot that downloads videos from links via yt-dlp", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,

    /// Download one link locally through the same fallback chain, without Telegram
    Download {
        /// Video URL
        url: String,

        /// Directory the finished file is moved into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Probe the cookie file and print the report
    CheckCookies,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
