//! Process execution utilities with timeout support
//!
//! Helpers for running external processes (yt-dlp) with a timeout so a hung
//! extractor cannot hold a download slot forever.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Why a child process did not produce output.
#[derive(Debug)]
pub enum ProcessFailure {
    /// The binary could not be started (not installed, not executable)
    Spawn(std::io::Error),
    /// The process ran longer than the allowed timeout and was killed
    TimedOut(Duration),
}

impl std::fmt::Display for ProcessFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessFailure::Spawn(e) => write!(f, "failed to start process: {}", e),
            ProcessFailure::TimedOut(t) => write!(f, "process timed out after {}s", t.as_secs()),
        }
    }
}

/// Run an async Command with a timeout.
///
/// The child is spawned with `kill_on_drop(true)`: when the timeout fires, or
/// when the caller's future is dropped (cancellation), the process is killed
/// instead of lingering in the background.
pub async fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Output, ProcessFailure> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(ProcessFailure::Spawn(e)),
        Err(_) => Err(ProcessFailure::TimedOut(timeout)),
    }
}
