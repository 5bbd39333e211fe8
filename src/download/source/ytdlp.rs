//! yt-dlp backed extraction service.
//!
//! One call runs one yt-dlp process for one attempt spec. The process is
//! bounded by a whole-run timeout and killed when the calling future is
//! dropped, which is how cancellation reaches the child.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use url::Url;

use crate::core::config::AppConfig;
use crate::core::process::{run_with_timeout, ProcessFailure};
use crate::download::artifact::find_request_file;
use crate::download::builder::ExtractionAttemptSpec;
use crate::download::error::ExtractionError;
use crate::download::source::{ExtractedMedia, ExtractionService};

/// Stderr lines kept for classification
const MAX_STDERR_LINES: usize = 200;

/// Subset of the `--dump-json` document we care about
#[derive(Debug, Default, Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
    #[serde(default)]
    requested_downloads: Vec<RequestedDownload>,
    #[serde(rename = "_filename")]
    filename: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RequestedDownload {
    filepath: Option<String>,
}

/// Runs yt-dlp as a child process.
#[derive(Debug, Clone)]
pub struct YtDlpService {
    ytdl_bin: String,
    timeout: Duration,
}

impl YtDlpService {
    pub fn new(ytdl_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ytdl_bin: ytdl_bin.into(),
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.ytdl_bin.clone(), config.ytdlp_timeout)
    }
}

/// Builds the yt-dlp argument list for one attempt.
pub fn build_args(url: &Url, spec: &ExtractionAttemptSpec) -> Vec<String> {
    let mut args: Vec<String> = [
        "--no-playlist",
        "--no-simulate",
        "--dump-json",
        "--newline",
        "--no-progress",
        "--force-overwrites",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    args.extend([
        "-f".to_string(),
        spec.format.clone(),
        "-o".to_string(),
        spec.output_template.clone(),
        "--socket-timeout".to_string(),
        spec.socket_timeout.as_secs().to_string(),
        "--retries".to_string(),
        spec.retries.to_string(),
    ]);

    if spec.attach_credentials {
        if let Some(path) = &spec.cookies_path {
            args.push("--cookies".to_string());
            args.push(path.to_string_lossy().into_owned());
        }
    }

    for (name, value) in &spec.headers {
        args.push("--add-header".to_string());
        args.push(format!("{}:{}", name, value));
    }

    args.push(url.as_str().to_string());
    args
}

/// Directory and file stem encoded in an output template like `/dir/<stem>.%(ext)s`.
pub fn template_location(template: &str) -> (PathBuf, String) {
    let path = Path::new(template);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let stem = name.split(".%(").next().unwrap_or_default().to_string();
    (dir, stem)
}

/// Last JSON object printed on stdout, if any
fn parse_info(stdout: &str) -> Option<Result<YtDlpInfo, serde_json::Error>> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with('{'))
        .map(serde_json::from_str)
}

/// Keeps the tail of stderr so one chatty run cannot grow memory unbounded.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(MAX_STDERR_LINES);
    lines[start..].join("\n").trim().to_string()
}

fn locate_output(info: &YtDlpInfo, template: &str) -> Option<PathBuf> {
    let reported = info
        .requested_downloads
        .iter()
        .filter_map(|d| d.filepath.as_deref())
        .chain(info.filename.as_deref())
        .map(PathBuf::from)
        .find(|p| p.is_file());
    if reported.is_some() {
        return reported;
    }

    let (dir, stem) = template_location(template);
    if stem.is_empty() {
        return None;
    }
    log::warn!("yt-dlp did not report an existing file, searching {} for {}", dir.display(), stem);
    find_request_file(&dir, &stem)
}

#[async_trait]
impl ExtractionService for YtDlpService {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn extract(&self, url: &Url, spec: &ExtractionAttemptSpec) -> Result<ExtractedMedia, ExtractionError> {
        let args = build_args(url, spec);
        log::debug!("yt-dlp command: {} {}", self.ytdl_bin, args.join(" "));

        let mut cmd = Command::new(&self.ytdl_bin);
        cmd.args(&args);

        let output = run_with_timeout(&mut cmd, self.timeout).await.map_err(|e| match e {
            ProcessFailure::Spawn(err) => ExtractionError::Spawn(err.to_string()),
            ProcessFailure::TimedOut(t) => ExtractionError::TimedOut(t),
        })?;

        if !output.status.success() {
            let mut stderr = stderr_tail(&output.stderr);
            if stderr.is_empty() {
                stderr = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(ExtractionError::Failed {
                stderr,
                exit_code: output.status.code(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let (info, parse_error) = match parse_info(&stdout) {
            Some(Ok(info)) => (info, None),
            Some(Err(e)) => {
                log::warn!("Failed to parse yt-dlp metadata: {}", e);
                (YtDlpInfo::default(), Some(e))
            }
            None => (YtDlpInfo::default(), None),
        };

        let Some(file_path) = locate_output(&info, &spec.output_template) else {
            return Err(match parse_error {
                Some(e) => ExtractionError::Metadata(e),
                None => ExtractionError::OutputMissing(spec.output_template.clone()),
            });
        };

        let file_size = fs_err::metadata(&file_path).map(|m| m.len()).unwrap_or(0);
        log::info!(
            "✅ yt-dlp finished: {} ({:.2} MB)",
            file_path.display(),
            file_size as f64 / (1024.0 * 1024.0)
        );

        Ok(ExtractedMedia {
            file_path,
            title: info.title,
            file_size,
        })
    }
}
