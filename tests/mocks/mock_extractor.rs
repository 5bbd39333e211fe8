//! Scripted extraction service

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use clipdrop::download::source::ytdlp::template_location;
use clipdrop::download::{ExtractedMedia, ExtractionAttemptSpec, ExtractionError, ExtractionService};

/// What the next call to `extract` does
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Fail with this stderr text
    Fail(String),
    /// Write `<stem>.mp4` and report this title
    Succeed(Option<String>),
    /// Never finish (until dropped)
    Hang,
}

impl MockStep {
    pub fn fail(text: &str) -> Self {
        MockStep::Fail(text.to_string())
    }

    pub fn succeed(title: &str) -> Self {
        MockStep::Succeed(Some(title.to_string()))
    }
}

/// Plays back steps in order; records the spec of every call.
pub struct MockExtractor {
    steps: Mutex<VecDeque<MockStep>>,
    calls: Mutex<Vec<ExtractionAttemptSpec>>,
}

impl MockExtractor {
    pub fn new(steps: Vec<MockStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with the same text
    pub fn always_failing(text: &str, times: usize) -> Self {
        Self::new(vec![MockStep::fail(text); times])
    }

    pub fn calls(&self) -> Vec<ExtractionAttemptSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.calls().iter().map(|s| s.label).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ExtractionService for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, _url: &Url, spec: &ExtractionAttemptSpec) -> Result<ExtractedMedia, ExtractionError> {
        self.calls.lock().unwrap().push(spec.clone());
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockStep::fail("ERROR: mock script exhausted"));

        let (dir, stem) = template_location(&spec.output_template);
        // yt-dlp leaves a partial file behind while it works
        std::fs::write(dir.join(format!("{}.mp4.part", stem)), b"partial").unwrap();

        match step {
            MockStep::Fail(stderr) => Err(ExtractionError::Failed {
                stderr,
                exit_code: Some(1),
            }),
            MockStep::Succeed(title) => {
                let path: PathBuf = dir.join(format!("{}.mp4", stem));
                std::fs::write(&path, b"fake video bytes").unwrap();
                Ok(ExtractedMedia {
                    file_path: path,
                    title,
                    file_size: 16,
                })
            }
            MockStep::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(ExtractionError::TimedOut(Duration::from_secs(60)))
            }
        }
    }
}
