//! Handler types and dependencies

use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::download::dispatch::ResultDispatcher;
use crate::download::inflight::InFlightRegistry;
use crate::download::pipeline::VideoPipeline;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub pipeline: Arc<VideoPipeline>,
    pub dispatcher: Arc<ResultDispatcher>,
    pub inflight: Arc<InFlightRegistry>,
    /// Bounds how many requests run yt-dlp at the same time
    pub download_slots: Arc<Semaphore>,
}

impl HandlerDeps {
    pub fn new(
        pipeline: Arc<VideoPipeline>,
        dispatcher: Arc<ResultDispatcher>,
        max_concurrent_downloads: usize,
    ) -> Self {
        Self {
            pipeline,
            dispatcher,
            inflight: InFlightRegistry::new(),
            download_slots: Arc::new(Semaphore::new(max_concurrent_downloads)),
        }
    }
}
