use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::progress::{ProgressHandle, ProgressReporter};

/// Reports progress through `tracing`, which the binary routes to stderr.
#[derive(Debug, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    type Handle = TracingProgressHandle;

    fn create(&self, total: usize) -> Self::Handle {
        TracingProgressHandle::new(total)
    }
}

#[derive(Debug)]
pub struct TracingProgressHandle {
    total: usize,
    processed: AtomicUsize,
    started: Instant
}

impl TracingProgressHandle {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: AtomicUsize::new(0),
            started: Instant::now()
        }
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }
}

impl ProgressHandle for TracingProgressHandle {
    fn increment(&self) {
        let processed = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Processed row [{processed}/{}]", self.total);
    }

    fn log(&self, message: &str) {
        warn!("{message}");
    }

    fn stop(&self) {
        info!("Processed [{}/{}] rows in: {:?}", self.processed(), self.total, self.started.elapsed());
    }
}
