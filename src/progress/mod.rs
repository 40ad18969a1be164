mod tracing_progress;

pub use tracing_progress::TracingProgress;

/// Creates a progress handle sized to the rows of one run.
pub trait ProgressReporter: Send + Sync + 'static {
    type Handle: ProgressHandle;

    fn create(&self, total: usize) -> Self::Handle;
}

/// Observes a run: one increment per row, free-form diagnostics, and a final stop.
pub trait ProgressHandle: Send + Sync {
    fn increment(&self);
    fn log(&self, message: &str);
    fn stop(&self);
}
