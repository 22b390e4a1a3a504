use tracing::{error, info};

/// Sink for the diagnostics a store emits while setting up providers.
///
/// Injected into the [`Store`](crate::Store) so applications decide where
/// setup failures and source announcements go.
pub trait Diagnostics: Send + Sync {
    /// Reports a failure, such as a source that could not be loaded.
    fn error(&self, message: &str);

    /// Reports progress, such as a source that was loaded.
    fn info(&self, message: &str);
}

/// Forwards diagnostics to `tracing` at error and info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn error(&self, message: &str) {
        error!(target: "configstore", "{message}");
    }

    fn info(&self, message: &str) {
        info!(target: "configstore", "{message}");
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn error(&self, _message: &str) {}

    fn info(&self, _message: &str) {}
}
