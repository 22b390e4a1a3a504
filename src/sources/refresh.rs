use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, SystemTime},
};

use tokio::{
    fs,
    runtime::Handle,
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, trace, warn};

use crate::{
    Store, decode::Decoder, providers::InMemoryProvider, store::WatcherRegistry,
};

/// Controls the background task polling one refreshable file.
///
/// The task ends when [`RefreshHandle::stop`] is called or the handle is
/// dropped.
pub(crate) struct RefreshHandle {
    name: String,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Name of the source being refreshed.
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Asks the task to stop after its current tick.
    pub(crate) fn stop(&self) {
        if let Err(e) = self.stop.send(true) {
            trace!(source = %self.name, error = %e, "refresh task already gone");
        }
    }

    /// Whether the task has exited.
    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the task and waits for it to exit.
    pub(crate) async fn shutdown(self) {
        self.stop();

        if let Err(e) = self.task.await {
            warn!(source = %self.name, error = %e, "refresh task did not exit cleanly");
        }
    }
}

/// State owned by one refresh task
struct RefreshTask {
    path: PathBuf,
    decoder: Decoder,
    backing: InMemoryProvider,
    watchers: Arc<WatcherRegistry>,
    last_modified: SystemTime,
}

impl RefreshTask {
    async fn run(mut self, period: Duration, mut stop: watch::Receiver<bool>) {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Fires on an explicit stop and when the handle is dropped.
                _ = stop.changed() => break,

                _ = ticker.tick() => {
                    if self.poll().await {
                        let remaining = self.watchers.notify();
                        debug!(
                            path = %self.path.display(),
                            watchers = remaining,
                            "configuration file reloaded"
                        );
                    }
                }
            }
        }

        debug!(path = %self.path.display(), "refresh task stopped");
    }

    /// Reloads the file if it changed since the last successful check.
    ///
    /// Returns `true` when new items were swapped in. Any failure leaves the
    /// previous items untouched.
    async fn poll(&mut self) -> bool {
        let modified = match fs::metadata(&self.path).await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                trace!(path = %self.path.display(), error = %e, "stat failed, skipping tick");
                return false;
            }
        };

        if modified <= self.last_modified {
            return false;
        }
        self.last_modified = modified;

        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                trace!(path = %self.path.display(), error = %e, "read failed, keeping previous items");
                return false;
            }
        };

        match (self.decoder)(&bytes) {
            Ok(items) => {
                self.backing.replace(items);
                true
            }
            Err(e) => {
                trace!(path = %self.path.display(), error = %e, "decode failed, keeping previous items");
                false
            }
        }
    }
}

impl Store {
    pub(super) fn start_refresh(
        &self,
        name: String,
        path: PathBuf,
        decoder: Decoder,
        backing: InMemoryProvider,
        last_modified: SystemTime,
    ) {
        let Ok(runtime) = Handle::try_current() else {
            self.diagnostics()
                .error(&format!("refresh disabled for {name}: no tokio runtime available"));
            return;
        };

        let (stop_tx, stop_rx) = watch::channel(false);
        let task = RefreshTask {
            path,
            decoder,
            backing,
            watchers: self.watcher_registry(),
            last_modified,
        };

        let handle = runtime.spawn(task.run(self.options().refresh_interval(), stop_rx));

        self.add_refresher(RefreshHandle {
            name,
            stop: stop_tx,
            task: handle,
        });
    }
}
