use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tracing::{debug, warn};

use crate::{
    ConfigStoreError,
    diagnostics::{Diagnostics, TracingDiagnostics},
    options::StoreOptions,
    providers::{ErrorProvider, InMemoryProvider, Provider, ProviderKind},
    sources::RefreshHandle,
};

use super::{
    Resolution,
    watchers::{Watcher, WatcherRegistry},
};

/// A registered provider together with its diagnostic label
#[derive(Clone)]
struct ProviderEntry {
    name: String,
    kind: ProviderKind,
    provider: Arc<dyn Provider>,
}

/// Diagnostic description of a registered provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Name the provider was registered under.
    pub name: String,
    /// Concrete variant of the provider.
    pub kind: ProviderKind,
}

/// The provider registry.
///
/// Owns the registered providers, the watchers waiting for changes and the
/// refresh tasks of file sources. Resolution is pull-based: [`Store::resolve`]
/// invokes every provider on demand, while watchers only learn that a new
/// resolve may give a different answer.
///
/// Cloning is cheap and every clone shares the same registry.
#[derive(Clone)]
pub struct Store {
    providers: Arc<RwLock<Vec<ProviderEntry>>>,
    watchers: Arc<WatcherRegistry>,
    refreshers: Arc<Mutex<Vec<RefreshHandle>>>,
    diagnostics: Arc<dyn Diagnostics>,
    options: StoreOptions,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty store with default options, logging through `tracing`.
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    /// Creates an empty store with the given options.
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            providers: Arc::new(RwLock::new(Vec::new())),
            watchers: Arc::new(WatcherRegistry::default()),
            refreshers: Arc::new(Mutex::new(Vec::new())),
            diagnostics: Arc::new(TracingDiagnostics),
            options,
        }
    }

    /// Replaces the sink receiving setup diagnostics.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// The options this store was built with.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Registers a provider under `name`.
    ///
    /// Names are labels for diagnostics only; registering the same name twice
    /// keeps both providers and both contribute items.
    pub fn register_provider(&self, name: impl Into<String>, provider: impl Provider + 'static) {
        self.register_shared(name, Arc::new(provider));
    }

    /// Registers a provider that is already shared elsewhere.
    pub fn register_shared(&self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        let kind = provider.kind();
        self.register_with_kind(name.into(), kind, provider);
    }

    /// Creates an in-memory provider, registers it under `name` and returns
    /// a handle for adding items.
    pub fn in_memory(&self, name: impl Into<String>) -> InMemoryProvider {
        let provider = InMemoryProvider::new();
        self.register_provider(name, provider.clone());
        provider
    }

    /// Lists the registered providers in registration order.
    pub fn providers(&self) -> Vec<ProviderInfo> {
        self.entries()
            .into_iter()
            .map(|entry| ProviderInfo {
                name: entry.name,
                kind: entry.kind,
            })
            .collect()
    }

    /// Invokes every provider and merges their items.
    ///
    /// Providers run in registration order. For each key the item with the
    /// highest priority wins; on equal priority the later-registered provider
    /// wins. Provider errors are collected in the result and never abort the
    /// merge.
    pub fn resolve(&self) -> Resolution {
        let entries = self.entries();
        let mut resolution = Resolution::default();

        for entry in &entries {
            let list = entry.provider.items();
            if let Some(error) = &list.error {
                debug!(provider = %entry.name, error = %error, "provider reported an error");
            }
            resolution.merge(&entry.name, entry.kind, list);
        }

        debug!(
            providers = entries.len(),
            keys = resolution.len(),
            errors = resolution.errors().len(),
            "resolved configuration"
        );

        resolution
    }

    /// Registers a new watcher.
    pub fn register_watcher(&self) -> Watcher {
        self.watchers.register()
    }

    /// Signals every watcher that the configuration may have changed.
    ///
    /// Does not resolve; watchers call [`Store::resolve`] themselves.
    pub fn notify_watchers(&self) {
        let remaining = self.watchers.notify();
        debug!(watchers = remaining, "notified watchers");
    }

    /// Number of live watchers.
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    /// Number of refresh tasks still running.
    pub fn active_refreshers(&self) -> usize {
        lock(&self.refreshers)
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Stops every refresh task, waits for them to exit and closes all
    /// providers.
    ///
    /// Registered providers stay resolvable afterwards; file sources simply
    /// stop following their files.
    pub async fn shutdown(&self) {
        let handles: Vec<RefreshHandle> = lock(&self.refreshers).drain(..).collect();

        for handle in handles {
            handle.shutdown().await;
        }

        for entry in self.entries() {
            entry.provider.close();
        }
    }

    pub(crate) fn register_with_kind(
        &self,
        name: String,
        kind: ProviderKind,
        provider: Arc<dyn Provider>,
    ) {
        debug!(provider = %name, %kind, "registering provider");

        let mut providers = match self.providers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        providers.push(ProviderEntry {
            name,
            kind,
            provider,
        });
    }

    /// Reports a setup failure and registers an error provider in place of
    /// the source.
    pub(crate) fn register_error(&self, name: String, error: ConfigStoreError) {
        self.diagnostics.error(&format!("error: {error}"));
        self.register_with_kind(name, ProviderKind::Error, Arc::new(ErrorProvider::new(error)));
    }

    pub(crate) fn diagnostics(&self) -> &dyn Diagnostics {
        self.diagnostics.as_ref()
    }

    pub(crate) fn watcher_registry(&self) -> Arc<WatcherRegistry> {
        Arc::clone(&self.watchers)
    }

    pub(crate) fn add_refresher(&self, handle: RefreshHandle) {
        let mut refreshers = lock(&self.refreshers);
        refreshers.retain(|existing| {
            let finished = existing.is_finished();
            if finished {
                warn!(source = %existing.name(), "refresh task exited unexpectedly");
            }
            !finished
        });
        refreshers.push(handle);
    }

    fn entries(&self) -> Vec<ProviderEntry> {
        match self.providers.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
