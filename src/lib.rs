//! configstore - Dynamic configuration aggregation.
//!
//! Collects key/value items from files, directories of files, environment
//! variables and in-memory overrides, merges them by priority and tells
//! interested parties when file-backed sources change.
//!
//! - Providers registered by name, invoked on every resolve
//! - Priority resolution with last-registered-wins on ties
//! - Per-provider errors reported without hiding healthy sources
//! - Polling refresh of file sources with watcher notification
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use configstore::{Item, Store};
//!
//! # async fn run() {
//! let store = Store::new();
//! store.add_file_refresh("/etc/myapp/config.yaml");
//! store.add_env("MYAPP");
//! store.in_memory("overrides").push(Item::new("log-level", "debug", 100));
//!
//! let resolved = store.resolve();
//! println!("log level: {:?}", resolved.value("log-level"));
//!
//! let mut watcher = store.register_watcher();
//! while watcher.changed().await.is_some() {
//!     let resolved = store.resolve();
//!     println!("reloaded {} keys", resolved.len());
//! }
//! # }
//! ```

/// Error types and result alias.
pub mod error;

/// Configuration items and item lists.
pub mod item;

/// Provider trait and the in-memory and error providers.
pub mod providers;

/// Provider registry, resolution and watchers.
pub mod store;

/// File, directory and environment sources.
pub mod sources;

/// Decoders for file contents.
pub mod decode;

/// Pluggable sinks for setup diagnostics.
pub mod diagnostics;

/// Store tunables.
pub mod options;

/// Tracing subscriber setup for applications embedding the store.
pub mod tracing_config;

pub use error::{ConfigStoreError, Result};
pub use item::{Item, ItemList};
pub use options::StoreOptions;
pub use providers::{ErrorProvider, InMemoryProvider, Provider, ProviderKind};
pub use store::{ProviderFailure, ProviderInfo, Resolution, Store, Watcher};
