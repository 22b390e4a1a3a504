//! Provider registry with priority resolution and change notification.
//!
//! The [`Store`] keeps named providers in registration order, merges their
//! items on demand and fans change notifications out to [`Watcher`]s.

mod registry;
mod resolution;
mod watchers;

#[cfg(test)]
mod tests;

pub(crate) use watchers::WatcherRegistry;

pub use registry::{ProviderInfo, Store};
pub use resolution::{ProviderFailure, Resolution};
pub use watchers::Watcher;
