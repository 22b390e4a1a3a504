//! Configuration providers.
//!
//! A provider is any named source able to produce an [`ItemList`] on demand.
//! Concrete variants cover in-memory overrides and sources that failed
//! during setup; file and environment sources are backed by an
//! [`InMemoryProvider`] so they can be refreshed in place.

mod error_provider;
mod in_memory;

use std::fmt;

pub use error_provider::ErrorProvider;
pub use in_memory::InMemoryProvider;

use crate::ItemList;

/// The concrete variant behind a registered provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Items held in memory and added programmatically.
    InMemory,
    /// Items decoded from a single file.
    File,
    /// Items imported from the process environment.
    Env,
    /// A source that could not be set up.
    Error,
    /// Anything registered by the caller.
    Custom,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::InMemory => write!(f, "in-memory"),
            ProviderKind::File => write!(f, "file"),
            ProviderKind::Env => write!(f, "env"),
            ProviderKind::Error => write!(f, "error"),
            ProviderKind::Custom => write!(f, "custom"),
        }
    }
}

/// A source of configuration items.
///
/// Providers are invoked on every resolve and must be cheap to call
/// repeatedly. Errors are reported through [`ItemList::error`] and never
/// abort resolution.
pub trait Provider: Send + Sync {
    /// Produces the provider's current items.
    fn items(&self) -> ItemList;

    /// The concrete variant, used for diagnostics.
    fn kind(&self) -> ProviderKind {
        ProviderKind::Custom
    }

    /// Releases any resources held by the provider.
    fn close(&self) {}
}

impl<F> Provider for F
where
    F: Fn() -> ItemList + Send + Sync,
{
    fn items(&self) -> ItemList {
        self()
    }
}
