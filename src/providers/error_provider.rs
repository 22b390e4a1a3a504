use super::{Provider, ProviderKind};
use crate::{ConfigStoreError, ItemList};

/// A provider that never yields items and always reports the same failure.
///
/// Registered in place of a source that could not be set up, so the source
/// keeps showing up in every resolution with its failure reason.
#[derive(Debug, Clone)]
pub struct ErrorProvider {
    error: ConfigStoreError,
}

impl ErrorProvider {
    /// Creates a provider that fails with `error` on every invocation.
    pub fn new(error: ConfigStoreError) -> Self {
        Self { error }
    }

    /// The captured setup failure.
    pub fn error(&self) -> &ConfigStoreError {
        &self.error
    }
}

impl Provider for ErrorProvider {
    fn items(&self) -> ItemList {
        ItemList::failed(self.error.clone())
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Error
    }
}
