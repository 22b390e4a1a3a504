use std::sync::{Arc, Mutex, MutexGuard};

use super::{Provider, ProviderKind};
use crate::{Item, ItemList};

/// A mutable, lock-guarded list of items.
///
/// Cloning shares the underlying list, so a clone handed to a refresh task
/// and the one registered with the store always see the same items.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    items: Arc<Mutex<Vec<Item>>>,
}

impl InMemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends items and returns `self` for chaining.
    pub fn add(&self, items: impl IntoIterator<Item = Item>) -> &Self {
        self.lock().extend(items);
        self
    }

    /// Appends a single item and returns `self` for chaining.
    pub fn push(&self, item: Item) -> &Self {
        self.lock().push(item);
        self
    }

    /// Swaps the whole list for `items`.
    pub fn replace(&self, items: Vec<Item>) {
        *self.lock() = items;
    }

    /// Returns a point-in-time copy of the items.
    pub fn snapshot(&self) -> Vec<Item> {
        self.lock().clone()
    }

    // The guarded data is a plain vector that is never left half-written,
    // so a poisoned lock still holds a consistent list.
    fn lock(&self) -> MutexGuard<'_, Vec<Item>> {
        match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Provider for InMemoryProvider {
    fn items(&self) -> ItemList {
        ItemList::new(self.snapshot())
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::InMemory
    }
}
