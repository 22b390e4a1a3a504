use std::{slice, vec};

use serde::{Deserialize, Serialize};

use crate::ConfigStoreError;

/// A single configuration entry.
///
/// Items are immutable once built. The priority only matters when two items
/// share a key: the higher one wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    key: String,
    value: String,
    #[serde(default)]
    priority: i64,
}

impl Item {
    /// Creates a new item.
    pub fn new(key: impl Into<String>, value: impl Into<String>, priority: i64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            priority,
        }
    }

    /// The item key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The item value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The conflict-resolution priority.
    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Whether this item takes precedence over `current` for the same key.
    ///
    /// Equal priorities favour the item seen last, so callers that walk
    /// sources in registration order get last-registered-wins on ties.
    pub(crate) fn overrides(&self, current: &Item) -> bool {
        self.priority >= current.priority
    }
}

/// The result of invoking one provider.
///
/// Holds the items the provider produced and, when the list may be
/// incomplete or empty because something went wrong, the reason why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemList {
    /// Items in the order the provider produced them.
    pub items: Vec<Item>,
    /// Why the list may be incomplete, if anything failed.
    pub error: Option<ConfigStoreError>,
}

impl ItemList {
    /// Creates a successful list from the given items.
    pub fn new(items: Vec<Item>) -> Self {
        Self { items, error: None }
    }

    /// Creates an empty list carrying only an error.
    pub fn failed(error: ConfigStoreError) -> Self {
        Self {
            items: Vec::new(),
            error: Some(error),
        }
    }

    /// Attaches an error to an otherwise usable list.
    pub fn with_error(mut self, error: ConfigStoreError) -> Self {
        self.error = Some(error);
        self
    }

    /// Number of items in the list.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items in provider order.
    pub fn iter(&self) -> slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Returns the winning item for `key` within this list alone.
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.items
            .iter()
            .filter(|item| item.key == key)
            .fold(None, |best, item| match best {
                Some(current) if !item.overrides(current) => Some(current),
                _ => Some(item),
            })
    }

    /// Consumes the list, dropping any error.
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

impl From<Vec<Item>> for ItemList {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}

impl IntoIterator for ItemList {
    type Item = Item;
    type IntoIter = vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a Item;
    type IntoIter = slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
