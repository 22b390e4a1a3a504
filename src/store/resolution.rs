use std::collections::{BTreeMap, btree_map::Entry};

use crate::{ConfigStoreError, Item, ItemList, providers::ProviderKind};

/// A provider error collected during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    /// Name the provider was registered under.
    pub name: String,
    /// Concrete variant of the provider.
    pub kind: ProviderKind,
    /// The reported error.
    pub error: ConfigStoreError,
}

/// The merged view of every registered provider.
///
/// Holds the winning item per key together with every error reported while
/// invoking the providers. Errors never remove the items that did resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    items: BTreeMap<String, Item>,
    errors: Vec<ProviderFailure>,
}

impl Resolution {
    /// Folds one provider's output into the view.
    ///
    /// Must be called in registration order: on equal priority the item
    /// merged last wins.
    pub(crate) fn merge(&mut self, name: &str, kind: ProviderKind, list: ItemList) {
        for item in list.items {
            match self.items.entry(item.key().to_string()) {
                Entry::Vacant(entry) => {
                    entry.insert(item);
                }
                Entry::Occupied(mut entry) => {
                    if item.overrides(entry.get()) {
                        entry.insert(item);
                    }
                }
            }
        }

        if let Some(error) = list.error {
            self.errors.push(ProviderFailure {
                name: name.to_string(),
                kind,
                error,
            });
        }
    }

    /// The winning item for `key`.
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.items.get(key)
    }

    /// The winning value for `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(Item::value)
    }

    /// Number of resolved keys.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing resolved.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolved keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Resolved items in key order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Errors reported by providers, in registration order.
    pub fn errors(&self) -> &[ProviderFailure] {
        &self.errors
    }

    /// Whether every provider answered without error.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Flattens the view into a single list.
    ///
    /// The first provider error, if any, is carried over so the list still
    /// signals that it may be incomplete.
    pub fn into_item_list(self) -> ItemList {
        ItemList {
            items: self.items.into_values().collect(),
            error: self.errors.into_iter().next().map(|failure| failure.error),
        }
    }
}
