//! Unit tests for the store module
//! No filesystem or environment dependencies.

#![allow(clippy::panic, clippy::unwrap_used)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use futures::StreamExt;

use crate::{
    ConfigStoreError, Item, ItemList,
    diagnostics::Diagnostics,
    providers::{ErrorProvider, ProviderKind},
    store::{ProviderInfo, Store},
};

fn items(list: &[(&str, &str, i64)]) -> ItemList {
    ItemList::new(
        list.iter()
            .map(|(key, value, priority)| Item::new(*key, *value, *priority))
            .collect(),
    )
}

#[derive(Default)]
struct RecordingDiagnostics {
    errors: Mutex<Vec<String>>,
    infos: Mutex<Vec<String>>,
}

impl Diagnostics for RecordingDiagnostics {
    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }
}

mod resolution {
    use super::*;

    #[test]
    fn empty_store_resolves_to_empty_view() {
        let resolution = Store::new().resolve();

        assert!(resolution.is_empty());
        assert!(resolution.is_complete());
    }

    #[test]
    fn disjoint_providers_resolve_to_union() {
        let store = Store::new();
        store.register_provider("one", || items(&[("a", "1", 0), ("b", "2", 7)]));
        store.register_provider("two", || items(&[("c", "3", -4)]));

        let resolution = store.resolve();

        assert_eq!(resolution.len(), 3);
        assert_eq!(resolution.get("a"), Some(&Item::new("a", "1", 0)));
        assert_eq!(resolution.get("b"), Some(&Item::new("b", "2", 7)));
        assert_eq!(resolution.get("c"), Some(&Item::new("c", "3", -4)));
        assert_eq!(resolution.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn higher_priority_wins_regardless_of_order() {
        let low_first = Store::new();
        low_first.register_provider("low", || items(&[("k", "low", 1)]));
        low_first.register_provider("high", || items(&[("k", "high", 2)]));

        let high_first = Store::new();
        high_first.register_provider("high", || items(&[("k", "high", 2)]));
        high_first.register_provider("low", || items(&[("k", "low", 1)]));

        assert_eq!(low_first.resolve().value("k"), Some("high"));
        assert_eq!(high_first.resolve().value("k"), Some("high"));
    }

    #[test]
    fn equal_priority_later_registration_wins() {
        let store = Store::new();
        store.register_provider("first", || items(&[("k", "first", 5)]));
        store.register_provider("second", || items(&[("k", "second", 5)]));

        assert_eq!(store.resolve().value("k"), Some("second"));
    }

    #[test]
    fn failing_provider_is_reported_on_every_resolve() {
        let store = Store::new();
        store.register_provider("good", || items(&[("a", "1", 0)]));
        store.register_provider(
            "bad",
            ErrorProvider::new(ConfigStoreError::provider("bad", "unavailable")),
        );

        for _ in 0..3 {
            let resolution = store.resolve();
            assert_eq!(resolution.value("a"), Some("1"));
            assert_eq!(resolution.len(), 1);
            assert_eq!(resolution.errors().len(), 1);
            assert_eq!(resolution.errors()[0].name, "bad");
            assert_eq!(resolution.errors()[0].kind, ProviderKind::Error);
        }
    }

    #[test]
    fn partial_items_still_merge_alongside_error() {
        let store = Store::new();
        store.register_provider("partial", || {
            items(&[("a", "1", 0)]).with_error(ConfigStoreError::provider("partial", "truncated"))
        });

        let resolution = store.resolve();

        assert_eq!(resolution.value("a"), Some("1"));
        assert!(!resolution.is_complete());

        let flattened = resolution.into_item_list();
        assert_eq!(flattened.len(), 1);
        assert!(flattened.error.is_some());
    }

    #[test]
    fn duplicate_names_coexist() {
        let store = Store::new();
        store.register_provider("dup", || items(&[("a", "1", 0)]));
        store.register_provider("dup", || items(&[("b", "2", 0)]));

        let resolution = store.resolve();

        assert_eq!(resolution.len(), 2);
        assert_eq!(
            store.providers(),
            vec![
                ProviderInfo {
                    name: "dup".to_string(),
                    kind: ProviderKind::Custom,
                },
                ProviderInfo {
                    name: "dup".to_string(),
                    kind: ProviderKind::Custom,
                },
            ]
        );
    }

    #[test]
    fn in_memory_provider_reflects_later_additions() {
        let store = Store::new();
        let overrides = store.in_memory("overrides");

        assert!(store.resolve().is_empty());

        overrides.push(Item::new("a", "1", 100));
        assert_eq!(store.resolve().value("a"), Some("1"));
        assert_eq!(store.providers()[0].kind, ProviderKind::InMemory);
    }

    #[test]
    fn registration_from_many_threads_is_not_lost() {
        let store = Store::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let key = format!("k{i}");
                    store.register_provider(format!("p{i}"), move || {
                        ItemList::new(vec![Item::new(key.clone(), "v", 0)])
                    });
                    store.resolve();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.providers().len(), 8);
        assert_eq!(store.resolve().len(), 8);
    }
}

mod watchers {
    use super::*;

    #[tokio::test]
    async fn notify_reaches_every_watcher() {
        let store = Store::new();
        let mut first = store.register_watcher();
        let mut second = store.register_watcher();

        store.notify_watchers();

        assert!(first.try_changed());
        assert!(second.try_changed());
        assert!(!first.try_changed());
    }

    #[tokio::test]
    async fn notifications_coalesce() {
        let store = Store::new();
        let mut watcher = store.register_watcher();

        store.notify_watchers();
        store.notify_watchers();
        store.notify_watchers();

        assert!(watcher.try_changed());
        assert!(!watcher.try_changed());
    }

    #[tokio::test]
    async fn changed_waits_for_notification() {
        let store = Store::new();
        let mut watcher = store.register_watcher();

        let notifier = store.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            notifier.notify_watchers();
        });

        let received = tokio::time::timeout(Duration::from_secs(2), watcher.changed()).await;
        assert_eq!(received, Ok(Some(())));
    }

    #[tokio::test]
    async fn watcher_works_as_stream() {
        let store = Store::new();
        let mut watcher = store.register_watcher();

        store.notify_watchers();

        let next = tokio::time::timeout(Duration::from_secs(1), watcher.next()).await;
        assert_eq!(next, Ok(Some(())));
    }

    #[test]
    fn dropped_watchers_unregister() {
        let store = Store::new();
        let kept = store.register_watcher();

        {
            let _dropped = store.register_watcher();
            assert_eq!(store.watcher_count(), 2);
        }

        assert_eq!(store.watcher_count(), 1);
        store.notify_watchers();
        assert_eq!(store.watcher_count(), 1);
        drop(kept);
        assert_eq!(store.watcher_count(), 0);
    }
}

mod diagnostics {
    use super::*;

    #[test]
    fn setup_errors_go_to_injected_sink() {
        let sink = Arc::new(RecordingDiagnostics::default());
        let store = Store::new().with_diagnostics(sink.clone());

        store.register_error(
            "file:/missing".to_string(),
            ConfigStoreError::provider("file:/missing", "gone"),
        );

        assert_eq!(sink.errors.lock().unwrap().len(), 1);
        assert!(sink.errors.lock().unwrap()[0].starts_with("error: "));
        assert!(sink.infos.lock().unwrap().is_empty());
        assert_eq!(store.providers()[0].kind, ProviderKind::Error);
    }
}
