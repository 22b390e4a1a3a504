use std::{
    pin::Pin,
    sync::{
        Arc, Mutex, MutexGuard, Weak,
        atomic::{AtomicU64, Ordering},
    },
    task::{Context, Poll},
};

use futures::Stream;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};

/// A registered notification target
struct WatcherSlot {
    id: u64,
    sender: Sender<()>,
}

/// The set of watchers interested in configuration changes.
///
/// Shared between the store and its refresh tasks, so a refresh can notify
/// watchers without keeping the whole store alive.
#[derive(Default)]
pub(crate) struct WatcherRegistry {
    next_id: AtomicU64,
    slots: Mutex<Vec<WatcherSlot>>,
}

impl WatcherRegistry {
    pub(crate) fn register(self: &Arc<Self>) -> Watcher {
        // Capacity 1: a watcher with a pending notification needs no second one.
        let (sender, receiver) = mpsc::channel(1);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.lock().push(WatcherSlot { id, sender });

        Watcher {
            id,
            receiver,
            registry: Arc::downgrade(self),
        }
    }

    /// Signals every live watcher and prunes the ones that went away.
    ///
    /// Returns the number of watchers still registered.
    pub(crate) fn notify(&self) -> usize {
        let mut slots = self.lock();

        slots.retain(|slot| match slot.sender.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => false,
        });

        slots.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn remove(&self, id: u64) {
        self.lock().retain(|slot| slot.id != id);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<WatcherSlot>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// A handle that is signalled whenever the resolvable configuration may
/// have changed.
///
/// Notifications coalesce: several changes between two waits are seen as one.
/// The watcher unregisters itself when dropped. It also implements
/// [`Stream`], yielding `()` per notification.
pub struct Watcher {
    id: u64,
    receiver: Receiver<()>,
    registry: Weak<WatcherRegistry>,
}

impl Watcher {
    /// Waits for the next notification.
    ///
    /// Returns `None` once the store and every refresh task are gone, since no
    /// notification can arrive any more.
    pub async fn changed(&mut self) -> Option<()> {
        self.receiver.recv().await
    }

    /// Consumes a pending notification without waiting.
    ///
    /// Returns `true` if one was pending.
    pub fn try_changed(&mut self) -> bool {
        self.receiver.try_recv().is_ok()
    }
}

impl Stream for Watcher {
    type Item = ();

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<()>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}
