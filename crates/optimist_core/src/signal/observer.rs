//! Change observers for signals.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Why a signal's value changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// An ordinary write through `set`, `update` or `replace`.
    Write,
    /// A rollback wrote a captured value back.
    Restore,
}

type Observer<T> = Arc<dyn Fn(&T, ChangeKind) + Send + Sync>;

/// Observers registered on one signal.
pub(crate) struct ObserverList<T> {
    next_id: AtomicU64,
    observers: RwLock<Vec<(u64, Observer<T>)>>,
}

impl<T> ObserverList<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            observers: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, observer: Observer<T>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers.write().push((id, observer));
        id
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Calls every observer with the lock released, so observers may
    /// subscribe, unsubscribe or write signals themselves.
    pub(crate) fn notify(&self, value: &T, kind: ChangeKind) {
        let observers: Vec<Observer<T>> = self
            .observers
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(value, kind);
        }
    }
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: Send + Sync> Detach for ObserverList<T> {
    fn detach(&self, id: u64) {
        self.observers.write().retain(|(existing, _)| *existing != id);
    }
}

/// Keeps an observer registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    list: Weak<dyn Detach>,
}

impl Subscription {
    pub(crate) fn new<T: Send + Sync + 'static>(id: u64, list: &Arc<ObserverList<T>>) -> Self {
        let list: Weak<dyn Detach> = Arc::downgrade(list) as Weak<dyn Detach>;
        Self { id, list }
    }

    /// Unsubscribes now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            list.detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
