//! Reactive signals.
//!
//! A [`Signal`] is a shared, observable value. Every write runs the
//! transaction capture hook before the new value lands, which is all the
//! transaction layer needs from a signal implementation.
//!
//! # Example
//!
//! ```rust
//! use optimist_core::{ChangeKind, Signal};
//!
//! let name = Signal::new(String::from("Ada"));
//! let _sub = name.subscribe(|value: &String, kind| {
//!     assert_eq!(kind, ChangeKind::Write);
//!     assert_eq!(value, "Grace");
//! });
//!
//! name.set(String::from("Grace"));
//! assert_eq!(name.version(), 1);
//! ```

mod observer;

pub use observer::{ChangeKind, Subscription};

use crate::transaction::{capture_before_write, Snapshot, TrackedSignal};
use crate::types::SignalId;
use observer::ObserverList;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

struct SignalInner<T> {
    id: SignalId,
    value: RwLock<T>,
    version: AtomicU64,
    observers: Arc<ObserverList<T>>,
}

/// A shared mutable value that notifies observers when it changes.
///
/// Cloning a `Signal` yields another handle to the same value.
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a signal holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                id: SignalId::next(),
                value: RwLock::new(value),
                version: AtomicU64::new(0),
                observers: Arc::new(ObserverList::new()),
            }),
        }
    }

    /// Returns the signal's identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SignalId {
        self.inner.id
    }

    /// Returns a copy of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Calls `f` with a copy of the current value.
    ///
    /// No lock is held while `f` runs, so `f` may write this signal or roll
    /// back a transaction that touched it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.get())
    }

    /// Number of writes this signal has received, restores included.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Stores `value`.
    pub fn set(&self, value: T) {
        self.store(ChangeKind::Write, value);
    }

    /// Stores `value` and returns the previous one.
    pub fn replace(&self, value: T) -> T {
        self.store(ChangeKind::Write, value)
    }

    /// Modifies a copy of the value, then stores it.
    ///
    /// `f` runs with no lock held and may read or write any signal,
    /// including this one. Whatever `f` leaves in the copy replaces the
    /// current value.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut next = self.get();
        let result = f(&mut next);
        self.store(ChangeKind::Write, next);
        result
    }

    /// Registers `observer`, called after every change with the new value.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T, ChangeKind) + Send + Sync + 'static,
    {
        let id = self.inner.observers.add(Arc::new(observer));
        Subscription::new(id, &self.inner.observers)
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// Returns true if both handles refer to the same signal.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The single write path. The capture hook runs before the value
    /// changes; observers run after the lock is released. The lock is only
    /// held for the swap itself.
    fn store(&self, kind: ChangeKind, value: T) -> T {
        capture_before_write(self);

        let (previous, current) = {
            let mut slot = self.inner.value.write();
            let previous = std::mem::replace(&mut *slot, value);
            self.inner.version.fetch_add(1, Ordering::AcqRel);
            let current = (!self.inner.observers.is_empty()).then(|| slot.clone());
            (previous, current)
        };

        if let Some(current) = current {
            self.inner.observers.notify(&current, kind);
        }
        previous
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Signal<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id)
            .field("value", &*self.inner.value.read())
            .field("version", &self.inner.version.load(Ordering::Acquire))
            .finish()
    }
}

impl<T> TrackedSignal for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn signal_id(&self) -> SignalId {
        self.inner.id
    }

    fn snapshot(&self) -> Box<dyn Snapshot> {
        Box::new(SignalSnapshot {
            signal: Arc::downgrade(&self.inner),
            value: self.get(),
        })
    }
}

/// Captured value of a [`Signal`], holding the signal weakly.
struct SignalSnapshot<T> {
    signal: Weak<SignalInner<T>>,
    value: T,
}

impl<T> Snapshot for SignalSnapshot<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn restore(self: Box<Self>) -> bool {
        let Self { signal, value } = *self;
        match signal.upgrade() {
            Some(inner) => {
                Signal { inner }.store(ChangeKind::Restore, value);
                true
            }
            None => false,
        }
    }
}
