//! Observer probes.

use optimist_core::{ChangeKind, Signal, Subscription};
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every notification a signal sends.
///
/// The probe stays subscribed until it is dropped.
#[derive(Debug)]
pub struct ObserverProbe<T> {
    events: Arc<Mutex<Vec<(T, ChangeKind)>>>,
    _subscription: Subscription,
}

impl<T> ObserverProbe<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Subscribes a new probe to `signal`.
    pub fn attach(signal: &Signal<T>) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let subscription = signal.subscribe({
            let events = Arc::clone(&events);
            move |value: &T, kind| events.lock().push((value.clone(), kind))
        });
        Self {
            events,
            _subscription: subscription,
        }
    }

    /// All recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<(T, ChangeKind)> {
        self.events.lock().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    /// Values delivered by ordinary writes.
    #[must_use]
    pub fn writes(&self) -> Vec<T> {
        self.values_of(ChangeKind::Write)
    }

    /// Values delivered by rollback restores.
    #[must_use]
    pub fn restores(&self) -> Vec<T> {
        self.values_of(ChangeKind::Restore)
    }

    /// The most recent event.
    #[must_use]
    pub fn last(&self) -> Option<(T, ChangeKind)> {
        self.events.lock().last().cloned()
    }

    /// Forgets recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn values_of(&self, kind: ChangeKind) -> Vec<T> {
        self.events
            .lock()
            .iter()
            .filter(|(_, k)| *k == kind)
            .map(|(v, _)| v.clone())
            .collect()
    }
}
