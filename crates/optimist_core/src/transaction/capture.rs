//! Per-transaction capture log.

use crate::config::RestoreOrder;
use crate::types::SignalId;
use std::collections::HashMap;
use std::fmt;

/// A captured pre-write value, detached from the signal's storage.
///
/// Snapshots hold the signal weakly: a signal dropped by its owner is not
/// kept alive by a pending transaction.
pub trait Snapshot: Send {
    /// Writes the captured value back onto the signal.
    ///
    /// Returns `false` if the signal no longer exists.
    fn restore(self: Box<Self>) -> bool;
}

/// A signal whose writes a transaction can capture.
///
/// Implementors call [`capture_before_write`](crate::capture_before_write)
/// at the top of every write, before the new value becomes visible.
pub trait TrackedSignal {
    /// Returns the signal's stable identity.
    fn signal_id(&self) -> SignalId;

    /// Captures the signal's current value.
    fn snapshot(&self) -> Box<dyn Snapshot>;
}

/// Pre-transaction values of every signal touched by one transaction.
///
/// `captured` maps identity to the value seen at first touch. `touched`
/// keeps first-touch order. An id present in `touched` is never captured
/// again until the log is replaced.
#[derive(Default)]
pub(crate) struct CaptureLog {
    captured: HashMap<SignalId, Box<dyn Snapshot>>,
    touched: Vec<SignalId>,
}

impl CaptureLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_touched(&self, id: SignalId) -> bool {
        self.captured.contains_key(&id)
    }

    /// Records the signal's current value unless it was already touched.
    ///
    /// Returns `true` if a snapshot was taken.
    pub(crate) fn capture(&mut self, signal: &dyn TrackedSignal) -> bool {
        let id = signal.signal_id();
        if self.is_touched(id) {
            return false;
        }
        self.captured.insert(id, signal.snapshot());
        self.touched.push(id);
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.touched.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    pub(crate) fn touched(&self) -> &[SignalId] {
        &self.touched
    }

    /// Consumes the log, yielding snapshots in the requested write-back order.
    pub(crate) fn into_snapshots(self, order: RestoreOrder) -> Vec<Box<dyn Snapshot>> {
        let Self {
            mut captured,
            mut touched,
        } = self;
        if order == RestoreOrder::ReverseTouch {
            touched.reverse();
        }
        touched
            .into_iter()
            .filter_map(|id| captured.remove(&id))
            .collect()
    }
}

impl fmt::Debug for CaptureLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureLog")
            .field("touched", &self.touched)
            .finish_non_exhaustive()
    }
}
