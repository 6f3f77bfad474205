//! Active-transaction context.
//!
//! Each thread has one slot naming the transaction whose mutation is
//! currently running. Signal writes consult the slot through
//! [`capture_before_write`]; nothing else reads it.

use crate::stats::TransactionStats;
use crate::transaction::capture::{CaptureLog, TrackedSignal};
use crate::transaction::Transaction;
use crate::types::TransactionId;
use parking_lot::Mutex;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::trace;

/// What the slot holds while a transaction is installed.
#[derive(Clone)]
pub(crate) struct ActiveTransaction {
    pub(crate) id: TransactionId,
    pub(crate) log: Arc<Mutex<CaptureLog>>,
    pub(crate) stats: Arc<TransactionStats>,
}

thread_local! {
    static ACTIVE: RefCell<Option<ActiveTransaction>> = const { RefCell::new(None) };
}

fn swap_active(next: Option<ActiveTransaction>) -> Option<ActiveTransaction> {
    ACTIVE.with(|slot| slot.replace(next))
}

/// Replaces the calling thread's active transaction.
///
/// Returns the id of the transaction that was installed before, if any.
/// [`Transaction::execute`] manages the slot itself; call this directly only
/// when driving a mutation window by hand.
pub fn set_active_transaction(transaction: Option<&Transaction>) -> Option<TransactionId> {
    swap_active(transaction.map(Transaction::as_active)).map(|previous| previous.id)
}

/// Returns the id of the transaction active on the calling thread.
#[must_use]
pub fn active_transaction_id() -> Option<TransactionId> {
    ACTIVE.with(|slot| slot.borrow().as_ref().map(|active| active.id))
}

/// Capture hook for signal writes.
///
/// Must be called at the top of every write, before the new value lands.
/// If a transaction is active and has not yet touched this signal, the
/// signal's current value is recorded in that transaction's log. Otherwise
/// this does nothing.
pub fn capture_before_write(signal: &dyn TrackedSignal) {
    let Some(active) = ACTIVE.with(|slot| slot.borrow().clone()) else {
        return;
    };

    if active.log.lock().capture(signal) {
        active.stats.record_capture();
        trace!(txn = %active.id, signal = %signal.signal_id(), "captured pre-write value");
    }
}

/// Holds the slot for a scope and puts the previous occupant back on drop.
///
/// Drop runs on every exit path, including unwinding out of a mutation.
#[must_use]
pub(crate) struct ActiveScope {
    previous: Option<ActiveTransaction>,
}

impl ActiveScope {
    /// Installs `active` for the lifetime of the scope.
    pub(crate) fn enter(active: ActiveTransaction) -> Self {
        Self {
            previous: swap_active(Some(active)),
        }
    }

    /// Empties the slot for the lifetime of the scope.
    pub(crate) fn suspend() -> Self {
        Self {
            previous: swap_active(None),
        }
    }
}

impl Drop for ActiveScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        // The slot may already be gone during thread teardown.
        let _ = ACTIVE.try_with(|slot| slot.replace(previous));
    }
}
