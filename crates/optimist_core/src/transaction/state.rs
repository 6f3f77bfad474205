//! Transaction state.

use crate::config::TransactionConfig;
use crate::stats::{StatsSnapshot, TransactionStats};
use crate::transaction::capture::{CaptureLog, TrackedSignal};
use crate::transaction::context::{active_transaction_id, ActiveScope, ActiveTransaction};
use crate::types::{SignalId, TransactionId};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Outcome of a rollback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollbackSummary {
    /// Signals whose captured value was written back.
    pub restored: usize,
    /// Snapshots skipped because their signal had been dropped.
    pub expired: usize,
}

impl RollbackSummary {
    /// Total number of snapshots the rollback consumed.
    pub fn total(&self) -> usize {
        self.restored + self.expired
    }

    /// Returns true if the rollback had nothing to undo.
    pub fn is_noop(&self) -> bool {
        self.total() == 0
    }
}

/// A speculative unit of signal writes.
///
/// Writes made inside [`execute`](Self::execute) land immediately. The
/// transaction remembers each touched signal's value from before its first
/// write, so the whole batch can later be made permanent with
/// [`commit`](Self::commit) or undone with [`rollback`](Self::rollback).
///
/// Handles are cheap to clone and share one capture log. After a commit or
/// rollback the log is empty and the transaction can execute again.
///
/// # Example
///
/// ```rust
/// use optimist_core::{Signal, Transaction};
///
/// let value = Signal::new(10);
/// let txn = Transaction::new();
///
/// txn.execute(|| value.set(20));
/// assert_eq!(value.get(), 20);
///
/// txn.rollback();
/// assert_eq!(value.get(), 10);
/// ```
#[derive(Clone)]
pub struct Transaction {
    id: TransactionId,
    log: Arc<Mutex<CaptureLog>>,
    stats: Arc<TransactionStats>,
    config: Arc<TransactionConfig>,
}

impl Transaction {
    /// Creates a transaction with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TransactionConfig::default())
    }

    /// Creates a transaction with the given configuration.
    pub fn with_config(config: TransactionConfig) -> Self {
        Self {
            id: TransactionId::next(),
            log: Arc::new(Mutex::new(CaptureLog::new())),
            stats: Arc::new(TransactionStats::new()),
            config: Arc::new(config),
        }
    }

    /// Creates a transaction and immediately executes `mutation` in it.
    pub fn with_mutation<F>(mutation: F) -> Self
    where
        F: FnOnce(),
    {
        Self::with_config_and_mutation(TransactionConfig::default(), mutation)
    }

    /// Creates a transaction with the given configuration and immediately
    /// executes `mutation` in it.
    pub fn with_config_and_mutation<F>(config: TransactionConfig, mutation: F) -> Self
    where
        F: FnOnce(),
    {
        let txn = Self::with_config(config);
        txn.execute(mutation);
        txn
    }

    /// Returns the transaction ID.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TransactionConfig {
        &self.config
    }

    /// Returns a snapshot of this transaction's counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of signals touched since the last commit or rollback.
    #[must_use]
    pub fn touched_count(&self) -> usize {
        self.log.lock().len()
    }

    /// Returns true if no signal has been touched since the last commit or rollback.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }

    /// Returns true if `signal` has been touched since the last commit or rollback.
    #[must_use]
    pub fn is_touched(&self, signal: &dyn TrackedSignal) -> bool {
        self.log.lock().is_touched(signal.signal_id())
    }

    /// Ids of the touched signals, in first-touch order.
    #[must_use]
    pub fn touched_signals(&self) -> Vec<SignalId> {
        self.log.lock().touched().to_vec()
    }

    /// Returns true if this transaction is installed on the calling thread.
    #[must_use]
    pub fn is_active(&self) -> bool {
        active_transaction_id() == Some(self.id)
    }

    pub(crate) fn as_active(&self) -> ActiveTransaction {
        ActiveTransaction {
            id: self.id,
            log: Arc::clone(&self.log),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Runs `mutation` with this transaction active.
    ///
    /// The previous occupant of the thread's slot is put back on every exit
    /// path, including a panic. Whatever `mutation` returns is handed back
    /// unchanged, so a failing mutation's error reaches the caller with the
    /// capture log intact and a rollback still possible.
    pub fn execute<F, R>(&self, mutation: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.stats.record_execution();
        debug!(txn = %self.id, label = ?self.config.label, "executing mutation");

        let _scope = ActiveScope::enter(self.as_active());
        mutation()
    }

    /// Makes every write so far permanent and empties the capture log.
    pub fn commit(&self) {
        let discarded = self.take_log().len();
        self.stats.record_commit();
        debug!(txn = %self.id, label = ?self.config.label, discarded, "committed");
    }

    /// Executes `mutation`, then commits.
    ///
    /// If `mutation` panics the log is left as it was.
    pub fn commit_with<F, R>(&self, mutation: F) -> R
    where
        F: FnOnce() -> R,
    {
        let result = self.execute(mutation);
        self.commit();
        result
    }

    /// Executes a fallible `mutation` and commits only if it succeeds.
    ///
    /// On error the log is left intact and the error is returned unchanged.
    pub fn try_commit_with<F, T, E>(&self, mutation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let value = self.execute(mutation)?;
        self.commit();
        Ok(value)
    }

    /// Restores every touched signal to its value from before this
    /// transaction first wrote it, then empties the capture log.
    ///
    /// Write-backs go through each signal's normal write path with the slot
    /// emptied, so no transaction captures them. Calling this twice in a row
    /// is harmless; the second call finds an empty log.
    pub fn rollback(&self) -> RollbackSummary {
        let snapshots = self.take_log().into_snapshots(self.config.restore_order);

        let mut summary = RollbackSummary::default();
        {
            let _suspended = ActiveScope::suspend();
            for snapshot in snapshots {
                if snapshot.restore() {
                    summary.restored += 1;
                } else {
                    summary.expired += 1;
                }
            }
        }

        self.stats.record_rollback(summary.restored, summary.expired);
        debug!(
            txn = %self.id,
            label = ?self.config.label,
            restored = summary.restored,
            expired = summary.expired,
            "rolled back"
        );
        summary
    }

    /// Replaces the capture log with an empty one.
    pub fn cleanup(&self) {
        drop(self.take_log());
    }

    fn take_log(&self) -> CaptureLog {
        std::mem::take(&mut *self.log.lock())
    }

    pub(crate) fn stats_handle(&self) -> &TransactionStats {
        &self.stats
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("label", &self.config.label)
            .field("touched", &self.touched_count())
            .finish_non_exhaustive()
    }
}
