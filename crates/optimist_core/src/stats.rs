//! Transaction statistics.
//!
//! Each transaction keeps its own counters. They are atomic, so a snapshot
//! can be taken from any handle while a mutation is running.
//!
//! # Usage
//!
//! ```rust
//! use optimist_core::{Signal, Transaction};
//!
//! let count = Signal::new(0);
//! let txn = Transaction::new();
//! txn.execute(|| count.set(1));
//! txn.rollback();
//!
//! let stats = txn.stats();
//! assert_eq!(stats.captures, 1);
//! assert_eq!(stats.restores, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single transaction.
///
/// Values are monotonically increasing over the transaction's lifetime,
/// across any number of execute/commit/rollback cycles.
#[derive(Debug, Default)]
pub(crate) struct TransactionStats {
    /// Number of `execute` calls.
    executions: AtomicU64,
    /// Number of commits.
    commits: AtomicU64,
    /// Number of rollbacks.
    rollbacks: AtomicU64,
    /// Number of signals captured on first touch.
    captures: AtomicU64,
    /// Number of values written back by rollbacks.
    restores: AtomicU64,
    /// Number of snapshots skipped because their signal was dropped.
    expired: AtomicU64,
    /// Number of `follow` calls.
    follows: AtomicU64,
    /// Number of `follow` futures dropped before settling.
    follows_cancelled: AtomicU64,
}

impl TransactionStats {
    /// Creates a new stats instance.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_execution(&self) {
        self.executions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_commit(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rollback(&self, restored: usize, expired: usize) {
        self.rollbacks.fetch_add(1, Ordering::Relaxed);
        self.restores.fetch_add(restored as u64, Ordering::Relaxed);
        self.expired.fetch_add(expired as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_capture(&self) {
        self.captures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_follow(&self) {
        self.follows.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_follow_cancelled(&self) {
        self.follows_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of all counters.
    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            executions: self.executions.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
            rollbacks: self.rollbacks.load(Ordering::Relaxed),
            captures: self.captures.load(Ordering::Relaxed),
            restores: self.restores.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            follows: self.follows.load(Ordering::Relaxed),
            follows_cancelled: self.follows_cancelled.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of a transaction's counters, returned by
/// [`Transaction::stats`](crate::Transaction::stats).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Number of `execute` calls.
    pub executions: u64,
    /// Number of commits.
    pub commits: u64,
    /// Number of rollbacks.
    pub rollbacks: u64,
    /// Number of signals captured on first touch.
    pub captures: u64,
    /// Number of values written back by rollbacks.
    pub restores: u64,
    /// Number of snapshots skipped because their signal was dropped.
    pub expired: u64,
    /// Number of `follow` calls.
    pub follows: u64,
    /// Number of `follow` futures dropped before settling.
    pub follows_cancelled: u64,
}

impl StatsSnapshot {
    /// Number of commits and rollbacks combined.
    pub fn settlements(&self) -> u64 {
        self.commits + self.rollbacks
    }
}
