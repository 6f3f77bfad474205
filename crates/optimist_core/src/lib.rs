//! # Optimist Core
//!
//! Transactional rollback for reactive signals.
//!
//! This crate provides:
//! - [`Signal`], a shared observable value whose writes can be captured
//! - [`Transaction`], which applies writes speculatively and later commits
//!   or rolls them back
//! - [`Transaction::follow`], which lets an asynchronous result decide
//!   between the two
//!
//! ## Optimistic updates
//!
//! ```rust
//! use optimist_core::{Signal, Transaction};
//!
//! # async fn save(_: &[String]) -> Result<(), String> { Err("offline".into()) }
//! # async fn demo() {
//! let users = Signal::new(vec!["ada".to_string()]);
//!
//! // Show the new user right away.
//! let txn = Transaction::with_mutation(|| users.update(|u| u.push("grace".into())));
//! assert_eq!(users.get().len(), 2);
//!
//! // The request failed, so the list goes back to one entry.
//! let result = txn.follow(save(&users.get())).await;
//! assert!(result.is_err());
//! assert_eq!(users.get().len(), 1);
//! # }
//! ```
//!
//! ## Key Invariants
//!
//! - At most one transaction is active per thread
//! - A signal's captured value is the one from before its first write in
//!   the transaction; later writes never replace it
//! - Rollback write-backs are never captured by any transaction
//! - Commit and rollback empty the log, so repeating either is a no-op

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod signal;
mod stats;
mod transaction;
mod types;

pub use config::{RestoreOrder, TransactionConfig};
pub use signal::{ChangeKind, Signal, Subscription};
pub use stats::StatsSnapshot;
pub use transaction::{
    active_transaction_id, capture_before_write, set_active_transaction, RollbackSummary,
    Snapshot, TrackedSignal, Transaction,
};
pub use types::{SignalId, TransactionId};
