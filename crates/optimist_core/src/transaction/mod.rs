//! Speculative signal writes with commit and rollback.
//!
//! A transaction provides:
//! - **Capture**: the first write to each signal inside `execute` records the
//!   signal's previous value
//! - **Commit**: the writes stand and the record is discarded
//! - **Rollback**: every touched signal gets its recorded value back
//! - **Follow**: commit or rollback decided by an asynchronous outcome

mod capture;
mod context;
mod follow;
mod state;

pub use capture::{Snapshot, TrackedSignal};
pub use context::{active_transaction_id, capture_before_write, set_active_transaction};
pub use state::{RollbackSummary, Transaction};
