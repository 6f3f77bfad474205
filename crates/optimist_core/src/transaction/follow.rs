//! Binding a transaction to an asynchronous operation.

use crate::transaction::Transaction;
use std::future::{Future, IntoFuture};
use tracing::debug;

impl Transaction {
    /// Settles this transaction with the outcome of `operation`.
    ///
    /// The returned future awaits `operation`, then commits on `Ok` or rolls
    /// back on `Err`, and yields the outcome unchanged. Exactly one of commit
    /// or rollback runs.
    ///
    /// The returned future holds its own handle to the transaction, so it
    /// does not borrow `self` and can be spawned as long as `operation` can.
    ///
    /// If the returned future is dropped before `operation` settles, polled
    /// or not, the transaction is rolled back, unless
    /// [`rollback_on_cancel`](crate::TransactionConfig::rollback_on_cancel)
    /// is disabled, in which case the log is left for the caller.
    ///
    /// # Example
    ///
    /// ```rust
    /// use optimist_core::{Signal, Transaction};
    ///
    /// # async fn demo() {
    /// let likes = Signal::new(10);
    /// let txn = Transaction::with_mutation(|| likes.set(11));
    ///
    /// let response: Result<(), &str> = txn.follow(async { Err("offline") }).await;
    ///
    /// assert!(response.is_err());
    /// assert_eq!(likes.get(), 10);
    /// # }
    /// ```
    pub fn follow<F, T, E>(&self, operation: F) -> impl Future<Output = Result<T, E>>
    where
        F: IntoFuture<Output = Result<T, E>>,
    {
        self.stats_handle().record_follow();
        debug!(txn = %self.id(), label = ?self.config().label, "following operation");

        let operation = operation.into_future();
        let mut guard = FollowGuard {
            txn: self.clone(),
            armed: true,
        };
        async move {
            let outcome = operation.await;
            guard.settle(outcome.is_ok());
            outcome
        }
    }
}

/// Settles the transaction exactly once, even if the `follow` future is dropped.
struct FollowGuard {
    txn: Transaction,
    armed: bool,
}

impl FollowGuard {
    fn settle(&mut self, succeeded: bool) {
        self.armed = false;
        if succeeded {
            self.txn.commit();
        } else {
            self.txn.rollback();
        }
    }
}

impl Drop for FollowGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.txn.stats_handle().record_follow_cancelled();
        debug!(txn = %self.txn.id(), "followed operation cancelled");
        if self.txn.config().rollback_on_cancel {
            self.txn.rollback();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Signal, Transaction, TransactionConfig};
    use std::future::{pending, ready};
    use std::time::Duration;

    #[tokio::test]
    async fn follow_commits_on_success() {
        let value = Signal::new(10);
        let txn = Transaction::with_mutation(|| value.set(20));

        let result: Result<bool, ()> = txn.follow(ready(Ok(true))).await;

        assert_eq!(result, Ok(true));
        assert_eq!(value.get(), 20);
        assert!(txn.is_empty());
        assert_eq!(txn.stats().commits, 1);
    }

    #[tokio::test]
    async fn follow_rolls_back_on_failure() {
        let value = Signal::new(10);
        let txn = Transaction::with_mutation(|| value.set(20));

        let result: Result<(), &str> = txn.follow(ready(Err("Failed"))).await;

        assert_eq!(result, Err("Failed"));
        assert_eq!(value.get(), 10);
        assert_eq!(txn.stats().rollbacks, 1);
        assert_eq!(txn.stats().commits, 0);
    }

    #[tokio::test]
    async fn cancelled_follow_rolls_back() {
        let value = Signal::new(10);
        let txn = Transaction::with_mutation(|| value.set(20));

        let outcome = tokio::time::timeout(
            Duration::from_millis(10),
            txn.follow(pending::<Result<(), ()>>()),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(value.get(), 10);
        assert_eq!(txn.stats().follows_cancelled, 1);
    }

    #[tokio::test]
    async fn cancelled_follow_can_keep_log() {
        let value = Signal::new(10);
        let txn = Transaction::with_config(TransactionConfig::new().rollback_on_cancel(false));
        txn.execute(|| value.set(20));

        let outcome = tokio::time::timeout(
            Duration::from_millis(10),
            txn.follow(pending::<Result<(), ()>>()),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(value.get(), 20);
        assert_eq!(txn.touched_count(), 1);
        assert_eq!(txn.stats().follows_cancelled, 1);
    }

    #[tokio::test]
    async fn follow_outlives_the_handle_it_came_from() {
        let value = Signal::new(10);
        let following = {
            let txn = Transaction::with_mutation(|| value.set(20));
            txn.follow(ready(Err::<(), _>("rejected")))
        };

        assert_eq!(following.await, Err("rejected"));
        assert_eq!(value.get(), 10);
    }

    #[test]
    fn unpolled_follow_rolls_back_on_drop() {
        let value = Signal::new(1);
        let txn = Transaction::with_mutation(|| value.set(2));

        drop(txn.follow(ready(Ok::<_, ()>(()))));

        assert_eq!(value.get(), 1);
        assert_eq!(txn.stats().follows, 1);
        assert_eq!(txn.stats().follows_cancelled, 1);
    }
}
