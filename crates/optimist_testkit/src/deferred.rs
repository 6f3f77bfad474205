//! Futures settled from outside.
//!
//! [`defer`] splits an operation into a [`Settler`] and a [`Pending`]
//! future, so a test can hand the future to `Transaction::follow` and decide
//! later whether it succeeds.

use crate::error::{TestkitError, TestkitResult};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Creates a linked settler and pending future.
pub fn defer<T, E>() -> (Settler<T, E>, Pending<T, E>) {
    let (tx, rx) = oneshot::channel();
    (Settler { tx }, Pending { rx, closed: false })
}

/// Settles the paired [`Pending`].
#[derive(Debug)]
pub struct Settler<T, E> {
    tx: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Settler<T, E> {
    /// Completes the pending future with `Ok(value)`.
    pub fn resolve(self, value: T) -> TestkitResult<()> {
        self.settle(Ok(value))
    }

    /// Completes the pending future with `Err(error)`.
    pub fn reject(self, error: E) -> TestkitResult<()> {
        self.settle(Err(error))
    }

    /// Completes the pending future with `outcome`.
    pub fn settle(self, outcome: Result<T, E>) -> TestkitResult<()> {
        self.tx
            .send(outcome)
            .map_err(|_| TestkitError::ReceiverDropped)
    }

    /// Returns true once the pending side has been dropped.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Future completing with whatever its [`Settler`] sends.
///
/// If the settler is dropped unsettled the future never completes, which
/// models a request that hangs until it is cancelled.
#[derive(Debug)]
pub struct Pending<T, E> {
    rx: oneshot::Receiver<Result<T, E>>,
    closed: bool,
}

impl<T, E> Future for Pending<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.closed {
            return Poll::Pending;
        }
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => {
                self.closed = true;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn resolve_completes_ok() {
        let (settler, pending) = defer::<u32, String>();
        settler.resolve(7).unwrap();
        assert_eq!(pending.await, Ok(7));
    }

    #[tokio::test]
    async fn reject_completes_err() {
        let (settler, pending) = defer::<u32, String>();
        settler.reject("nope".into()).unwrap();
        assert_eq!(pending.await, Err("nope".to_string()));
    }

    #[tokio::test]
    async fn dropped_settler_hangs() {
        let (settler, pending) = defer::<u32, String>();
        drop(settler);
        let outcome = tokio::time::timeout(Duration::from_millis(20), pending).await;
        assert!(outcome.is_err());
    }

    #[test]
    fn settling_after_pending_dropped_fails() {
        let (settler, pending) = defer::<u32, String>();
        drop(pending);
        assert!(settler.is_abandoned());
        assert_eq!(settler.resolve(1), Err(TestkitError::ReceiverDropped));
    }
}
