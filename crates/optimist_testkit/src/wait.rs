//! Async polling helpers.

use crate::error::{TestkitError, TestkitResult};
use std::time::Duration;
use tokio::time::Instant;

/// Interval between checks in [`wait_for`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Polls `predicate` until it returns true or `timeout` elapses.
pub async fn wait_for<P>(mut predicate: P, timeout: Duration) -> TestkitResult<()>
where
    P: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if predicate() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(TestkitError::Timeout { waited: timeout });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
