//! Error types for the testkit.

use std::time::Duration;
use thiserror::Error;

/// Result type for testkit helpers.
pub type TestkitResult<T> = Result<T, TestkitError>;

/// Errors reported by testkit helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TestkitError {
    /// The pending side of a deferred was dropped before it was settled.
    #[error("deferred receiver dropped before settlement")]
    ReceiverDropped,

    /// A test precondition did not hold.
    #[error("guard failed: {message}")]
    Guard {
        /// What was expected.
        message: String,
    },

    /// A condition did not become true in time.
    #[error("condition not met within {waited:?}")]
    Timeout {
        /// How long the helper waited.
        waited: Duration,
    },
}

impl TestkitError {
    /// Creates a guard error.
    pub fn guard(message: impl Into<String>) -> Self {
        Self::Guard {
            message: message.into(),
        }
    }
}

/// Fails with [`TestkitError::Guard`] unless `condition` holds.
///
/// Useful for preconditions in tests that return `TestkitResult`, where a
/// failed setup should read differently from a failed assertion.
pub fn guard(message: &str, condition: bool) -> TestkitResult<()> {
    if condition {
        Ok(())
    } else {
        Err(TestkitError::guard(message))
    }
}
