//! Simulated user API.

use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the simulated server.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server refused to store the user.
    #[error("server rejected user {name}")]
    Rejected {
        /// Name that was refused.
        name: String,
    },

    /// The request itself was malformed.
    #[error("invalid request: {message}")]
    Invalid {
        /// What was wrong.
        message: String,
    },
}

impl ApiError {
    /// Creates a rejection error.
    pub fn rejected(name: impl Into<String>) -> Self {
        Self::Rejected { name: name.into() }
    }

    /// Creates an invalid-request error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// In-process stand-in for a remote user service.
pub struct Api {
    latency: Duration,
    fail: bool,
    stored: Mutex<Vec<String>>,
}

impl Api {
    /// Creates an API that answers after `latency`, rejecting everything when
    /// `fail` is set.
    pub fn new(latency: Duration, fail: bool) -> Self {
        Self {
            latency,
            fail,
            stored: Mutex::new(vec!["ada".to_string()]),
        }
    }

    /// Stores `name` and returns the server's full user list.
    pub async fn add_user(&self, name: &str) -> ApiResult<Vec<String>> {
        debug!(name, latency = ?self.latency, "request sent");
        tokio::time::sleep(self.latency).await;

        if name.trim().is_empty() {
            return Err(ApiError::invalid("user name is empty"));
        }
        if self.fail {
            return Err(ApiError::rejected(name));
        }

        let mut stored = self.stored.lock().await;
        stored.push(name.to_string());
        Ok(stored.clone())
    }
}
