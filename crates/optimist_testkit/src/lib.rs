//! # Optimist Testkit
//!
//! Test utilities for Optimist.
//!
//! This crate provides:
//! - Deferred futures settled from outside, for driving `follow`
//! - Observer probes that record signal notifications
//! - Fixtures for common optimistic-update scenarios
//! - Property-based test generators using proptest
//! - Async polling helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use optimist_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn rolls_back_on_rejection() {
//!     let app = UsersApp::with_users(["ada"]);
//!     let (settler, pending) = defer::<(), String>();
//!     let txn = app.add_user_optimistically("grace");
//!
//!     settler.reject("offline".into()).unwrap();
//!     assert!(txn.follow(pending).await.is_err());
//!     assert_eq!(app.users.get(), vec!["ada"]);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod deferred;
pub mod error;
pub mod fixtures;
pub mod generators;
pub mod probe;
pub mod wait;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::deferred::*;
    pub use crate::error::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::probe::*;
    pub use crate::wait::*;
}

pub use deferred::*;
pub use error::*;
pub use fixtures::*;
pub use generators::*;
pub use probe::*;
pub use wait::*;
