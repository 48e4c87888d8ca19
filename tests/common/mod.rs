//! Common test utilities for programme-portal
//!
//! This module provides shared test infrastructure for all tests:
//! - Submission batch factories
//! - Drive credentials and mock server wiring
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::fixtures::BatchFactory;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let batch = BatchFactory::with_complete("Engineering", &[(1, "Computer Science")]);
//!     // ...
//! }
//! ```


// Re-export commonly used items
pub use drive::DriveMock;
pub use fixtures::{BatchFactory, fixed_time};

/// Skip test if environment variable is not set
#[macro_export]
macro_rules! skip_without_env {
    ($var:expr) => {
        if std::env::var($var).is_err() {
            eprintln!("Skipping test: {} environment variable not set", $var);
            return;
        }
    };
}
