//! Integration tests for programme-portal
//!
//! These tests verify the interaction between multiple components
//! and test real system behavior against local disk and a mock Drive API.

pub mod drive_storage_tests;
pub mod local_portal_tests;
pub mod submission_log_tests;
