//! Error handling for the portal
//!
//! This module defines all error types used throughout the portal.

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{PortalError, Result};
