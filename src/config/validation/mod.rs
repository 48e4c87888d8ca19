//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.
//!
//! - `trait_def`: Core Validate trait definition
//! - `config_validators`: Portal, server and logging validators
//! - `storage_validators`: File storage, drive and submission log validators
//! - `tests`: Test suite for all validators

mod config_validators;
mod storage_validators;
mod trait_def;

pub use trait_def::Validate;
