//! App Center Release Fetcher Library
//!
//! This library provides the core functionality for the `acget` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
