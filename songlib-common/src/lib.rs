//! # Song Library Common
//!
//! Shared infrastructure for the song library service:
//! - Error type
//! - Configuration loading (TOML + overrides)
//! - Tracing subscriber setup
//! - SQLite pool initialization and schema migrations

pub mod config;
pub mod db;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
