//! Vidshare CLI Library
//!
//! Media checks, thumbnail encoding and a local upload simulation built on
//! the Vidshare libraries.
//!
//! This library exposes the command implementations for testing purposes.

pub mod commands;
pub mod config;
pub mod error;
pub mod service;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use service::{LocalVideoService, SessionAuth};
