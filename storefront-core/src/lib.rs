//! Storefront Core - shared types, errors, configuration, and logging
//!
//! Foundation crate for the storefront client SDK. Defines the error system,
//! the fixed role set, the closed user record, and client configuration.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use chrono;
pub use tracing;
