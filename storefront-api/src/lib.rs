//! Storefront API - REST backend client for the storefront
//!
//! Provides the [`AuthBackend`] seam between the session layer and the
//! backend, the reqwest-based implementation used in production, and an
//! in-memory implementation for tests and demos.

pub mod client;
pub mod memory;
pub mod types;


pub use client::{create_http_client, AuthBackend, HttpAuthClient};
pub use memory::MemoryAuthBackend;
pub use types::{AuthResponse, LoginRequest, RegisterRequest};
