//! Storefront Session - client-side session lifecycle and role-gated navigation
//!
//! This crate owns "who is logged in, with what role, and what token
//! authorizes backend calls". It provides:
//!
//! - The [`SessionManager`]: login, registration, logout, profile refresh,
//!   and startup restoration from persisted storage
//! - The navigation guard: a pure decision function over a session snapshot
//!   and a route's role requirement
//! - The [`Storefront`] facade: one context object constructed at
//!   application start and passed by reference to every consumer
//!
//! ## Single-writer discipline
//!
//! The session record is mutated only by the manager's own operations.
//! Everything else reads cloned snapshots; authorization is re-evaluated
//! against a fresh snapshot on every navigation event.

pub mod auth;
pub mod session;

pub use auth::{
    authorize, AccessDecision, DenyReason, RouteRequirement, RouteTable,
};
pub use session::{CredentialStore, SessionManager, SessionSnapshot, SessionState};

use std::sync::Arc;
use storefront_api::{AuthBackend, HttpAuthClient};
use storefront_core::{StorefrontConfig, StorefrontResult};

/// Application-wide context: the session manager plus the route table
///
/// Constructed once at startup; consumers hold a shared reference.
pub struct Storefront {
    session: SessionManager,
    routes: RouteTable,
}

/// Builder for [`Storefront`]
pub struct StorefrontBuilder {
    config: StorefrontConfig,
    backend: Option<Arc<dyn AuthBackend>>,
    routes: Option<RouteTable>,
}

impl StorefrontBuilder {
    pub fn new(config: StorefrontConfig) -> Self {
        Self {
            config,
            backend: None,
            routes: None,
        }
    }

    /// Substitute a custom backend (tests, demos)
    pub fn with_backend(mut self, backend: Arc<dyn AuthBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Use a route table other than the storefront defaults
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Validate config, wire up the backend and storage, and restore the
    /// session from disk
    pub async fn build(self) -> StorefrontResult<Storefront> {
        self.config.validate()?;

        let backend: Arc<dyn AuthBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(HttpAuthClient::new(self.config.backend.clone())?),
        };

        let store = CredentialStore::new(&self.config.storage.data_dir)?;
        let session = SessionManager::new(backend, store);
        session.initialize().await;

        Ok(Storefront {
            session,
            routes: self.routes.unwrap_or_default(),
        })
    }
}

impl Storefront {
    /// Build with defaults: HTTP backend, storefront route table
    pub async fn start(config: StorefrontConfig) -> StorefrontResult<Self> {
        StorefrontBuilder::new(config).build().await
    }

    /// Builder for more advanced wiring
    pub fn builder(config: StorefrontConfig) -> StorefrontBuilder {
        StorefrontBuilder::new(config)
    }

    /// The session manager
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// The route table in effect
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Guard entry point for the routing layer: decide whether the current
    /// session may enter `path`
    pub async fn authorize_path(&self, path: &str) -> AccessDecision {
        self.session
            .authorize(self.routes.requirement_for(path))
            .await
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use super::{
        AccessDecision, DenyReason, RouteRequirement, RouteTable, SessionManager,
        SessionSnapshot, SessionState, Storefront,
    };
    pub use storefront_api::{LoginRequest, RegisterRequest};
    pub use storefront_core::{Role, StorefrontConfig, UserRecord};
}
