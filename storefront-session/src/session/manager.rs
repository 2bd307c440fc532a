//! Session Manager - the single authority over authentication state
//!
//! Owns the client-side session: which user is logged in, with what role,
//! and what token authorizes backend calls. All mutation goes through the
//! operations here; consumers read snapshots.

use std::sync::Arc;
use storefront_api::{AuthBackend, LoginRequest, RegisterRequest};
use storefront_core::{StorefrontResult, UserRecord};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::storage::CredentialStore;
use super::types::{Session, SessionSnapshot, SessionState};
use crate::auth::guard::{authorize, AccessDecision, RouteRequirement};
use crate::auth::validate::{validate_login, validate_registration};

/// Client-side session manager
///
/// Network I/O runs without the session lock held; results are committed
/// only if the token they were issued against is still the current one, so
/// every operation either fully applies or leaves prior state intact.
pub struct SessionManager {
    backend: Arc<dyn AuthBackend>,
    store: CredentialStore,
    session: RwLock<Session>,
}

impl SessionManager {
    /// Create a manager in the `Initializing` state
    pub fn new(backend: Arc<dyn AuthBackend>, store: CredentialStore) -> Self {
        Self {
            backend,
            store,
            session: RwLock::new(Session::new()),
        }
    }

    /// Restore the session from persisted storage at startup
    ///
    /// With no stored token the session settles as `Unauthenticated`
    /// immediately. With one, the token is validated against the backend via
    /// [`Self::refresh_profile`]; an invalid token degrades to
    /// `Unauthenticated` rather than surfacing an error. Called once; later
    /// calls are logged no-ops.
    pub async fn initialize(&self) {
        let stored = {
            let mut session = self.session.write().await;

            if session.state != SessionState::Initializing {
                warn!("Session already initialized; ignoring repeated initialize call");
                return;
            }

            match self.store.load() {
                Ok(Some(token)) => {
                    session.token = Some(token.clone());
                    Some(token)
                }
                Ok(None) => {
                    session.clear();
                    None
                }
                Err(e) => {
                    warn!("Failed to read persisted token, starting unauthenticated: {}", e);
                    session.clear();
                    None
                }
            }
        };

        match stored {
            Some(_) => {
                debug!("Found persisted token, refreshing profile");
                self.refresh_profile().await;
            }
            None => {
                info!("No persisted token, session starts unauthenticated");
            }
        }
    }

    /// Re-fetch the current user from the backend
    ///
    /// On success the user record is replaced wholesale. On any failure the
    /// session is cleared locally and left unauthenticated; an invalid
    /// session must never break navigation, so nothing is propagated.
    pub async fn refresh_profile(&self) {
        let token = {
            let session = self.session.read().await;
            session.token.clone()
        };

        let Some(token) = token else {
            let mut session = self.session.write().await;
            if session.state == SessionState::Initializing {
                session.clear();
            }
            return;
        };

        match self.backend.fetch_profile(&token).await {
            Ok(user) => {
                let mut session = self.session.write().await;
                if session.token.as_deref() == Some(token.as_str()) {
                    info!(user_id = user.id, role = %user.role, "Profile refreshed");
                    session.establish(token, user);
                } else {
                    debug!("Discarding profile response for a superseded token");
                }
            }
            Err(e) => {
                warn!("Profile refresh failed, clearing session: {}", e);
                let mut session = self.session.write().await;
                if session.token.as_deref() == Some(token.as_str()) {
                    session.clear();
                    if let Err(e) = self.store.clear() {
                        warn!("Failed to clear persisted token: {}", e);
                    }
                }
            }
        }
    }

    /// Authenticate with email and password
    ///
    /// Credentials are validated before any network call. On success the
    /// token and user record are installed together and the token is
    /// persisted. On failure the error is returned for display and the
    /// session is left exactly as it was.
    pub async fn login(&self, credentials: LoginRequest) -> StorefrontResult<UserRecord> {
        validate_login(&credentials)?;

        let response = self.backend.login(&credentials).await.map_err(|e| {
            e.log();
            e
        })?;

        let mut session = self.session.write().await;
        info!(user_id = response.user.id, role = %response.user.role, "Login succeeded");
        session.establish(response.token.clone(), response.user.clone());

        if let Err(e) = self.store.save(&response.token) {
            warn!("Failed to persist token; session will not survive restart: {}", e);
        }

        Ok(response.user)
    }

    /// Create an account and authenticate in one step
    ///
    /// Same contract as [`Self::login`]: validation first, atomic install on
    /// success, untouched session on failure.
    pub async fn register(&self, registration: RegisterRequest) -> StorefrontResult<UserRecord> {
        validate_registration(&registration)?;

        let response = self.backend.register(&registration).await.map_err(|e| {
            e.log();
            e
        })?;

        let mut session = self.session.write().await;
        info!(user_id = response.user.id, role = %response.user.role, "Registration succeeded");
        session.establish(response.token.clone(), response.user.clone());

        if let Err(e) = self.store.save(&response.token) {
            warn!("Failed to persist token; session will not survive restart: {}", e);
        }

        Ok(response.user)
    }

    /// End the session
    ///
    /// Local state and persisted storage are always cleared; the backend is
    /// notified best-effort afterwards. Idempotent and infallible from the
    /// caller's perspective.
    pub async fn logout(&self) {
        let token = {
            let mut session = self.session.write().await;
            let token = session.token.take();
            session.clear();
            if let Err(e) = self.store.clear() {
                warn!("Failed to clear persisted token: {}", e);
            }
            token
        };

        if let Some(token) = token {
            info!("Logged out, notifying backend");
            if let Err(e) = self.backend.notify_logout(&token).await {
                debug!("Logout notification failed (ignored): {}", e);
            }
        }
    }

    /// Drop the session after the backend reported an authorization failure
    ///
    /// The programmatic entry point for any consumer whose authorized call
    /// came back 401/403: clears local state and storage in one step without
    /// notifying the backend (the token is already dead there).
    pub async fn invalidate(&self) {
        let mut session = self.session.write().await;
        if session.token.is_some() {
            warn!("Session invalidated by backend authorization failure");
            session.clear();
            if let Err(e) = self.store.clear() {
                warn!("Failed to clear persisted token: {}", e);
            }
        }
    }

    /// Take an immutable snapshot of the current session
    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.read().await;
        session.snapshot()
    }

    /// Decide whether the current session may enter a navigation target
    ///
    /// Evaluated against a fresh snapshot on every call; the decision is
    /// never cached across navigations.
    pub async fn authorize(&self, requirement: &RouteRequirement) -> AccessDecision {
        authorize(&self.snapshot().await, requirement)
    }
}
