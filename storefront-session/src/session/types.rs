//! Session state types

use serde::{Deserialize, Serialize};
use storefront_core::{Role, UserRecord};

/// Where the session is in its lifecycle
///
/// `Initializing` is entered exactly once at startup, while the persisted
/// token (if any) is being checked against the backend. The other two states
/// are the only stable ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// The single mutable session record, owned by the manager
///
/// Invariant: `user` is `Some` only while `token` is `Some`; every operation
/// that clears the token clears the user in the same step.
#[derive(Debug)]
pub(crate) struct Session {
    pub state: SessionState,
    pub token: Option<String>,
    pub user: Option<UserRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Initializing,
            token: None,
            user: None,
        }
    }

    /// Clear credentials and drop to `Unauthenticated` in one step
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
        self.state = SessionState::Unauthenticated;
    }

    /// Install a token/user pair and become `Authenticated` in one step
    pub fn establish(&mut self, token: String, user: UserRecord) {
        self.token = Some(token);
        self.user = Some(user);
        self.state = SessionState::Authenticated;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            token: self.token.clone(),
            user: self.user.clone(),
        }
    }
}

/// Immutable copy of the session handed to consumers
///
/// Authorization decisions are made against a snapshot taken at the moment
/// of the navigation event, never against a cached one.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub token: Option<String>,
    pub user: Option<UserRecord>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Whether startup initialization is still in flight
    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Initializing
    }

    /// Role of the current user, if any
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}
