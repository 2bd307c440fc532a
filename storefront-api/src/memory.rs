//! In-memory auth backend for testing and simple deployments

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;
use storefront_core::{ErrorContext, Role, StorefrontError, StorefrontResult, UserRecord};

use crate::client::AuthBackend;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest};

struct StoredUser {
    record: UserRecord,
    password: String,
}

/// Auth backend holding users and issued tokens in memory
///
/// Passwords are compared in plain text; this backend never talks to a
/// network and exists for tests and local demos.
#[derive(Default)]
pub struct MemoryAuthBackend {
    users: RwLock<HashMap<String, StoredUser>>,
    tokens: RwLock<HashMap<String, String>>, // token -> email
    next_id: AtomicI64,
}

impl MemoryAuthBackend {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            tokens: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Preload a user, returning the stored record
    pub fn seed_user(&self, name: &str, email: &str, password: &str, role: Role) -> UserRecord {
        let record = UserRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
            email: email.to_string(),
            role,
            created_at: chrono::Utc::now(),
        };

        let mut users = self.users.write().unwrap();
        users.insert(
            email.to_string(),
            StoredUser {
                record: record.clone(),
                password: password.to_string(),
            },
        );

        record
    }

    /// Issue a token for an already-registered user, as if they had logged in
    pub fn issue_token(&self, email: &str) -> String {
        let token = format!("tok_{}", uuid::Uuid::new_v4());
        let mut tokens = self.tokens.write().unwrap();
        tokens.insert(token.clone(), email.to_string());
        token
    }

    /// Revoke a token server-side, simulating expiry
    pub fn revoke_token(&self, token: &str) {
        let mut tokens = self.tokens.write().unwrap();
        tokens.remove(token);
    }

    fn invalid_credentials(operation: &str) -> StorefrontError {
        StorefrontError::Authentication {
            message: "Invalid credentials".to_string(),
            context: ErrorContext::new("memory_auth_backend").with_operation(operation),
        }
    }

    fn invalid_token(operation: &str) -> StorefrontError {
        StorefrontError::Authentication {
            message: "Invalid or expired token".to_string(),
            context: ErrorContext::new("memory_auth_backend").with_operation(operation),
        }
    }
}

#[async_trait]
impl AuthBackend for MemoryAuthBackend {
    async fn login(&self, request: &LoginRequest) -> StorefrontResult<AuthResponse> {
        let record = {
            let users = self.users.read().unwrap();
            let user = users
                .get(&request.email)
                .ok_or_else(|| Self::invalid_credentials("login"))?;

            if user.password != request.password {
                return Err(Self::invalid_credentials("login"));
            }

            user.record.clone()
        };

        let token = self.issue_token(&record.email);
        Ok(AuthResponse {
            token,
            user: record,
        })
    }

    async fn register(&self, request: &RegisterRequest) -> StorefrontResult<AuthResponse> {
        {
            let users = self.users.read().unwrap();
            if users.contains_key(&request.email) {
                return Err(StorefrontError::Backend {
                    status: 409,
                    message: format!("Email already registered: {}", request.email),
                    context: ErrorContext::new("memory_auth_backend").with_operation("register"),
                });
            }
        }

        let record = self.seed_user(
            &request.name,
            &request.email,
            &request.password,
            request.role,
        );

        let token = self.issue_token(&record.email);
        Ok(AuthResponse {
            token,
            user: record,
        })
    }

    async fn fetch_profile(&self, token: &str) -> StorefrontResult<UserRecord> {
        let email = {
            let tokens = self.tokens.read().unwrap();
            tokens
                .get(token)
                .cloned()
                .ok_or_else(|| Self::invalid_token("fetch_profile"))?
        };

        let users = self.users.read().unwrap();
        users
            .get(&email)
            .map(|u| u.record.clone())
            .ok_or_else(|| Self::invalid_token("fetch_profile"))
    }

    async fn notify_logout(&self, token: &str) -> StorefrontResult<()> {
        let mut tokens = self.tokens.write().unwrap();
        if tokens.remove(token).is_none() {
            return Err(Self::invalid_token("notify_logout"));
        }
        Ok(())
    }
}
