//! Session lifecycle integration tests
//!
//! Runs the manager against the in-memory backend through the AuthBackend
//! seam. After every operation the token/user pairing invariant is checked:
//! both present or both absent, never one without the other.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storefront_api::{
    AuthBackend, AuthResponse, LoginRequest, MemoryAuthBackend, RegisterRequest,
};
use storefront_core::{Role, StorefrontError, StorefrontResult, UserRecord};
use storefront_session::{CredentialStore, SessionManager, SessionSnapshot, SessionState};

fn assert_paired(snapshot: &SessionSnapshot) {
    assert_eq!(
        snapshot.token.is_some(),
        snapshot.user.is_some(),
        "token and user must be set or cleared together"
    );
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn manager_with(
    backend: Arc<MemoryAuthBackend>,
    dir: &tempfile::TempDir,
) -> SessionManager {
    let store = CredentialStore::new(dir.path()).unwrap();
    SessionManager::new(backend, store)
}

#[tokio::test]
async fn initialize_without_stored_token_is_unauthenticated() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryAuthBackend::new());
    let manager = manager_with(backend, &dir);

    assert_eq!(manager.snapshot().await.state, SessionState::Initializing);

    manager.initialize().await;

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Unauthenticated);
    assert!(snapshot.token.is_none());
    assert!(snapshot.user.is_none());
    assert_paired(&snapshot);
}

#[tokio::test]
async fn initialize_with_valid_token_restores_session() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryAuthBackend::new());
    backend.seed_user("Ada", "a@b.com", "secret1", Role::Seller);
    let token = backend.issue_token("a@b.com");

    CredentialStore::new(dir.path()).unwrap().save(&token).unwrap();

    let manager = manager_with(backend, &dir);
    manager.initialize().await;

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Authenticated);
    assert_eq!(snapshot.token.as_deref(), Some(token.as_str()));
    assert_eq!(snapshot.role(), Some(Role::Seller));
    assert_paired(&snapshot);
}

#[tokio::test]
async fn initialize_with_stale_token_degrades_to_unauthenticated() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path()).unwrap();
    store.save("tok_long_expired").unwrap();

    let backend = Arc::new(MemoryAuthBackend::new());
    let manager = manager_with(backend, &dir);
    manager.initialize().await;

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Unauthenticated);
    assert_paired(&snapshot);

    // local recovery wipes the dead token from storage too
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn repeated_initialize_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryAuthBackend::new());
    backend.seed_user("Ada", "a@b.com", "secret1", Role::Buyer);

    let manager = manager_with(backend, &dir);
    manager.initialize().await;

    manager.login(login_request("a@b.com", "secret1")).await.unwrap();
    let before = manager.snapshot().await;

    manager.initialize().await;

    let after = manager.snapshot().await;
    assert_eq!(after.state, SessionState::Authenticated);
    assert_eq!(after.token, before.token);
}

#[tokio::test]
async fn login_round_trip_establishes_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryAuthBackend::new());
    backend.seed_user("Ada", "a@b.com", "secret1", Role::Buyer);

    let manager = manager_with(backend, &dir);
    manager.initialize().await;

    let user = manager
        .login(login_request("a@b.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(user.role, Role::Buyer);

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Authenticated);
    assert_eq!(snapshot.role(), Some(Role::Buyer));
    assert_paired(&snapshot);

    // the issued token survives a restart
    let store = CredentialStore::new(dir.path()).unwrap();
    assert_eq!(store.load().unwrap(), snapshot.token);
}

#[tokio::test]
async fn failed_login_leaves_prior_session_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryAuthBackend::new());
    backend.seed_user("Ada", "a@b.com", "secret1", Role::Buyer);

    let manager = manager_with(backend, &dir);
    manager.initialize().await;

    manager.login(login_request("a@b.com", "secret1")).await.unwrap();
    let before = manager.snapshot().await;

    let err = manager
        .login(login_request("a@b.com", "wrong-password"))
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());

    let after = manager.snapshot().await;
    assert_eq!(after.state, SessionState::Authenticated);
    assert_eq!(after.token, before.token);
    assert_eq!(after.user, before.user);
    assert_paired(&after);
}

#[tokio::test]
async fn register_authenticates_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryAuthBackend::new());

    let manager = manager_with(backend, &dir);
    manager.initialize().await;

    let user = manager
        .register(RegisterRequest {
            name: "New Seller".to_string(),
            email: "seller@shop.example".to_string(),
            password: "secret1".to_string(),
            role: Role::Seller,
        })
        .await
        .unwrap();
    assert_eq!(user.role, Role::Seller);

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Authenticated);
    assert_paired(&snapshot);

    let store = CredentialStore::new(dir.path()).unwrap();
    assert_eq!(store.load().unwrap(), snapshot.token);
}

#[tokio::test]
async fn failed_register_leaves_session_unauthenticated() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryAuthBackend::new());
    backend.seed_user("Ada", "taken@shop.example", "secret1", Role::Buyer);

    let manager = manager_with(backend, &dir);
    manager.initialize().await;

    let err = manager
        .register(RegisterRequest {
            name: "Copy Cat".to_string(),
            email: "taken@shop.example".to_string(),
            password: "secret2".to_string(),
            role: Role::Buyer,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::Backend { status: 409, .. }));

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Unauthenticated);
    assert_paired(&snapshot);
}

#[tokio::test]
async fn logout_always_clears_regardless_of_backend() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryAuthBackend::new());
    backend.seed_user("Ada", "a@b.com", "secret1", Role::Buyer);

    let manager = manager_with(Arc::clone(&backend), &dir);
    manager.initialize().await;
    manager.login(login_request("a@b.com", "secret1")).await.unwrap();

    // the backend already dropped this token; notification will fail
    let token = manager.snapshot().await.token.unwrap();
    backend.revoke_token(&token);

    manager.logout().await;

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Unauthenticated);
    assert_paired(&snapshot);

    let store = CredentialStore::new(dir.path()).unwrap();
    assert_eq!(store.load().unwrap(), None);

    // idempotent: a second logout changes nothing and does not panic
    manager.logout().await;
    assert_eq!(manager.snapshot().await.state, SessionState::Unauthenticated);
}

#[tokio::test]
async fn refresh_with_rejected_token_clears_session() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryAuthBackend::new());
    backend.seed_user("Ada", "a@b.com", "secret1", Role::Seller);

    let manager = manager_with(Arc::clone(&backend), &dir);
    manager.initialize().await;
    manager.login(login_request("a@b.com", "secret1")).await.unwrap();

    let token = manager.snapshot().await.token.unwrap();
    backend.revoke_token(&token);

    manager.refresh_profile().await;

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Unauthenticated);
    assert!(snapshot.token.is_none());
    assert!(snapshot.user.is_none());

    let store = CredentialStore::new(dir.path()).unwrap();
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn refresh_replaces_user_record_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryAuthBackend::new());
    backend.seed_user("Ada", "a@b.com", "secret1", Role::Buyer);

    let manager = manager_with(Arc::clone(&backend), &dir);
    manager.initialize().await;
    manager.login(login_request("a@b.com", "secret1")).await.unwrap();

    // profile changed server-side since login
    backend.seed_user("Ada Lovelace", "a@b.com", "secret1", Role::Buyer);

    manager.refresh_profile().await;

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Authenticated);
    assert_eq!(snapshot.user.unwrap().name, "Ada Lovelace");
}

#[tokio::test]
async fn invalidate_drops_session_and_storage() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryAuthBackend::new());
    backend.seed_user("Ada", "a@b.com", "secret1", Role::Buyer);

    let manager = manager_with(backend, &dir);
    manager.initialize().await;
    manager.login(login_request("a@b.com", "secret1")).await.unwrap();

    manager.invalidate().await;

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Unauthenticated);
    assert_paired(&snapshot);

    let store = CredentialStore::new(dir.path()).unwrap();
    assert_eq!(store.load().unwrap(), None);
}

/// Wrapper that counts how many calls actually reach the backend
struct CountingBackend {
    inner: MemoryAuthBackend,
    calls: AtomicUsize,
}

impl CountingBackend {
    fn new() -> Self {
        Self {
            inner: MemoryAuthBackend::new(),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthBackend for CountingBackend {
    async fn login(&self, request: &LoginRequest) -> StorefrontResult<AuthResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.login(request).await
    }

    async fn register(&self, request: &RegisterRequest) -> StorefrontResult<AuthResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.register(request).await
    }

    async fn fetch_profile(&self, token: &str) -> StorefrontResult<UserRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_profile(token).await
    }

    async fn notify_logout(&self, token: &str) -> StorefrontResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.notify_logout(token).await
    }
}

#[tokio::test]
async fn validation_errors_never_reach_the_network() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(CountingBackend::new());
    let store = CredentialStore::new(dir.path()).unwrap();
    let manager = SessionManager::new(Arc::clone(&backend) as Arc<dyn AuthBackend>, store);
    manager.initialize().await;

    let err = manager
        .login(login_request("not-an-email", "secret1"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::Validation { .. }));

    let err = manager
        .register(RegisterRequest {
            name: "Eve".to_string(),
            email: "eve@shop.example".to_string(),
            password: "12345".to_string(),
            role: Role::Buyer,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::Validation { .. }));

    let err = manager
        .register(RegisterRequest {
            name: "Eve".to_string(),
            email: "eve@shop.example".to_string(),
            password: "secret1".to_string(),
            role: Role::SuperAdmin,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::Validation { .. }));

    assert_eq!(backend.call_count(), 0);

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Unauthenticated);
    assert_paired(&snapshot);
}
