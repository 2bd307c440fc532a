//! HTTP client for the storefront auth endpoints

use async_trait::async_trait;
use log::{debug, info, warn};
use storefront_core::{BackendSettings, ErrorContext, StorefrontError, StorefrontResult};

use crate::types::{AuthResponse, ErrorBody, LoginRequest, RegisterRequest};
use storefront_core::UserRecord;

/// Seam between the session layer and the REST backend
///
/// The HTTP implementation talks to the real backend; tests and simple
/// deployments can substitute [`crate::MemoryAuthBackend`].
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> StorefrontResult<AuthResponse>;

    /// `POST /auth/register`
    async fn register(&self, request: &RegisterRequest) -> StorefrontResult<AuthResponse>;

    /// `GET /auth/profile` with a bearer token
    async fn fetch_profile(&self, token: &str) -> StorefrontResult<UserRecord>;

    /// `POST /auth/logout` with a bearer token. Best-effort on the caller's
    /// side; this method still reports failures so they can be logged.
    async fn notify_logout(&self, token: &str) -> StorefrontResult<()>;
}

/// Auth client backed by the REST API
pub struct HttpAuthClient {
    client: reqwest::Client,
    config: BackendSettings,
}

impl HttpAuthClient {
    /// Create a new client from backend settings
    pub fn new(config: BackendSettings) -> StorefrontResult<Self> {
        let client = create_http_client(&config)?;

        info!("Created storefront auth client for {}", config.base_url);

        Ok(Self { client, config })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn bearer_headers(&self, token: &str) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();

        if let Ok(auth_value) =
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
        {
            headers.insert(reqwest::header::AUTHORIZATION, auth_value);
        }

        headers
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
        operation: &str,
    ) -> StorefrontResult<reqwest::Response> {
        let url = self.endpoint_url(endpoint);
        debug!("POST {}", url);

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = token {
            request = request.headers(self.bearer_headers(token));
        }

        let response = request.send().await.map_err(|e| StorefrontError::Network {
            message: format!("Failed to reach backend at {}: {}", url, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("auth_client").with_operation(operation),
        })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, operation).await);
        }

        Ok(response)
    }

    async fn get_authorized(
        &self,
        endpoint: &str,
        token: &str,
        operation: &str,
    ) -> StorefrontResult<reqwest::Response> {
        let url = self.endpoint_url(endpoint);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.bearer_headers(token))
            .send()
            .await
            .map_err(|e| StorefrontError::Network {
                message: format!("Failed to reach backend at {}: {}", url, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("auth_client").with_operation(operation),
            })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, operation).await);
        }

        Ok(response)
    }
}

#[async_trait]
impl AuthBackend for HttpAuthClient {
    async fn login(&self, request: &LoginRequest) -> StorefrontResult<AuthResponse> {
        let response = self
            .post_json("auth/login", request, None, "login")
            .await?;

        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| StorefrontError::Protocol {
                message: format!("Failed to parse login response: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("auth_client").with_operation("login"),
            })
    }

    async fn register(&self, request: &RegisterRequest) -> StorefrontResult<AuthResponse> {
        let response = self
            .post_json("auth/register", request, None, "register")
            .await?;

        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| StorefrontError::Protocol {
                message: format!("Failed to parse register response: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("auth_client").with_operation("register"),
            })
    }

    async fn fetch_profile(&self, token: &str) -> StorefrontResult<UserRecord> {
        let response = self
            .get_authorized("auth/profile", token, "fetch_profile")
            .await?;

        response
            .json::<UserRecord>()
            .await
            .map_err(|e| StorefrontError::Protocol {
                message: format!("Failed to parse profile response: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("auth_client").with_operation("fetch_profile"),
            })
    }

    async fn notify_logout(&self, token: &str) -> StorefrontResult<()> {
        self.post_json("auth/logout", &serde_json::json!({}), Some(token), "notify_logout")
            .await?;
        Ok(())
    }
}

/// Create an HTTP client with the configured timeout and user agent
pub fn create_http_client(config: &BackendSettings) -> StorefrontResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            StorefrontError::Config {
                message: format!("Invalid user agent: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?,
    );

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()
        .map_err(|e| StorefrontError::Network {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })?;

    Ok(client)
}

/// Classify a non-success HTTP response
///
/// 401/403 become authentication errors so callers can distinguish "the
/// backend rejected this session" from everything else. The backend's JSON
/// `{message}` envelope is surfaced verbatim when present.
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    operation: &str,
) -> StorefrontError {
    let status = response.status();
    let url = response.url().clone();

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(envelope) => envelope.message,
        Err(_) if !body.is_empty() => body,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        warn!("Authorization failure from {} ({})", url, status.as_u16());
        return StorefrontError::Authentication {
            message,
            context: ErrorContext::new("auth_client")
                .with_operation(operation)
                .with_suggestion("Log in again to obtain a fresh token"),
        };
    }

    StorefrontError::Backend {
        status: status.as_u16(),
        message,
        context: ErrorContext::new("auth_client")
            .with_operation(operation)
            .with_suggestion(match status.as_u16() {
                404 => "Check the backend base URL",
                429 => "Back off and retry later",
                _ => "Check backend availability and API status",
            }),
    }
}
