//! Core data type definitions

use serde::{Deserialize, Serialize};

/// Role tags recognized by the backend
///
/// The set is fixed; the backend rejects anything else. Serialized with the
/// exact string tags the REST API uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Supplier,
    Admin,
    #[serde(rename = "super-admin")]
    SuperAdmin,
}

impl Role {
    /// All roles, in declaration order
    pub const ALL: [Role; 5] = [
        Role::Buyer,
        Role::Seller,
        Role::Supplier,
        Role::Admin,
        Role::SuperAdmin,
    ];

    /// Roles a user may pick for themselves at registration.
    /// Admin accounts are provisioned out-of-band.
    pub fn is_self_assignable(&self) -> bool {
        matches!(self, Role::Buyer | Role::Seller | Role::Supplier)
    }

    /// Default landing route for this role after login
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::Buyer => "/buyer/dashboard",
            Role::Seller => "/seller/dashboard",
            Role::Supplier => "/supplier/dashboard",
            Role::Admin | Role::SuperAdmin => "/admin/dashboard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Buyer => write!(f, "buyer"),
            Role::Seller => write!(f, "seller"),
            Role::Supplier => write!(f, "supplier"),
            Role::Admin => write!(f, "admin"),
            Role::SuperAdmin => write!(f, "super-admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buyer" => Ok(Role::Buyer),
            "seller" => Ok(Role::Seller),
            "supplier" => Ok(Role::Supplier),
            "admin" => Ok(Role::Admin),
            "super-admin" => Ok(Role::SuperAdmin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// User record as held by the client
///
/// A closed record: unknown fields sent by the backend are dropped during
/// deserialization instead of being carried around untyped. Replaced
/// wholesale on every profile fetch, never partially mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Top-level client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    pub backend: BackendSettings,
    pub storage: StorageSettings,
    pub logging: crate::logging::LoggingConfig,
}

/// Settings for talking to the REST backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the REST backend
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string sent with every request
    pub user_agent: String,
}

/// Settings for durable client-side state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding the persisted credential token
    pub data_dir: std::path::PathBuf,
}
