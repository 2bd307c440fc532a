//! Route authorization
//!
//! A route declares which roles may enter it; the guard decides against a
//! session snapshot. The decision function is pure and framework-free so the
//! routing layer can call it before rendering any protected view.

use std::collections::HashSet;
use storefront_core::Role;

use crate::session::types::SessionSnapshot;

/// Role requirement declared by a navigation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Anyone may enter, authenticated or not
    Public,
    /// Only sessions whose role is in the set may enter
    AnyOf(HashSet<Role>),
}

impl RouteRequirement {
    /// No requirement at all
    pub fn none() -> Self {
        RouteRequirement::Public
    }

    /// Exactly one permitted role
    pub fn role(role: Role) -> Self {
        RouteRequirement::AnyOf([role].into_iter().collect())
    }

    /// A set of permitted roles
    pub fn any_of<I: IntoIterator<Item = Role>>(roles: I) -> Self {
        RouteRequirement::AnyOf(roles.into_iter().collect())
    }

    /// Any authenticated session, regardless of role
    pub fn authenticated() -> Self {
        RouteRequirement::AnyOf(Role::ALL.into_iter().collect())
    }

    pub fn is_public(&self) -> bool {
        matches!(self, RouteRequirement::Public)
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Why access was denied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// No session; the caller should redirect to login
    Unauthenticated,
    /// Session exists but its role is not permitted
    Forbidden { role: Role },
}

/// Decide whether a session may enter a route
///
/// Pure function of the snapshot and the requirement. Callers take a fresh
/// snapshot per navigation event; the role can only change through
/// logout+login, but the route changes independently.
pub fn authorize(snapshot: &SessionSnapshot, requirement: &RouteRequirement) -> AccessDecision {
    match requirement {
        RouteRequirement::Public => AccessDecision::Allow,
        RouteRequirement::AnyOf(roles) => match snapshot.role() {
            None => AccessDecision::Deny(DenyReason::Unauthenticated),
            Some(role) if roles.contains(&role) => AccessDecision::Allow,
            Some(role) => AccessDecision::Deny(DenyReason::Forbidden { role }),
        },
    }
}

/// Requirements for route groups, matched by longest path prefix
pub struct RouteTable {
    // kept sorted by descending prefix length so the first match wins
    entries: Vec<(String, RouteRequirement)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Declare a requirement for a path prefix
    pub fn route(mut self, prefix: &str, requirement: RouteRequirement) -> Self {
        self.entries.push((prefix.to_string(), requirement));
        self.entries
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        self
    }

    /// Requirement for a concrete path. Unmatched paths are public.
    pub fn requirement_for(&self, path: &str) -> &RouteRequirement {
        static PUBLIC: RouteRequirement = RouteRequirement::Public;

        self.entries
            .iter()
            .find(|(prefix, _)| {
                path == prefix
                    || (path.starts_with(prefix)
                        && (prefix.ends_with('/')
                            || path[prefix.len()..].starts_with('/')))
            })
            .map(|(_, requirement)| requirement)
            .unwrap_or(&PUBLIC)
    }

    /// The storefront's portal layout: one route group per role, shared
    /// authenticated pages, everything else public.
    pub fn storefront_defaults() -> Self {
        Self::new()
            .route("/buyer", RouteRequirement::role(Role::Buyer))
            .route("/seller", RouteRequirement::role(Role::Seller))
            .route("/supplier", RouteRequirement::role(Role::Supplier))
            .route(
                "/admin",
                RouteRequirement::any_of([Role::Admin, Role::SuperAdmin]),
            )
            .route("/dashboard", RouteRequirement::authenticated())
            .route("/orders", RouteRequirement::authenticated())
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::storefront_defaults()
    }
}
