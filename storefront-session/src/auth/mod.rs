//! Authorization: route requirements, the navigation guard, and input validation

pub mod guard;
pub mod validate;

pub use guard::{authorize, AccessDecision, DenyReason, RouteRequirement, RouteTable};
pub use validate::{validate_login, validate_registration};
