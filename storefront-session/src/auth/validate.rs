//! Synchronous credential validation
//!
//! Malformed input is rejected here, before any network call is made.

use storefront_api::{LoginRequest, RegisterRequest};
use storefront_core::{validation_error, StorefrontResult};

const MIN_PASSWORD_LEN: usize = 6;
const MIN_NAME_LEN: usize = 2;

fn validate_email(email: &str) -> StorefrontResult<()> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };

    if !well_formed {
        return Err(validation_error!(
            "Please enter a valid email address",
            "email",
            "credential_validation"
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> StorefrontResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(validation_error!(
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            "password",
            "credential_validation"
        ));
    }
    Ok(())
}

/// Validate login credentials
pub fn validate_login(request: &LoginRequest) -> StorefrontResult<()> {
    validate_email(&request.email)?;
    validate_password(&request.password)?;
    Ok(())
}

/// Validate registration data
///
/// Only buyer, seller, and supplier accounts can be self-registered; admin
/// accounts are provisioned out-of-band.
pub fn validate_registration(request: &RegisterRequest) -> StorefrontResult<()> {
    if request.name.trim().chars().count() < MIN_NAME_LEN {
        return Err(validation_error!(
            format!("Name must be at least {} characters", MIN_NAME_LEN),
            "name",
            "credential_validation"
        ));
    }

    validate_email(&request.email)?;
    validate_password(&request.password)?;

    if !request.role.is_self_assignable() {
        return Err(validation_error!(
            format!("Role '{}' cannot be self-registered", request.role),
            "role",
            "credential_validation"
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{Role, StorefrontError};

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_credentials() {
        assert!(validate_login(&login("a@b.com", "secret1")).is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["", "plainaddress", "@no-local.com", "user@nodot"] {
            let err = validate_login(&login(email, "secret1")).unwrap_err();
            match err {
                StorefrontError::Validation { field, .. } => {
                    assert_eq!(field.as_deref(), Some("email"))
                }
                other => panic!("Expected Validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn rejects_short_password() {
        let err = validate_login(&login("a@b.com", "12345")).unwrap_err();
        match err {
            StorefrontError::Validation { field, .. } => {
                assert_eq!(field.as_deref(), Some("password"))
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_admin_self_registration() {
        for role in [Role::Admin, Role::SuperAdmin] {
            let err = validate_registration(&RegisterRequest {
                name: "Eve".to_string(),
                email: "eve@shop.example".to_string(),
                password: "secret1".to_string(),
                role,
            })
            .unwrap_err();
            match err {
                StorefrontError::Validation { field, .. } => {
                    assert_eq!(field.as_deref(), Some("role"))
                }
                other => panic!("Expected Validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn rejects_short_name() {
        let err = validate_registration(&RegisterRequest {
            name: "E".to_string(),
            email: "eve@shop.example".to_string(),
            password: "secret1".to_string(),
            role: Role::Buyer,
        })
        .unwrap_err();
        assert!(matches!(err, StorefrontError::Validation { .. }));
    }
}
