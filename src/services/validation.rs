//! Field rules shared by registration, profile edits, password changes and
//! the admin user forms. Every check here runs before the store is touched.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ApiError;

pub const MISSING_FIELDS: &str = "Veuillez remplir tous les champs";
pub const INVALID_EMAIL: &str = "Email invalide";
pub const PASSWORD_TOO_SHORT: &str = "Mot de passe trop court";
pub const PASSWORD_MISMATCH: &str = "Les mots de passe ne correspondent pas";
pub const WRONG_PASSWORD: &str = "Mot de passe incorrect";

pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Value of a required text field; `None`, empty and whitespace-only all count as missing
pub fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Canonical stored form of an address: trimmed and lowercased, so one mailbox
/// maps to one account whatever case it is typed in
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ApiError::field_error("email", INVALID_EMAIL))
    }
}

pub fn validate_password_length(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LENGTH {
        Ok(())
    } else {
        Err(ApiError::field_error("password", PASSWORD_TOO_SHORT))
    }
}

/// Length first, then confirmation equality
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), ApiError> {
    validate_password_length(password)?;
    if password != confirm {
        return Err(ApiError::field_error("confirm", PASSWORD_MISMATCH));
    }
    Ok(())
}
