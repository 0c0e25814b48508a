//! Email address validation
//!
//! Addresses are trimmed and lower-cased before matching, so `" Abc@Example.COM "`
//! is valid and normalizes to `"abc@example.com"`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AuthnError, Result};

static EMAIL_ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_+&*-]+(?:\.[a-z0-9_+&*-]+)*@(?:[a-z0-9-]+\.)+[a-z]{2,7}$").unwrap()
});

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Whether `email` is syntactically a single `local@domain` address
#[must_use]
pub fn is_valid_email_address(email: &str) -> bool {
    if email.trim().is_empty() {
        return false;
    }
    EMAIL_ADDRESS_PATTERN.is_match(&normalize(email))
}

/// Trimmed, lower-cased form of a valid address
///
/// # Errors
///
/// Returns `AuthnError::Validation` if the address is not valid
pub fn normalize_email_address(email: &str) -> Result<String> {
    if !is_valid_email_address(email) {
        return Err(AuthnError::Validation(
            "Email address is not valid".to_string(),
        ));
    }
    Ok(normalize(email))
}

/// Domain part of a valid address, normalized
///
/// # Errors
///
/// Returns `AuthnError::Validation` if the address is not valid
pub fn get_domain_name(email: &str) -> Result<String> {
    let normalized = normalize_email_address(email)?;
    split_normalized(&normalized).map(|(_, domain)| domain.to_string())
}

/// Local part of a valid address, normalized
///
/// # Errors
///
/// Returns `AuthnError::Validation` if the address is not valid
pub fn get_local_part(email: &str) -> Result<String> {
    let normalized = normalize_email_address(email)?;
    split_normalized(&normalized).map(|(local, _)| local.to_string())
}

fn split_normalized(normalized: &str) -> Result<(&str, &str)> {
    normalized
        .split_once('@')
        .ok_or_else(|| AuthnError::Validation("Email address is not valid".to_string()))
}
