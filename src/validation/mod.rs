//! Validation Module
//!
//! Pure validation rules shared by the session resolver, the identity parser
//! and the authorization policy helpers.
//!
//! # Modules
//!
//! - [`email`] - Email address syntax, normalization and splitting
//! - [`domain`] - Domain name syntax and workspace domain allow-lists

pub mod domain;
pub mod email;

// Re-export commonly used items for convenience
pub use domain::{
    is_email_domain_present_in_supported_workspace_domains, is_valid_domain, validate_domains,
    DomainPolicy, ALL_DOMAINS,
};
pub use email::{get_domain_name, get_local_part, is_valid_email_address, normalize_email_address};
