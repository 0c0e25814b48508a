//! Conversion of create-session responses into [`crate::models::AuthenticatedIdentity`]

pub mod parser;

pub use parser::{IdentityResponseParser, REQUIRED_ACCOUNT_KEYS, REQUIRED_RESPONSE_KEYS};
