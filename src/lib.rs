#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the krista-authn service
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod authentication;
pub mod credentials;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod policy;
pub mod session;
pub mod settings;
pub mod utils;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use authentication::AuthenticationServiceFactory;
pub use credentials::CredentialStore;
pub use errors::{AuthnError, Result};
pub use identity::IdentityResponseParser;
pub use models::{AuthOutcome, AuthenticatedIdentity, SessionId, TokenRecord};
pub use session::{SessionResolver, SessionTokenExtractor};
pub use settings::AuthnSettings;
