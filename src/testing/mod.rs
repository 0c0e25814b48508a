//! Testing utilities for krista-authn
//!
//! Compiled for unit tests and, with the `testing` feature, for integration
//! tests and downstream crates.
//!
//! - [`fixtures`] - Create-session payloads, token records and wired resolvers
//! - [`requests`] - Fluent builder for [`crate::session::RawRequest`]
//! - [`mock`] - Collaborator fakes that record how they were called
//!
//! ```rust,ignore
//! use krista_authn::testing::{RequestBuilder, TestFixtures};
//!
//! let resolver = TestFixtures::resolver();
//! let request = RequestBuilder::get("/dashboard").context_cookie("s1").build();
//! assert_eq!(resolver.authenticated_account_id(&request).as_deref(), Some("acct-42"));
//! ```

pub mod fixtures;
pub mod mock;
pub mod requests;

pub use fixtures::TestFixtures;
pub use mock::RecordingSessionStore;
pub use requests::RequestBuilder;

/// Common test constants
pub mod constants {
    /// Default test email address
    pub const TEST_EMAIL: &str = "test@example.com";

    /// Appliance base URL used by fixture routing services
    pub const TEST_APPLIANCE_URL: &str = "https://krista.example.com";

    /// Origin of a browser talking to the login endpoint over https
    pub const TEST_SECURE_ORIGIN: &str = "https://app.example.com";

    /// Session bindings of the fixture session store
    pub const TEST_SESSIONS: &[(&str, &str)] = &[("s1", "acct-42"), ("s2", "acct-7")];
}
