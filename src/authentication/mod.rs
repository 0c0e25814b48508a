//! Collaborator traits, in-memory implementations and the service factory
//!
//! The resolver never talks to a concrete session store, account directory or
//! routing service. It receives trait objects built by
//! [`AuthenticationServiceFactory`] or by the embedding application.

pub mod factory;
pub mod memory;
pub mod traits;

pub use factory::AuthenticationServiceFactory;
pub use memory::{InMemoryAccountDirectory, InMemorySessionStore, StaticRoutingService};
pub use traits::{AccountDirectory, RoutingService, RoutingTarget, SessionStore, HTTP_PROTOCOL};
