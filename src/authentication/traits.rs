//! Collaborator interfaces consumed by the authentication core
//!
//! The session store, the account directory and the routing service live
//! outside this crate. They are injected as `Arc<dyn Trait>` into the
//! components that need them so every component can be tested with in-memory
//! fakes.

use std::fmt;

/// Kind of routing target whose base URL is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingTarget {
    /// The appliance hosting the sign-in page
    Appliance,
}

impl fmt::Display for RoutingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Appliance => write!(f, "APPLIANCE"),
        }
    }
}

/// Protocol name used when asking the routing service for HTTP URLs
pub const HTTP_PROTOCOL: &str = "HTTP";

/// Server-side session store
///
/// Implementations perform the lookup synchronously; callers that need
/// deadlines or retries impose them around the call.
pub trait SessionStore: Send + Sync {
    /// Account id bound to `session_id`, or `None` when the session is unknown
    fn lookup_account_id(&self, session_id: &str) -> Option<String>;
}

/// Workspace account directory
pub trait AccountDirectory: Send + Sync {
    /// Account id registered for `email`, or `None` when no account exists
    fn lookup_account(&self, email: &str) -> Option<String>;
}

/// Routing service resolving externally visible base URLs
pub trait RoutingService: Send + Sync {
    /// Base URL (no trailing slash) for `target` over `protocol`
    fn routing_url_for(&self, protocol: &str, target: RoutingTarget) -> String;
}
