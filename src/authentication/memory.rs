//! In-memory collaborator implementations
//!
//! Used by the binary (seeded from settings) and by tests.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use super::traits::{AccountDirectory, RoutingService, RoutingTarget, SessionStore};

/// Session store backed by a map of session id to account id
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_map(sessions: HashMap<String, String>) -> Self {
        Self {
            sessions: RwLock::new(sessions),
        }
    }

    /// Bind `session_id` to `account_id`, replacing any previous binding
    #[must_use]
    pub fn with_session(self, session_id: &str, account_id: &str) -> Self {
        self.bind(session_id, account_id);
        self
    }

    pub fn bind(&self, session_id: &str, account_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(session_id.to_string(), account_id.to_string());
        }
    }

    pub fn revoke(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(session_id);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().map_or(0, |sessions| sessions.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn lookup_account_id(&self, session_id: &str) -> Option<String> {
        self.sessions
            .read()
            .ok()
            .and_then(|sessions| sessions.get(session_id).cloned())
    }
}

/// Account directory keyed by lower-cased email
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    accounts: HashMap<String, String>,
}

impl InMemoryAccountDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory where each email is its own account id
    #[must_use]
    pub fn from_emails<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accounts = emails
            .into_iter()
            .map(|email| {
                let email = email.as_ref().trim().to_lowercase();
                (email.clone(), email)
            })
            .collect();
        Self { accounts }
    }

    #[must_use]
    pub fn with_account(mut self, email: &str, account_id: &str) -> Self {
        self.accounts
            .insert(email.trim().to_lowercase(), account_id.to_string());
        self
    }

    #[must_use]
    pub fn emails(&self) -> HashSet<&str> {
        self.accounts.keys().map(String::as_str).collect()
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn lookup_account(&self, email: &str) -> Option<String> {
        self.accounts.get(&email.trim().to_lowercase()).cloned()
    }
}

/// Routing service answering every request with one configured base URL
#[derive(Debug, Clone)]
pub struct StaticRoutingService {
    base_url: String,
}

impl StaticRoutingService {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl RoutingService for StaticRoutingService {
    fn routing_url_for(&self, protocol: &str, target: RoutingTarget) -> String {
        log::debug!("Routing {protocol} {target} to {}", self.base_url);
        self.base_url.clone()
    }
}
