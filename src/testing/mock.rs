//! Collaborator fakes

use std::sync::Mutex;

use crate::authentication::{InMemorySessionStore, SessionStore};

/// Session store that records every looked-up session id
#[derive(Debug, Default)]
pub struct RecordingSessionStore {
    inner: InMemorySessionStore,
    lookups: Mutex<Vec<String>>,
}

impl RecordingSessionStore {
    #[must_use]
    pub fn new(inner: InMemorySessionStore) -> Self {
        Self {
            inner,
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Session ids looked up so far, in call order
    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        self.lookups
            .lock()
            .map(|lookups| lookups.clone())
            .unwrap_or_default()
    }
}

impl SessionStore for RecordingSessionStore {
    fn lookup_account_id(&self, session_id: &str) -> Option<String> {
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push(session_id.to_string());
        }
        self.inner.lookup_account_id(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authentication::StaticRoutingService;
    use crate::session::SessionResolver;
    use crate::testing::{RequestBuilder, TestFixtures};
    use serde_json::json;
    use std::sync::Arc;

    fn resolver(store: &Arc<RecordingSessionStore>) -> SessionResolver {
        SessionResolver::new(
            store.clone(),
            Arc::new(StaticRoutingService::new("https://krista.example.com")),
        )
    }

    #[test]
    fn test_cookie_hit_skips_fallback() {
        let store = Arc::new(RecordingSessionStore::new(TestFixtures::session_store()));
        let request = RequestBuilder::post("/login")
            .context_cookie("s1")
            .json(&json!({"clientSessionId": "s2"}))
            .build();

        assert_eq!(
            resolver(&store).authenticated_account_id(&request).as_deref(),
            Some("acct-42")
        );
        assert_eq!(store.lookups(), vec!["s1".to_string()]);
    }

    #[test]
    fn test_fallback_looks_up_once_more() {
        let store = Arc::new(RecordingSessionStore::new(TestFixtures::session_store()));
        let request = RequestBuilder::post("/login")
            .context_cookie("stale")
            .json(&json!({"clientSessionId": "unknown"}))
            .build();

        assert_eq!(resolver(&store).authenticated_account_id(&request), None);
        assert_eq!(
            store.lookups(),
            vec!["stale".to_string(), "unknown".to_string()]
        );
    }

    #[test]
    fn test_no_fallback_lookup_outside_login_path() {
        let store = Arc::new(RecordingSessionStore::new(TestFixtures::session_store()));
        let request = RequestBuilder::get("/dashboard?clientSessionId=s1").build();

        assert_eq!(resolver(&store).authenticated_account_id(&request), None);
        assert!(store.lookups().is_empty());
    }
}
