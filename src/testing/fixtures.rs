//! Pre-built test data

use serde_json::{json, Value};
use std::sync::Arc;

use super::constants::{TEST_APPLIANCE_URL, TEST_SESSIONS};
use crate::authentication::{InMemorySessionStore, StaticRoutingService};
use crate::models::TokenRecord;
use crate::session::SessionResolver;
use crate::settings::AuthnSettings;

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Well-formed create-session response with every optional field present
    #[must_use]
    pub fn create_session_response() -> Value {
        json!({
            "clientSessionId": "session-1",
            "kristaAccountId": "krista-account-1",
            "person": {
                "name": "Jane Doe",
                "icon": { "uri": "https://cdn.example.com/jane.png" }
            },
            "account": {
                "name": "Jane Doe",
                "personId": { "id": "person-1" },
                "localId": { "id": "account-local-1" },
                "inboxId": { "id": "inbox-1" },
                "roles": [ { "id": "role-admin" }, { "id": "role-user" } ],
                "isWorkspaceAdmin": true,
                "isApplianceManager": false
            }
        })
    }

    /// Token record whose access token expired and refresh token is still valid
    /// at 2023-11-14T22:13:20Z
    #[must_use]
    pub fn token_record(account_id: &str) -> TokenRecord {
        TokenRecord {
            account_id: account_id.to_string(),
            invoker_id: "invoker-1".to_string(),
            refresh_token: "refresh-token".to_string(),
            access_token: "access-token".to_string(),
            refresh_token_expiry_epoch_ms: 1_900_000_000_000,
            access_token_expiry_epoch_ms: 1_600_000_000_000,
        }
    }

    /// Session store holding the fixture bindings
    #[must_use]
    pub fn session_store() -> InMemorySessionStore {
        TEST_SESSIONS
            .iter()
            .fold(InMemorySessionStore::new(), |store, (session_id, account_id)| {
                store.with_session(session_id, account_id)
            })
    }

    /// Resolver over [`TestFixtures::session_store`] with the default login path
    #[must_use]
    pub fn resolver() -> SessionResolver {
        SessionResolver::new(
            Arc::new(Self::session_store()),
            Arc::new(StaticRoutingService::new(TEST_APPLIANCE_URL)),
        )
    }

    /// Default settings pointing at the fixture appliance and sessions
    #[must_use]
    pub fn settings() -> AuthnSettings {
        let mut settings = AuthnSettings::default();
        settings.routing.appliance_base_url = TEST_APPLIANCE_URL.to_string();
        settings.sessions = TEST_SESSIONS
            .iter()
            .map(|(session_id, account_id)| ((*session_id).to_string(), (*account_id).to_string()))
            .collect();
        settings
    }
}
