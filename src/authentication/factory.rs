//! Service factory wiring collaborators from settings
//!
//! The binary uses the in-memory collaborators seeded from `Settings.toml`.
//! Embedding applications with real session stores or directories pass their
//! own implementations to [`AuthenticationServiceFactory::create_resolver_with`].

use std::sync::Arc;

use super::memory::{InMemoryAccountDirectory, InMemorySessionStore, StaticRoutingService};
use super::traits::{AccountDirectory, RoutingService, SessionStore};
use crate::credentials::CredentialStore;
use crate::session::{SessionResolver, SessionTokenExtractor};
use crate::settings::AuthnSettings;

/// Factory for the resolver and its collaborators
pub struct AuthenticationServiceFactory;

impl AuthenticationServiceFactory {
    /// Resolver backed by the in-memory session store and static routing
    #[must_use]
    pub fn create_resolver(settings: &AuthnSettings) -> SessionResolver {
        Self::create_resolver_with(
            settings,
            Self::create_session_store(settings),
            Self::create_routing_service(settings),
        )
    }

    /// Resolver configured from `settings` around the given collaborators
    #[must_use]
    pub fn create_resolver_with(
        settings: &AuthnSettings,
        session_store: Arc<dyn SessionStore>,
        routing_service: Arc<dyn RoutingService>,
    ) -> SessionResolver {
        let session = &settings.session;
        log::info!(
            "🏭 Session resolver: login path {}, context cookie {}",
            session.login_path,
            session.context_cookie
        );

        SessionResolver::new(session_store, routing_service)
            .with_extractor(SessionTokenExtractor::new(
                &session.context_cookie,
                &session.session_id_field,
            ))
            .with_login_path(&session.login_path)
            .with_original_url_header(&session.original_url_header)
    }

    #[must_use]
    pub fn create_session_store(settings: &AuthnSettings) -> Arc<dyn SessionStore> {
        if settings.sessions.is_empty() {
            log::warn!("No sessions configured; every request will be anonymous");
        } else {
            log::info!("Seeded session store with {} session(s)", settings.sessions.len());
        }
        Arc::new(InMemorySessionStore::from_map(settings.sessions.clone()))
    }

    #[must_use]
    pub fn create_account_directory(settings: &AuthnSettings) -> Arc<dyn AccountDirectory> {
        Arc::new(InMemoryAccountDirectory::from_emails(&settings.accounts))
    }

    #[must_use]
    pub fn create_routing_service(settings: &AuthnSettings) -> Arc<dyn RoutingService> {
        Arc::new(StaticRoutingService::new(
            &settings.routing.appliance_base_url,
        ))
    }

    #[must_use]
    pub fn create_credential_store(settings: &AuthnSettings) -> CredentialStore {
        CredentialStore::new(&settings.credentials.tokens_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RequestBuilder, TestFixtures};
    use std::path::Path;

    #[test]
    fn test_create_resolver_from_settings() {
        let resolver = AuthenticationServiceFactory::create_resolver(&TestFixtures::settings());
        let request = RequestBuilder::get("/dashboard").context_cookie("s1").build();
        assert_eq!(
            resolver.authenticated_account_id(&request).as_deref(),
            Some("acct-42")
        );
        assert_eq!(
            resolver.login_redirect_url(&RequestBuilder::get("/").build()),
            "https://krista.example.com/login?X-Krista-Original-URI=%2F"
        );
    }

    #[test]
    fn test_resolver_honours_session_settings() {
        let mut settings = TestFixtures::settings();
        settings.session.login_path = "/authn/login".to_string();
        settings.session.original_url_header = "X-Original".to_string();
        let resolver = AuthenticationServiceFactory::create_resolver(&settings);

        assert_eq!(resolver.login_path(), "/authn/login");
        let request = RequestBuilder::get("/authn/login?clientSessionId=s2").build();
        assert_eq!(
            resolver.authenticated_account_id(&request).as_deref(),
            Some("acct-7")
        );
        assert!(resolver
            .login_redirect_url(&RequestBuilder::get("/x").build())
            .ends_with("/authn/login?X-Original=%2Fx"));
    }

    #[test]
    fn test_account_directory_from_settings() {
        let mut settings = TestFixtures::settings();
        settings.accounts = vec!["Known@Example.com".to_string()];
        let directory = AuthenticationServiceFactory::create_account_directory(&settings);
        assert!(directory.lookup_account("known@example.com").is_some());
        assert!(directory.lookup_account("other@example.com").is_none());
    }

    #[test]
    fn test_credential_store_directory() {
        let mut settings = TestFixtures::settings();
        settings.credentials.tokens_dir = "/var/lib/tokens".to_string();
        let store = AuthenticationServiceFactory::create_credential_store(&settings);
        assert_eq!(store.directory(), Path::new("/var/lib/tokens"));
    }
}
