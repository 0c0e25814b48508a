//! Request authentication against the external session store
//!
//! Per request the resolver runs a fixed sequence:
//!
//! 1. session id from the context cookie, looked up in the store
//! 2. only for the login endpoint: session id from the query (GET) or the JSON
//!    body (POST), looked up once more
//! 3. otherwise anonymous
//!
//! Malformed cookies never fail the request; they resolve to anonymous.

use actix_web::HttpResponse;
use std::sync::Arc;

use super::cookie::session_set_cookie;
use super::extractor::SessionTokenExtractor;
use super::request::InboundRequest;
use crate::authentication::{RoutingService, RoutingTarget, SessionStore, HTTP_PROTOCOL};
use crate::models::{AuthOutcome, SessionId};
use crate::utils::response_builder::ResponseBuilder;

/// Default path of the login entry point
pub const DEFAULT_LOGIN_PATH: &str = "/login";
/// Header carrying the URL the client originally asked for
pub const ORIGINAL_URL_HEADER: &str = "X-Krista-Original-URI";

/// Result of an explicit login submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The presented session is bound to `account_id`
    Accepted {
        account_id: String,
        /// `Set-Cookie` header value carrying the encoded session id
        set_cookie: String,
    },
    /// No session id was presented or the store does not know it
    Rejected,
}

/// Authentication entry point
pub struct SessionResolver {
    session_store: Arc<dyn SessionStore>,
    routing_service: Arc<dyn RoutingService>,
    extractor: SessionTokenExtractor,
    login_path: String,
    original_url_header: String,
}

impl SessionResolver {
    #[must_use]
    pub fn new(
        session_store: Arc<dyn SessionStore>,
        routing_service: Arc<dyn RoutingService>,
    ) -> Self {
        Self {
            session_store,
            routing_service,
            extractor: SessionTokenExtractor::default(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            original_url_header: ORIGINAL_URL_HEADER.to_string(),
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: SessionTokenExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, login_path: &str) -> Self {
        self.login_path = login_path.to_string();
        self
    }

    #[must_use]
    pub fn with_original_url_header(mut self, header: &str) -> Self {
        self.original_url_header = header.to_string();
        self
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn is_login_request(&self, request: &dyn InboundRequest) -> bool {
        request.path() == self.login_path
    }

    /// Resolve the account bound to the request's session
    pub fn resolve(&self, request: &dyn InboundRequest) -> AuthOutcome {
        if let Some(account_id) = self.cookie_session(request).and_then(|id| self.lookup(&id)) {
            return AuthOutcome::Authenticated(account_id);
        }

        if !self.is_login_request(request) {
            return AuthOutcome::Anonymous;
        }

        self.extractor
            .from_fallback(request)
            .and_then(|id| self.lookup(&id))
            .into()
    }

    /// Account id of the request's session, if any
    pub fn authenticated_account_id(&self, request: &dyn InboundRequest) -> Option<String> {
        match self.resolve(request) {
            AuthOutcome::Authenticated(account_id) => Some(account_id),
            AuthOutcome::Anonymous => None,
        }
    }

    /// Account id for a session carried in the raw request-context header
    pub fn account_id_from_context_header(&self, request: &dyn InboundRequest) -> Option<String> {
        let header = request.header(self.extractor.context_cookie());
        match self.extractor.from_context_header(header) {
            Ok(Some(session_id)) => self.lookup(&session_id),
            Ok(None) => None,
            Err(e) => {
                log::debug!("Ignoring request context header: {e}");
                None
            }
        }
    }

    /// Sign-in URL for an anonymous request
    ///
    /// The original URL comes from the original-URL header, or from the
    /// request's own path and query when the header is absent.
    pub fn login_redirect_url(&self, request: &dyn InboundRequest) -> String {
        let base_url = self
            .routing_service
            .routing_url_for(HTTP_PROTOCOL, RoutingTarget::Appliance);
        let original_url = request
            .header(&self.original_url_header)
            .map_or_else(|| request.path_and_query(), str::to_string);

        format!(
            "{}{}?{}={}",
            base_url.trim_end_matches('/'),
            self.login_path,
            self.original_url_header,
            urlencoding::encode(&original_url)
        )
    }

    /// `302 Found` pointing at the sign-in page
    pub fn must_authenticate_response(&self, request: &dyn InboundRequest) -> HttpResponse {
        let location = self.login_redirect_url(request);
        log::debug!("Redirecting anonymous request for {} to sign-in", request.path());
        ResponseBuilder::redirect(&location)
    }

    /// Handle an explicit login submission
    ///
    /// The session id is taken from the JSON body, or from the context cookie
    /// when the body has none. The issued cookie is marked secure when the
    /// `Origin` header is an https URL.
    pub fn login(&self, request: &dyn InboundRequest) -> LoginOutcome {
        let Some(session_id) = self
            .extractor
            .from_body(request)
            .filter(|id| !id.is_empty())
            .or_else(|| self.cookie_session(request))
        else {
            log::info!("Login submission without a session id");
            return LoginOutcome::Rejected;
        };

        match self.lookup(&session_id) {
            Some(account_id) => {
                let secure = is_secure_origin(request.header("Origin"));
                LoginOutcome::Accepted {
                    account_id,
                    set_cookie: session_set_cookie(&session_id, secure),
                }
            }
            None => {
                log::info!(
                    "Login rejected for unknown session {}",
                    session_id.fingerprint()
                );
                LoginOutcome::Rejected
            }
        }
    }

    fn cookie_session(&self, request: &dyn InboundRequest) -> Option<SessionId> {
        match self.extractor.from_cookie(request.header("Cookie")) {
            Ok(session_id) => session_id,
            Err(e) => {
                log::debug!("Treating request as anonymous: {e}");
                None
            }
        }
    }

    fn lookup(&self, session_id: &SessionId) -> Option<String> {
        let account_id = self.session_store.lookup_account_id(session_id.as_str());
        match &account_id {
            Some(_) => log::debug!("Session {} resolved", session_id.fingerprint()),
            None => log::debug!("Session {} is unknown", session_id.fingerprint()),
        }
        account_id
    }
}

fn is_secure_origin(origin: Option<&str>) -> bool {
    origin
        .and_then(|value| url::Url::parse(value).ok())
        .is_some_and(|origin| origin.scheme() == "https")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authentication::{InMemorySessionStore, StaticRoutingService};
    use crate::session::request::RawRequest;
    use crate::testing::constants::TEST_SECURE_ORIGIN;
    use crate::testing::RequestBuilder;

    fn resolver() -> SessionResolver {
        let store = InMemorySessionStore::new()
            .with_session("s1", "acct-42")
            .with_session("s2", "acct-7");
        SessionResolver::new(
            Arc::new(store),
            Arc::new(StaticRoutingService::new("https://krista.example.com")),
        )
    }

    fn with_context_cookie(mut request: RawRequest, session_id: &str) -> RawRequest {
        let context = format!(r#"{{"clientSessionId":"{session_id}"}}"#);
        request.headers.push((
            "Cookie".to_string(),
            format!("X-Krista-Context={}", urlencoding::encode(&context)),
        ));
        request
    }

    fn with_body(mut request: RawRequest, body: &str) -> RawRequest {
        request.body = body.as_bytes().to_vec();
        request
    }

    #[test]
    fn test_cookie_session_resolves_anywhere() {
        let resolver = resolver();
        let request = with_context_cookie(RawRequest::new("GET", "/dashboard"), "s1");
        assert_eq!(
            resolver.resolve(&request),
            AuthOutcome::Authenticated("acct-42".to_string())
        );
    }

    #[test]
    fn test_unknown_cookie_session_is_anonymous() {
        let resolver = resolver();
        let request = with_context_cookie(RawRequest::new("GET", "/dashboard"), "nope");
        assert_eq!(resolver.resolve(&request), AuthOutcome::Anonymous);
    }

    #[test]
    fn test_body_fallback_only_on_login_path() {
        let resolver = resolver();
        let body = r#"{"clientSessionId":"s2"}"#;

        let login = with_body(RawRequest::new("POST", "/login"), body);
        assert_eq!(
            resolver.authenticated_account_id(&login),
            Some("acct-7".to_string())
        );

        let elsewhere = with_body(RawRequest::new("POST", "/api/things"), body);
        assert_eq!(resolver.resolve(&elsewhere), AuthOutcome::Anonymous);
    }

    #[test]
    fn test_query_fallback_only_on_login_path() {
        let resolver = resolver();
        let login = RawRequest::new("GET", "/login?clientSessionId=s2");
        assert_eq!(
            resolver.authenticated_account_id(&login),
            Some("acct-7".to_string())
        );

        let elsewhere = RawRequest::new("GET", "/home?clientSessionId=s2");
        assert_eq!(resolver.authenticated_account_id(&elsewhere), None);
    }

    #[test]
    fn test_unknown_cookie_falls_back_on_login_path() {
        let resolver = resolver();
        let request = with_body(
            with_context_cookie(RawRequest::new("POST", "/login"), "stale"),
            r#"{"clientSessionId":"s2"}"#,
        );
        assert_eq!(
            resolver.authenticated_account_id(&request),
            Some("acct-7".to_string())
        );
    }

    #[test]
    fn test_malformed_cookie_is_anonymous() {
        let resolver = resolver();
        let mut request = RawRequest::new("GET", "/dashboard");
        request.headers.push((
            "Cookie".to_string(),
            "X-Krista-Context=%7B%22clientSessionId%22%3A".to_string(),
        ));
        assert_eq!(resolver.resolve(&request), AuthOutcome::Anonymous);
    }

    #[test]
    fn test_custom_login_path() {
        let resolver = resolver().with_login_path("/authn/login");
        assert_eq!(resolver.login_path(), "/authn/login");
        let request = RawRequest::new("GET", "/authn/login?clientSessionId=s1");
        assert_eq!(
            resolver.authenticated_account_id(&request),
            Some("acct-42".to_string())
        );
        let request = RawRequest::new("GET", "/login?clientSessionId=s1");
        assert_eq!(resolver.authenticated_account_id(&request), None);
    }

    #[test]
    fn test_redirect_url_uses_original_url_header() {
        let resolver = resolver();
        let mut request = RawRequest::new("GET", "/dashboard");
        request.headers.push((
            "X-Krista-Original-URI".to_string(),
            "/app/home?tab=1".to_string(),
        ));
        assert_eq!(
            resolver.login_redirect_url(&request),
            "https://krista.example.com/login?X-Krista-Original-URI=%2Fapp%2Fhome%3Ftab%3D1"
        );
    }

    #[test]
    fn test_redirect_url_falls_back_to_request_target() {
        let resolver = resolver();
        let request = RawRequest::new("GET", "/reports?year=2024");
        assert_eq!(
            resolver.login_redirect_url(&request),
            "https://krista.example.com/login?X-Krista-Original-URI=%2Freports%3Fyear%3D2024"
        );
    }

    #[test]
    fn test_must_authenticate_response() {
        let resolver = resolver();
        let response = resolver.must_authenticate_response(&RawRequest::new("GET", "/"));
        assert_eq!(response.status(), actix_web::http::StatusCode::FOUND);
        assert_eq!(
            response
                .headers()
                .get("Location")
                .and_then(|v| v.to_str().ok()),
            Some("https://krista.example.com/login?X-Krista-Original-URI=%2F")
        );
    }

    #[test]
    fn test_login_from_body() {
        let resolver = resolver();
        let request = with_body(
            RawRequest::new("POST", "/login"),
            r#"{"clientSessionId":"s1"}"#,
        );
        assert_eq!(
            resolver.login(&request),
            LoginOutcome::Accepted {
                account_id: "acct-42".to_string(),
                set_cookie: "clientSessionId=czE=;HttpOnly;path=/".to_string(),
            }
        );
    }

    #[test]
    fn test_login_from_cookie_with_https_origin() {
        let resolver = resolver();
        let request = RequestBuilder::post("/login")
            .context_cookie("s2")
            .origin(TEST_SECURE_ORIGIN)
            .build();
        let LoginOutcome::Accepted { set_cookie, .. } = resolver.login(&request) else {
            panic!("expected login to be accepted");
        };
        assert!(set_cookie.ends_with(";SameSite=None;Secure"));
    }

    #[test]
    fn test_login_rejections() {
        let resolver = resolver();
        let unknown = with_body(
            RawRequest::new("POST", "/login"),
            r#"{"clientSessionId":"nope"}"#,
        );
        assert_eq!(resolver.login(&unknown), LoginOutcome::Rejected);

        let empty = with_body(RawRequest::new("POST", "/login"), "{}");
        assert_eq!(resolver.login(&empty), LoginOutcome::Rejected);
    }

    #[test]
    fn test_account_id_from_context_header() {
        let resolver = resolver();
        let mut request = RawRequest::new("GET", "/");
        request.headers.push((
            "X-Krista-Context".to_string(),
            urlencoding::encode(r#"{"clientSessionId":"s1"}"#).into_owned(),
        ));
        assert_eq!(
            resolver.account_id_from_context_header(&request),
            Some("acct-42".to_string())
        );

        let mut broken = RawRequest::new("GET", "/");
        broken
            .headers
            .push(("X-Krista-Context".to_string(), "%7B".to_string()));
        assert_eq!(resolver.account_id_from_context_header(&broken), None);
    }

    #[test]
    fn test_secure_origin_detection() {
        assert!(is_secure_origin(Some("https://a.example.com")));
        assert!(!is_secure_origin(Some("http://a.example.com")));
        assert!(!is_secure_origin(Some("not a url")));
        assert!(!is_secure_origin(None));
    }
}
