//! Request builders for exercising the resolver without a server

use serde_json::Value;

use crate::session::{RawRequest, CONTEXT_COOKIE, SESSION_ID_COOKIE};

/// Builder for [`RawRequest`]
pub struct RequestBuilder {
    request: RawRequest,
}

impl RequestBuilder {
    #[must_use]
    pub fn new(method: &str, target: &str) -> Self {
        Self {
            request: RawRequest::new(method, target),
        }
    }

    #[must_use]
    pub fn get(target: &str) -> Self {
        Self::new("GET", target)
    }

    #[must_use]
    pub fn post(target: &str) -> Self {
        Self::new("POST", target)
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request
            .headers
            .push((name.to_string(), value.to_string()));
        self
    }

    /// Add a `Cookie` header carrying the URL-encoded request context for `session_id`
    #[must_use]
    pub fn context_cookie(self, session_id: &str) -> Self {
        let context = serde_json::json!({ SESSION_ID_COOKIE: session_id }).to_string();
        let cookie = format!("{CONTEXT_COOKIE}={}", urlencoding::encode(&context));
        self.header("Cookie", &cookie)
    }

    #[must_use]
    pub fn origin(self, origin: &str) -> Self {
        self.header("Origin", origin)
    }

    /// Set a JSON body
    #[must_use]
    pub fn json(mut self, body: &Value) -> Self {
        self.request.body = body.to_string().into_bytes();
        self
    }

    /// Set a raw body
    #[must_use]
    pub fn body(mut self, body: &[u8]) -> Self {
        self.request.body = body.to_vec();
        self
    }

    /// Make reading the body fail
    #[must_use]
    pub fn failing_body(mut self, message: &str) -> Self {
        self.request.body_error = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> RawRequest {
        self.request
    }
}
