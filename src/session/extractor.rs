//! Session id extraction from cookies, query strings and JSON bodies
//!
//! The primary channel is the URL-encoded JSON context cookie. The query string
//! (GET) and the JSON body (POST) are fallbacks which the resolver only
//! consults for the login endpoint.

use serde_json::{Map, Value};

use super::cookie::{parse_cookie_header, CONTEXT_COOKIE, SESSION_ID_COOKIE};
use super::request::InboundRequest;
use crate::errors::{AuthnError, Result};
use crate::models::SessionId;

/// Pulls candidate session ids out of a request
#[derive(Debug, Clone)]
pub struct SessionTokenExtractor {
    context_cookie: String,
    session_id_field: String,
}

impl Default for SessionTokenExtractor {
    fn default() -> Self {
        Self::new(CONTEXT_COOKIE, SESSION_ID_COOKIE)
    }
}

impl SessionTokenExtractor {
    #[must_use]
    pub fn new(context_cookie: &str, session_id_field: &str) -> Self {
        Self {
            context_cookie: context_cookie.to_string(),
            session_id_field: session_id_field.to_string(),
        }
    }

    #[must_use]
    pub fn session_id_field(&self) -> &str {
        &self.session_id_field
    }

    #[must_use]
    pub fn context_cookie(&self) -> &str {
        &self.context_cookie
    }

    /// Session id from the context cookie of a `Cookie` header
    ///
    /// Returns `Ok(None)` when the header is absent, does not mention the
    /// session id field, or lacks the context cookie.
    ///
    /// # Errors
    ///
    /// Returns `AuthnError::Extraction` if the header, the cookie encoding or
    /// the JSON context is malformed
    pub fn from_cookie(&self, cookie_header: Option<&str>) -> Result<Option<SessionId>> {
        let Some(header) = cookie_header else {
            return Ok(None);
        };
        if !header.contains(self.session_id_field.as_str()) {
            return Ok(None);
        }

        let cookies = parse_cookie_header(header)?;
        match cookies.get(&self.context_cookie) {
            Some(value) if !value.trim().is_empty() => self.from_encoded_context(value),
            _ => Ok(None),
        }
    }

    /// Session id from a raw URL-encoded JSON context header value
    ///
    /// # Errors
    ///
    /// Returns `AuthnError::Extraction` if the value is not URL-encoded JSON
    pub fn from_context_header(&self, header_value: Option<&str>) -> Result<Option<SessionId>> {
        match header_value {
            Some(value) if !value.trim().is_empty() => self.from_encoded_context(value),
            _ => Ok(None),
        }
    }

    /// First value of the session id query parameter of a GET request
    #[must_use]
    pub fn from_query(&self, request: &dyn InboundRequest) -> Option<SessionId> {
        if !request.method().eq_ignore_ascii_case("GET") {
            return None;
        }
        request
            .query_values(&self.session_id_field)
            .into_iter()
            .next()
            .map(SessionId::from)
    }

    /// Session id field of the JSON body of a POST request
    ///
    /// A field that is absent or not a string yields an empty id. Unreadable,
    /// empty or non-JSON bodies yield `None`.
    #[must_use]
    pub fn from_body(&self, request: &dyn InboundRequest) -> Option<SessionId> {
        if !request.method().eq_ignore_ascii_case("POST") {
            return None;
        }

        let body = match request.body() {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Could not read request body: {e}");
                return None;
            }
        };
        if body.iter().all(u8::is_ascii_whitespace) {
            return None;
        }

        let object = match serde_json::from_slice::<Map<String, Value>>(&body) {
            Ok(object) => object,
            Err(e) => {
                log::debug!("Request body is not a JSON object: {e}");
                return None;
            }
        };

        let value = match object.get(&self.session_id_field) {
            Some(Value::String(value)) => value.clone(),
            _ => String::new(),
        };
        Some(SessionId::new(value))
    }

    /// Login-endpoint fallback: query for GET, body for POST
    #[must_use]
    pub fn from_fallback(&self, request: &dyn InboundRequest) -> Option<SessionId> {
        self.from_query(request).or_else(|| self.from_body(request))
    }

    fn from_encoded_context(&self, encoded: &str) -> Result<Option<SessionId>> {
        let decoded = urlencoding::decode(encoded)
            .map_err(|e| AuthnError::Extraction(format!("context is not UTF-8: {e}")))?;
        let context: Map<String, Value> = serde_json::from_str(&decoded)
            .map_err(|e| AuthnError::Extraction(format!("context is not a JSON object: {e}")))?;

        match context.get(&self.session_id_field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(SessionId::new(value.as_str()))),
            Some(other) => Err(AuthnError::Extraction(format!(
                "{} is not a string but {}",
                self.session_id_field,
                json_type(other)
            ))),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
