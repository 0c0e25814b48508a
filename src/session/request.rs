//! Abstract view of an inbound HTTP request
//!
//! Session extraction only needs header lookup, the query string, the method,
//! the path and the body. [`ActixInboundRequest`] adapts an actix request with
//! an already buffered payload; [`RawRequest`] is an owned request for tests
//! and non-actix hosts.

use actix_web::web::Bytes;
use actix_web::HttpRequest;
use std::borrow::Cow;
use std::io;

/// Request surface consumed by the session extractor and resolver
pub trait InboundRequest {
    /// First value of header `name` (case-insensitive), if present and valid UTF-8
    fn header(&self, name: &str) -> Option<&str>;

    /// Raw, still URL-encoded query string without the leading `?`
    fn query_string(&self) -> &str;

    /// Upper-case HTTP method name
    fn method(&self) -> &str;

    fn path(&self) -> &str;

    /// Full request body
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the body could not be read
    fn body(&self) -> io::Result<Cow<'_, [u8]>>;

    /// Every decoded value of query parameter `name`, in order of appearance
    fn query_values(&self, name: &str) -> Vec<String> {
        url::form_urlencoded::parse(self.query_string().as_bytes())
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .collect()
    }

    /// Path plus query string, as the client requested it
    fn path_and_query(&self) -> String {
        let query = self.query_string();
        if query.is_empty() {
            self.path().to_string()
        } else {
            format!("{}?{}", self.path(), query)
        }
    }
}

/// Adapter over an actix request and its buffered payload
pub struct ActixInboundRequest<'a> {
    request: &'a HttpRequest,
    body: &'a [u8],
}

impl<'a> ActixInboundRequest<'a> {
    #[must_use]
    pub fn new(request: &'a HttpRequest, body: &'a Bytes) -> Self {
        Self {
            request,
            body: body.as_ref(),
        }
    }

    /// Adapter for handlers that never read the body
    #[must_use]
    pub fn without_body(request: &'a HttpRequest) -> Self {
        Self { request, body: &[] }
    }
}

impl InboundRequest for ActixInboundRequest<'_> {
    fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    fn query_string(&self) -> &str {
        self.request.query_string()
    }

    fn method(&self) -> &str {
        self.request.method().as_str()
    }

    fn path(&self) -> &str {
        self.request.path()
    }

    fn body(&self) -> io::Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.body))
    }
}

/// Owned request with no transport attached
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// When set, reading the body fails with this message
    pub body_error: Option<String>,
}

impl RawRequest {
    /// Request for `method` on a target such as `/login?x=1`
    #[must_use]
    pub fn new(method: &str, target: &str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            query: query.to_string(),
            ..Self::default()
        }
    }
}

impl InboundRequest for RawRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn query_string(&self) -> &str {
        &self.query
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn body(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.body_error {
            Some(message) => Err(io::Error::other(message.clone())),
            None => Ok(Cow::Borrowed(&self.body)),
        }
    }
}
