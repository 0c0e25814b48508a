//! Session Resolution Module
//!
//! # Modules
//!
//! - [`request`] - Abstract inbound request and its actix/owned implementations
//! - [`cookie`] - Cookie header parsing and the login session cookie
//! - [`extractor`] - Session id extraction from cookie, query and body
//! - [`resolver`] - Lookup, login-path fallback, redirects and login submission

pub mod cookie;
pub mod extractor;
pub mod request;
pub mod resolver;

pub use cookie::{
    decode_session_id, encode_session_id, parse_cookie_header, session_set_cookie,
    CONTEXT_COOKIE, SESSION_ID_COOKIE,
};
pub use extractor::SessionTokenExtractor;
pub use request::{ActixInboundRequest, InboundRequest, RawRequest};
pub use resolver::{LoginOutcome, SessionResolver, DEFAULT_LOGIN_PATH, ORIGINAL_URL_HEADER};
