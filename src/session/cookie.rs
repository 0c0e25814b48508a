use actix_web::cookie::Cookie;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;

use crate::errors::{AuthnError, Result};
use crate::models::SessionId;

/// Cookie carrying the URL-encoded JSON request context
pub const CONTEXT_COOKIE: &str = "X-Krista-Context";
/// Session id field inside the request context, and name of the login cookie
pub const SESSION_ID_COOKIE: &str = "clientSessionId";

/// Split a `Cookie` request header into name/value pairs
///
/// Values are returned exactly as sent, still percent-encoded. A later pair
/// with the same name replaces an earlier one.
///
/// # Errors
///
/// Returns `AuthnError::Extraction` if any pair is not a valid cookie
pub fn parse_cookie_header(header: &str) -> Result<HashMap<String, String>> {
    let mut cookies = HashMap::new();
    for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let cookie = Cookie::parse(pair)
            .map_err(|e| AuthnError::Extraction(format!("malformed cookie header: {e}")))?;
        cookies.insert(cookie.name().to_string(), cookie.value().to_string());
    }
    Ok(cookies)
}

#[must_use]
pub fn encode_session_id(session_id: &SessionId) -> String {
    STANDARD.encode(session_id.as_str())
}

/// Reverse of [`encode_session_id`]
///
/// # Errors
///
/// Returns `AuthnError::Extraction` if the value is not Base64 of UTF-8 text
pub fn decode_session_id(encoded: &str) -> Result<SessionId> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AuthnError::Extraction(format!("session cookie is not base64: {e}")))?;
    let value = String::from_utf8(bytes)
        .map_err(|_| AuthnError::Extraction("session cookie is not UTF-8".to_string()))?;
    Ok(SessionId::new(value))
}

/// `Set-Cookie` value issued after a successful login submission
///
/// The attribute layout is fixed by the login contract:
/// `clientSessionId=<base64>;HttpOnly;path=/` plus `;SameSite=None;Secure`
/// when the client talks to us over https.
#[must_use]
pub fn session_set_cookie(session_id: &SessionId, secure: bool) -> String {
    let mut value = format!(
        "{SESSION_ID_COOKIE}={};HttpOnly;path=/",
        encode_session_id(session_id)
    );
    if secure {
        value.push_str(";SameSite=None;Secure");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::SameSite;

    #[test]
    fn test_parse_cookie_header() {
        let cookies =
            parse_cookie_header("theme=dark; X-Krista-Context=%7B%22a%22%3A1%7D;other=1").unwrap();
        assert_eq!(cookies.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(
            cookies.get(CONTEXT_COOKIE).map(String::as_str),
            Some("%7B%22a%22%3A1%7D")
        );
        assert_eq!(cookies.len(), 3);
    }

    #[test]
    fn test_parse_cookie_header_rejects_garbage() {
        assert!(matches!(
            parse_cookie_header("no-equals-sign"),
            Err(AuthnError::Extraction(_))
        ));
        assert!(parse_cookie_header("  ;  ").unwrap().is_empty());
    }

    #[test]
    fn test_session_id_base64_round_trip() {
        for raw in ["s1", "", "ünïcode-id", "a/b+c=="] {
            let id = SessionId::new(raw);
            assert_eq!(decode_session_id(&encode_session_id(&id)).unwrap(), id);
        }
        assert_eq!(encode_session_id(&SessionId::new("s1")), "czE=");
    }

    #[test]
    fn test_decode_rejects_invalid_input() {
        assert!(decode_session_id("%%%").is_err());
        // 0xff 0xfe is not UTF-8
        assert!(decode_session_id("//4=").is_err());
    }

    #[test]
    fn test_set_cookie_layout() {
        let id = SessionId::new("s1");
        assert_eq!(
            session_set_cookie(&id, false),
            "clientSessionId=czE=;HttpOnly;path=/"
        );
        assert_eq!(
            session_set_cookie(&id, true),
            "clientSessionId=czE=;HttpOnly;path=/;SameSite=None;Secure"
        );
    }

    #[test]
    fn test_set_cookie_is_parseable() {
        let value = session_set_cookie(&SessionId::new("s1"), true);
        let cookie = Cookie::parse(value).unwrap();
        assert_eq!(cookie.name(), SESSION_ID_COOKIE);
        assert_eq!(cookie.value(), "czE=");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
    }
}
