//! Create-session response parsing
//!
//! The response is loosely typed JSON produced by several callers. Top-level
//! keys and account keys are checked up front and every missing key is
//! reported in one error. Account fields are then read by fixed paths and must
//! have the expected JSON type; only the avatar URL is soft-defaulted.

use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

use crate::errors::{AuthnError, Result};
use crate::models::{AuthenticatedIdentity, SessionId};

/// Keys every create-session response must carry
pub const REQUIRED_RESPONSE_KEYS: [&str; 3] = ["clientSessionId", "person", "account"];
/// Keys the `account` object must carry
pub const REQUIRED_ACCOUNT_KEYS: [&str; 4] = ["personId", "localId", "roles", "inboxId"];

const EMAIL_CLAIM: &str = "email";
const AUTH_EXTRA: &str = "auth";

/// Stateless parser for create-session responses
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResponseParser;

impl IdentityResponseParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a JSON document holding a create-session response
    ///
    /// # Errors
    ///
    /// Returns `AuthnError::Validation` if `raw` is not JSON or fails
    /// [`IdentityResponseParser::parse`]
    pub fn parse_str(&self, raw: &str, email: &str, extra: Value) -> Result<AuthenticatedIdentity> {
        let response: Value = serde_json::from_str(raw).map_err(|e| {
            AuthnError::Validation(format!("Create client session response is not JSON: {e}"))
        })?;
        self.parse(&response, email, extra)
    }

    /// Build an identity from a create-session response
    ///
    /// `email` becomes the `email` identification claim and `extra` is kept
    /// under the `auth` key of the identity's extras.
    ///
    /// # Errors
    ///
    /// Returns `AuthnError::Validation` if the response or its `account` object
    /// is missing, empty, lacks required keys (all missing keys are named), or
    /// holds a value of the wrong type
    pub fn parse(
        &self,
        response: &Value,
        email: &str,
        extra: Value,
    ) -> Result<AuthenticatedIdentity> {
        let response = validate_response(response)?;
        let account = validate_account(response.get("account"))?;

        let session_id = required_str(response, "clientSessionId", "clientSessionId")?;
        let external_account_id = optional_str(response, "kristaAccountId", "kristaAccountId")?;
        let display_name = optional_str(account, "name", "account.name")?;

        let identity = AuthenticatedIdentity {
            session_id: SessionId::new(session_id),
            display_name,
            avatar_url: avatar_url(response.get("person")),
            account_id: nested_id(account, "localId")?,
            external_account_id,
            person_id: nested_id(account, "personId")?,
            roles: role_ids(account)?,
            inbox_id: nested_id(account, "inboxId")?,
            is_workspace_admin: required_bool(account, "isWorkspaceAdmin")?,
            is_appliance_manager: required_bool(account, "isApplianceManager")?,
            identification_claims: HashMap::from([(EMAIL_CLAIM.to_string(), email.to_string())]),
            extras: HashMap::from([(AUTH_EXTRA.to_string(), extra)]),
        };

        log::debug!(
            "Parsed identity for account {} with {} role(s), session {}",
            identity.account_id,
            identity.roles.len(),
            identity.session_id.fingerprint()
        );
        Ok(identity)
    }
}

fn validate_response(response: &Value) -> Result<&Map<String, Value>> {
    let response = match response {
        Value::Null => {
            return Err(AuthnError::Validation(
                "Create client session response is null.".to_string(),
            ))
        }
        Value::Object(map) => map,
        _ => {
            return Err(AuthnError::Validation(
                "Create client session response is not an object.".to_string(),
            ))
        }
    };

    let missing = missing_keys(response, &REQUIRED_RESPONSE_KEYS);
    if !missing.is_empty() {
        return Err(AuthnError::Validation(format!(
            "Missing required keys from create session response. [{}]",
            missing.join(", ")
        )));
    }
    Ok(response)
}

fn validate_account(account: Option<&Value>) -> Result<&Map<String, Value>> {
    let account = match account {
        Some(Value::Object(map)) if !map.is_empty() => map,
        _ => {
            return Err(AuthnError::Validation(
                "Account information is empty.".to_string(),
            ))
        }
    };

    let missing = missing_keys(account, &REQUIRED_ACCOUNT_KEYS);
    if !missing.is_empty() {
        return Err(AuthnError::Validation(format!(
            "Account information missing data for few properties. [{}]",
            missing.join(", ")
        )));
    }
    Ok(account)
}

// Sorted so the error message is deterministic
fn missing_keys<'a>(map: &Map<String, Value>, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|key| !map.contains_key(*key))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn wrong_type(path: &str, expected: &str) -> AuthnError {
    AuthnError::Validation(format!("{path} must be {expected}"))
}

fn required_str(map: &Map<String, Value>, key: &str, path: &str) -> Result<String> {
    match map.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        _ => Err(wrong_type(path, "a string")),
    }
}

fn optional_str(map: &Map<String, Value>, key: &str, path: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(wrong_type(path, "a string")),
    }
}

fn required_bool(account: &Map<String, Value>, key: &str) -> Result<bool> {
    account
        .get(key)
        .and_then(Value::as_bool)
        .ok_or_else(|| wrong_type(&format!("account.{key}"), "a boolean"))
}

/// `account.<key>.id`
fn nested_id(account: &Map<String, Value>, key: &str) -> Result<String> {
    match account.get(key) {
        Some(Value::Object(inner)) => required_str(inner, "id", &format!("account.{key}.id")),
        _ => Err(wrong_type(&format!("account.{key}"), "an object")),
    }
}

fn role_ids(account: &Map<String, Value>) -> Result<Vec<String>> {
    let Some(Value::Array(roles)) = account.get("roles") else {
        return Err(wrong_type("account.roles", "an array"));
    };

    roles
        .iter()
        .enumerate()
        .map(|(index, role)| {
            let path = format!("account.roles[{index}].id");
            match role {
                Value::Object(role) => required_str(role, "id", &path),
                _ => Err(wrong_type(&format!("account.roles[{index}]"), "an object")),
            }
        })
        .collect()
}

fn avatar_url(person: Option<&Value>) -> String {
    person
        .and_then(|person| person.get("icon"))
        .and_then(|icon| icon.get("uri"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
