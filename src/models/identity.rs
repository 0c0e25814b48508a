//! Normalized identity record produced from a create-session response

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::SessionId;

/// Strict identity record built by [`crate::identity::IdentityResponseParser`]
///
/// `account_id`, `person_id`, `inbox_id` and `roles` are always populated;
/// partial payloads are rejected during parsing rather than defaulted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedIdentity {
    #[serde(skip_serializing)]
    pub session_id: SessionId,
    pub display_name: Option<String>,
    pub avatar_url: String,
    pub account_id: String,
    pub external_account_id: Option<String>,
    pub person_id: String,
    pub roles: Vec<String>,
    pub inbox_id: String,
    pub is_workspace_admin: bool,
    pub is_appliance_manager: bool,
    pub identification_claims: HashMap<String, String>,
    pub extras: HashMap<String, Value>,
}

impl AuthenticatedIdentity {
    /// Email claim, when one was supplied at parse time
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.identification_claims.get("email").map(String::as_str)
    }

    #[must_use]
    pub fn has_role(&self, role_id: &str) -> bool {
        self.roles.iter().any(|role| role == role_id)
    }
}
