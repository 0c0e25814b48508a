//! Workspace authorization policy checks
//!
//! Domain eligibility and auto-provisioning rules used by the login flow and
//! by the external account provisioning collaborator.

use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::authentication::AccountDirectory;
use crate::errors::{AuthnError, Result};
use crate::validation::{
    is_email_domain_present_in_supported_workspace_domains, is_valid_email_address,
    validate_domains,
};

fn invalid_email(email: &str) -> AuthnError {
    AuthnError::Validation(format!("Not valid email address: {email}"))
}

fn domain_of(email: &str) -> &str {
    email.split_once('@').map_or(email, |(_, domain)| domain)
}

/// Check that the email's domain is allowed by the workspace or the extension
///
/// # Errors
///
/// - `AuthnError::Validation` if `email` is not a valid address
/// - `AuthnError::Policy` naming the domain when neither allow-list permits it
pub fn validate_supported_domain(
    email: &str,
    workspace_allow_list: &str,
    extension_allow_list: &str,
) -> Result<()> {
    if !is_valid_email_address(email) {
        return Err(invalid_email(email));
    }

    let from_extension =
        is_email_domain_present_in_supported_workspace_domains(email, extension_allow_list);
    let from_workspace =
        is_email_domain_present_in_supported_workspace_domains(email, workspace_allow_list);

    if from_extension || from_workspace {
        return Ok(());
    }

    let domain = domain_of(email.trim());
    log::info!("Rejected sign-in for unsupported domain {domain}");
    Err(AuthnError::Policy(format!(
        "Domain {domain} is not supported."
    )))
}

/// Check whether a previously unseen email may sign in to the workspace
///
/// With auto-creation enabled any valid email passes. Otherwise the domain must
/// be supported and the directory must already hold an account for the email.
///
/// # Errors
///
/// - `AuthnError::Configuration` if `workspace_id` is blank
/// - `AuthnError::Validation` if `email` is not a valid address
/// - `AuthnError::Policy` if auto-creation is disabled and either check fails
pub fn validate_auto_provisioning(
    workspace_id: &str,
    email: &str,
    auto_create_enabled: bool,
    supported_domain: &str,
    account_directory: &dyn AccountDirectory,
) -> Result<()> {
    if workspace_id.trim().is_empty() {
        return Err(AuthnError::Configuration(
            "WorkspaceId not found.".to_string(),
        ));
    }
    if !is_valid_email_address(email) {
        return Err(invalid_email(email));
    }
    if auto_create_enabled {
        return Ok(());
    }

    if !is_email_domain_present_in_supported_workspace_domains(email, supported_domain) {
        return Err(AuthnError::Policy(format!(
            "ALLOW_AUTO_PERSON_CREATION is not enabled and domain for email {email} is not supported in workspace."
        )));
    }

    if account_directory.lookup_account(email).is_none() {
        return Err(AuthnError::Policy(format!(
            "ALLOW_AUTO_PERSON_CREATION is not enabled. Can't add new user with email :{email}"
        )));
    }

    Ok(())
}

/// Validate the configuration attributes an authenticator is started with
///
/// Every name in `required` must map to a non-null, non-empty value, and
/// `supported_domains` must be a valid domain allow-list string.
///
/// # Errors
///
/// - `AuthnError::Validation` for empty inputs or missing attributes; all
///   missing names are reported together
/// - `AuthnError::Configuration` if `supported_domains` is not a string or is
///   not a valid allow-list
pub fn validate_input_params(
    attributes: &HashMap<String, Value>,
    required: &[&str],
    supported_domains: Option<&Value>,
) -> Result<()> {
    if attributes.is_empty() {
        return Err(AuthnError::Validation(
            "Invoker attributes are not found.".to_string(),
        ));
    }
    if required.is_empty() {
        return Err(AuthnError::Validation(
            "Required inputs are not found.".to_string(),
        ));
    }

    let missing: BTreeSet<&str> = required
        .iter()
        .copied()
        .filter(|name| match attributes.get(*name) {
            None | Some(Value::Null) => true,
            Some(Value::String(value)) => value.is_empty(),
            Some(_) => false,
        })
        .collect();

    if !missing.is_empty() {
        let names: Vec<&str> = missing.into_iter().collect();
        return Err(AuthnError::Validation(format!(
            "Missing required invoker params :[{}]",
            names.join(", ")
        )));
    }

    match supported_domains {
        Some(Value::String(domains)) => validate_domains(domains.as_str()),
        None | Some(Value::Null) => validate_domains(None),
        Some(other) => Err(AuthnError::Configuration(format!(
            "Input is not string type:{other}"
        ))),
    }
}

/// Domain of `email` when the workspace does not list it yet
///
/// Returns `None` for addresses without a domain part or whose domain is
/// already present in `workspace_domains`.
#[must_use]
pub fn domain_to_register(email: &str, workspace_domains: &[String]) -> Option<String> {
    let (_, domain) = email.split_once('@')?;
    if domain.is_empty() || workspace_domains.iter().any(|known| known == domain) {
        return None;
    }
    Some(domain.to_string())
}
