//! Domain names and workspace domain allow-lists
//!
//! An allow-list is a comma-delimited list of domains, or the sentinel `All`
//! meaning unrestricted. It is parsed on every call and never cached here.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AuthnError, Result};

/// Sentinel allow-list value meaning "every domain"
pub const ALL_DOMAINS: &str = "All";

// Labels of 1-63 alphanumerics/hyphens without a leading or trailing hyphen,
// final label of 2-6 letters
static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,6}$").unwrap()
});

/// Whether `name` is a syntactically valid domain name
#[must_use]
pub fn is_valid_domain(name: &str) -> bool {
    !name.is_empty() && DOMAIN_PATTERN.is_match(name)
}

/// Parsed workspace domain allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainPolicy {
    /// Empty list or the `All` sentinel
    Unrestricted,
    /// Lower-cased, trimmed allow-list entries
    AllowList(Vec<String>),
}

impl DomainPolicy {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_DOMAINS) {
            return Self::Unrestricted;
        }

        let entries = value
            .split(',')
            .map(|entry| entry.trim().to_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self::AllowList(entries)
    }

    /// Whether the domain part of `email` is permitted.
    ///
    /// Blank emails and emails without a domain part are never permitted.
    /// Allow-list membership is a substring
    /// test: an entry permits any email domain it contains, so the entry
    /// `"notexample.com"` permits `"example.com"`.
    #[must_use]
    pub fn permits(&self, email: &str) -> bool {
        if email.trim().is_empty() {
            return false;
        }

        match self {
            Self::Unrestricted => true,
            Self::AllowList(entries) => {
                let Some(domain) = email.split('@').nth(1) else {
                    return false;
                };
                let domain = domain.trim().to_lowercase();
                if domain.is_empty() {
                    return false;
                }
                entries.iter().any(|entry| entry.contains(domain.as_str()))
            }
        }
    }
}

/// Whether the email's domain is permitted by a workspace allow-list
///
/// The `All` sentinel permits every email string, blank ones included. Otherwise
/// blank emails are rejected and an empty allow-list permits everything else.
#[must_use]
pub fn is_email_domain_present_in_supported_workspace_domains(
    email: &str,
    allow_list: &str,
) -> bool {
    if allow_list.eq_ignore_ascii_case(ALL_DOMAINS) {
        return true;
    }
    DomainPolicy::parse(allow_list).permits(email)
}

/// Validate a domain allow-list configuration value
///
/// # Errors
///
/// Returns `AuthnError::Configuration` unless the value is a non-empty string
/// whose comma-separated, trimmed entries are each `all` (any case) or a valid
/// domain name.
pub fn validate_domains<'a>(policy_value: impl Into<Option<&'a str>>) -> Result<()> {
    let Some(value) = policy_value.into() else {
        return Err(AuthnError::Configuration(
            "Supported domains list is missing.".to_string(),
        ));
    };
    if value.is_empty() {
        return Err(AuthnError::Configuration(
            "Supported domains list is empty.".to_string(),
        ));
    }

    // Trailing empty entries are ignored, as in "example.com,"
    let entries: Vec<&str> = value.trim_end_matches(',').split(',').collect();
    if entries.iter().all(|entry| entry.trim().is_empty()) {
        return Err(AuthnError::Configuration(
            "Supported domains list is empty.".to_string(),
        ));
    }

    for domain in entries {
        let trimmed = domain.trim();
        if !trimmed.eq_ignore_ascii_case("all") && !is_valid_domain(trimmed) {
            return Err(AuthnError::Configuration(format!(
                "Invalid domain name:{domain}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_domain() {
        assert!(is_valid_domain("kristasoft.com"));
        assert!(is_valid_domain("mail.example.co.uk"));
        assert!(is_valid_domain("a-b.example.io"));
        assert!(!is_valid_domain("dummy"));
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("-bad.com"));
        assert!(!is_valid_domain("bad-.com"));
        assert!(!is_valid_domain("example.c0m"));
        assert!(!is_valid_domain("example.toolong"));
        assert!(!is_valid_domain("gmail.com,kristasoft.com"));
    }

    #[test]
    fn test_label_length_limit() {
        let label_63 = "a".repeat(63);
        let label_64 = "a".repeat(64);
        assert!(is_valid_domain(&format!("{label_63}.com")));
        assert!(!is_valid_domain(&format!("{label_64}.com")));
    }

    #[test]
    fn test_email_domain_present() {
        assert!(is_email_domain_present_in_supported_workspace_domains(
            "abc@example.com",
            "example.com,kristasoft.com"
        ));
        assert!(!is_email_domain_present_in_supported_workspace_domains(
            "abc@wrong.com",
            "example.com"
        ));
        assert!(!is_email_domain_present_in_supported_workspace_domains(
            "", ""
        ));
        assert!(is_email_domain_present_in_supported_workspace_domains(
            "abc@anything.org",
            ""
        ));
    }

    #[test]
    fn test_all_sentinel_permits_everything() {
        for email in ["", "   ", "no-at-sign", "abc@example.com"] {
            assert!(is_email_domain_present_in_supported_workspace_domains(
                email, "All"
            ));
            assert!(is_email_domain_present_in_supported_workspace_domains(
                email, "aLL"
            ));
        }
    }

    #[test]
    fn test_allow_list_entry_is_the_haystack() {
        // Entry "notexample.com" contains the email domain "example.com"
        assert!(is_email_domain_present_in_supported_workspace_domains(
            "abc@example.com",
            "notexample.com"
        ));
        // The reverse direction does not match
        assert!(!is_email_domain_present_in_supported_workspace_domains(
            "abc@notexample.com",
            "example.com"
        ));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(DomainPolicy::parse(""), DomainPolicy::Unrestricted);
        assert_eq!(DomainPolicy::parse("ALL"), DomainPolicy::Unrestricted);
        assert_eq!(
            DomainPolicy::parse(" Example.com , kristasoft.com,"),
            DomainPolicy::AllowList(vec![
                "example.com".to_string(),
                "kristasoft.com".to_string()
            ])
        );
    }

    #[test]
    fn test_policy_rejects_email_without_domain() {
        let policy = DomainPolicy::parse("example.com");
        assert!(!policy.permits("no-at-sign"));
        assert!(policy.permits("ABC@EXAMPLE.COM"));
    }

    #[test]
    fn test_email_without_domain_part_is_not_permitted() {
        assert!(!is_email_domain_present_in_supported_workspace_domains(
            "abc@",
            "example.com"
        ));
        assert!(!is_email_domain_present_in_supported_workspace_domains(
            "@",
            "kristasoft.com"
        ));
        assert!(!is_email_domain_present_in_supported_workspace_domains(
            "abc@ ",
            "example.com,kristasoft.com"
        ));
        // Unrestricted lists still permit it
        assert!(is_email_domain_present_in_supported_workspace_domains("abc@", "All"));
        assert!(is_email_domain_present_in_supported_workspace_domains("abc@", ""));
    }

    #[test]
    fn test_validate_domains_ignores_trailing_commas() {
        assert!(validate_domains("example.com,").is_ok());
        assert!(validate_domains("example.com,kristasoft.com,,").is_ok());
        assert!(matches!(
            validate_domains("example.com,,kristasoft.com"),
            Err(AuthnError::Configuration(_))
        ));
        assert!(matches!(
            validate_domains("example.com, "),
            Err(AuthnError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_domains() {
        assert!(validate_domains("example.com,kristasoft.com").is_ok());
        assert!(validate_domains("All").is_ok());
        assert!(validate_domains(" all , example.com").is_ok());
        assert!(matches!(
            validate_domains(""),
            Err(AuthnError::Configuration(_))
        ));
        assert!(matches!(
            validate_domains(None),
            Err(AuthnError::Configuration(_))
        ));
        assert!(matches!(
            validate_domains("example.com,dummy"),
            Err(AuthnError::Configuration(_))
        ));
        assert!(matches!(
            validate_domains(","),
            Err(AuthnError::Configuration(_))
        ));
    }
}
