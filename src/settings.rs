use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::credentials::DEFAULT_TOKENS_DIR;
use crate::errors::{AuthnError, Result as AuthnResult};
use crate::session::{CONTEXT_COOKIE, DEFAULT_LOGIN_PATH, ORIGINAL_URL_HEADER, SESSION_ID_COOKIE};
use crate::validation::{validate_domains, ALL_DOMAINS};

/// Directory searched for a `Settings.toml` that overrides the working directory one
pub const SECRETS_DIR_ENV: &str = "AUTHN_SECRETS_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthnSettings {
    pub application: ApplicationSettings,
    pub routing: RoutingSettings,
    pub session: SessionSettings,
    pub credentials: CredentialSettings,
    pub policy: PolicySettings,
    pub logging: LoggingSettings,
    /// Session id to account id bindings seeding the in-memory session store
    pub sessions: HashMap<String, String>,
    /// Emails seeding the in-memory account directory
    pub accounts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// Externally visible base URL of the appliance serving the sign-in page
    pub appliance_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub login_path: String,
    pub context_cookie: String,
    pub session_id_field: String,
    pub original_url_header: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialSettings {
    pub tokens_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    /// Workspace domain allow-list, `All` for unrestricted
    pub supported_domains: String,
    /// Additional domains allowed by the extension, may be empty
    pub extension_domains: String,
    pub allow_auto_person_creation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            appliance_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            context_cookie: CONTEXT_COOKIE.to_string(),
            session_id_field: SESSION_ID_COOKIE.to_string(),
            original_url_header: ORIGINAL_URL_HEADER.to_string(),
        }
    }
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            tokens_dir: DEFAULT_TOKENS_DIR.to_string(),
        }
    }
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            supported_domains: ALL_DOMAINS.to_string(),
            extension_domains: String::new(),
            allow_auto_person_creation: false,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AuthnSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// Initializes the logger with `logging.level` as the default filter.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    /// - The logger was already initialized
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(settings.logging.level.as_str()),
        )
        .try_init()?;

        Ok(settings)
    }

    /// Parse settings from TOML text; missing sections take their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for these settings
    pub fn from_toml_str(content: &str) -> Result<Self, basic_toml::Error> {
        basic_toml::from_str(content)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `AUTHN_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        if let Some(found) = Self::load_file(Path::new("Settings.toml"))? {
            println!("✓ Loaded base settings from Settings.toml");
            settings = found;
        }

        if let Ok(secrets_dir) = std::env::var(SECRETS_DIR_ENV) {
            let secrets_path = Path::new(&secrets_dir).join("Settings.toml");
            match Self::load_file(&secrets_path)? {
                Some(found) => {
                    println!("✓ Overriding settings from {}", secrets_path.display());
                    settings = found;
                }
                None => println!(
                    "ℹ {SECRETS_DIR_ENV} set but no Settings.toml found at: {}",
                    secrets_path.display()
                ),
            }
        }

        Ok(settings)
    }

    fn load_file(path: &Path) -> Result<Option<Self>, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(Self::from_toml_str(&content)?))
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        if let Ok(host) = std::env::var("HOST") {
            settings.application.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse::<u16>() {
                settings.application.port = port;
            }
        }
        if let Ok(base_url) = std::env::var("APPLIANCE_BASE_URL") {
            settings.routing.appliance_base_url = base_url;
        }
        if let Ok(login_path) = std::env::var("LOGIN_PATH") {
            settings.session.login_path = login_path;
        }
        if let Ok(tokens_dir) = std::env::var("TOKENS_DIR") {
            settings.credentials.tokens_dir = tokens_dir;
        }
        Self::apply_policy_env_overrides(&mut settings.policy);
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            settings.logging.level = log_level;
        }
    }

    fn apply_policy_env_overrides(policy: &mut PolicySettings) {
        if let Ok(domains) = std::env::var("SUPPORTED_DOMAINS") {
            policy.supported_domains = domains;
        }
        if let Ok(domains) = std::env::var("EXTENSION_DOMAINS") {
            policy.extension_domains = domains;
        }
        if let Ok(flag) = std::env::var("ALLOW_AUTO_PERSON_CREATION") {
            if let Ok(flag) = flag.trim().parse::<bool>() {
                policy.allow_auto_person_creation = flag;
            }
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Check the policy and routing configuration
    ///
    /// # Errors
    ///
    /// Returns `AuthnError::Configuration` if a domain allow-list is malformed
    /// or the login path is not absolute
    pub fn validate(&self) -> AuthnResult<()> {
        validate_domains(self.policy.supported_domains.as_str())?;
        if !self.policy.extension_domains.trim().is_empty() {
            validate_domains(self.policy.extension_domains.as_str())?;
        }
        if !self.session.login_path.starts_with('/') {
            return Err(AuthnError::Configuration(format!(
                "Login path must start with '/': {}",
                self.session.login_path
            )));
        }
        Ok(())
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}
