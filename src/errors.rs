//! Error taxonomy for session and identity resolution
//!
//! Every failure in this crate is scoped to a single request or a single
//! credential-store operation. Callers map errors to HTTP statuses through
//! [`AuthnError::status_code`]; the actix [`ResponseError`] implementation does
//! this for handlers and never exposes more than one human-readable message plus
//! an opaque error code.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Prefix used for the opaque error codes returned to clients
pub const ERROR_SOURCE: &str = "krista-authn";

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AuthnError>;

/// Errors produced by the authentication core
#[derive(Debug, thiserror::Error)]
pub enum AuthnError {
    /// Malformed input data (email, domain, session payload shape)
    #[error("{0}")]
    Validation(String),

    /// Bad policy configuration, e.g. a malformed domain allow-list
    #[error("{0}")]
    Configuration(String),

    /// Well-formed input rejected by a business rule
    #[error("{0}")]
    Policy(String),

    /// Malformed cookie or body while extracting a session id.
    /// The resolver treats this as "no session".
    #[error("Failed to extract session id: {0}")]
    Extraction(String),

    /// Credential file missing, unreadable or corrupt
    #[error("{message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),
}

impl AuthnError {
    /// Create a storage error without an underlying cause
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error wrapping the underlying cause
    pub fn storage_caused_by<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// HTTP status a caller should answer with for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Policy(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Configuration(_) | Self::Extraction(_) | Self::Storage { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Opaque error code, e.g. `krista-authn-400`
    #[must_use]
    pub fn error_code(&self) -> String {
        format!("{ERROR_SOURCE}-{}", self.status_code().as_u16())
    }
}

/// JSON body returned for failed requests
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_message: String,
    pub error_code: String,
}

impl ResponseError for AuthnError {
    fn status_code(&self) -> StatusCode {
        AuthnError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        log::warn!("Request failed: {self}");

        if let Self::NotFound(_) = self {
            return HttpResponse::NotFound().body("Page not found.");
        }

        let message = match self {
            // Internal causes stay in the logs
            Self::Storage { .. } | Self::Extraction(_) => "Authentication failure".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(AuthnError::status_code(self)).json(ErrorBody {
            error_message: message,
            error_code: self.error_code(),
        })
    }
}
