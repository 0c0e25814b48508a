//! Long-lived credential material persisted per account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access/refresh token pair with expiry instants in epoch milliseconds
///
/// The field order of this struct is the on-disk field order of a credential
/// file and must not change without a format version bump.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub account_id: String,
    pub invoker_id: String,
    pub refresh_token: String,
    pub access_token: String,
    pub refresh_token_expiry_epoch_ms: i64,
    pub access_token_expiry_epoch_ms: i64,
}

impl TokenRecord {
    /// Number of fields in a persisted record
    pub const FIELD_COUNT: usize = 6;

    #[must_use]
    pub fn access_token_expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.access_token_expiry_epoch_ms)
    }

    #[must_use]
    pub fn refresh_token_expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.refresh_token_expiry_epoch_ms)
    }

    /// Whether the access token is expired at `now`. Unrepresentable expiry
    /// instants count as expired.
    #[must_use]
    pub fn access_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        !matches!(self.access_token_expires_at(), Some(expires_at) if expires_at > now)
    }

    #[must_use]
    pub fn refresh_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        !matches!(self.refresh_token_expires_at(), Some(expires_at) if expires_at > now)
    }
}

// Token values stay out of Debug output
impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("account_id", &self.account_id)
            .field("invoker_id", &self.invoker_id)
            .field("refresh_token", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token_expiry_epoch_ms",
                &self.refresh_token_expiry_epoch_ms,
            )
            .field(
                "access_token_expiry_epoch_ms",
                &self.access_token_expiry_epoch_ms,
            )
            .finish()
    }
}
