//! One CSV record per file, fields in [`TokenRecord`] order:
//!
//! ```text
//! accountId,invokerId,refreshToken,accessToken,refreshExpiryMs,accessExpiryMs
//! ```
//!
//! Writers are not coordinated. Two concurrent `save` calls for the same name
//! leave whichever write finished last; callers that can race on a name must
//! serialize those writes themselves.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{AuthnError, Result};
use crate::models::TokenRecord;

/// Directory credential files live in unless configured otherwise
pub const DEFAULT_TOKENS_DIR: &str = "/opt/krista/tokens";

/// Reads and writes token records under one directory
#[derive(Debug, Clone)]
pub struct CredentialStore {
    directory: PathBuf,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOKENS_DIR)
    }
}

impl CredentialStore {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write `record` under `name`, replacing any previous record
    ///
    /// # Errors
    ///
    /// - `AuthnError::Validation` if `name` is not a plain file name
    /// - `AuthnError::Storage` if the directory or file cannot be written
    pub fn save(&self, name: &str, record: &TokenRecord) -> Result<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.directory).map_err(|e| {
            AuthnError::storage_caused_by("Failed to create credential directory.", e)
        })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(|e| AuthnError::storage_caused_by("Failed to write to csv.", e))?;
        let refresh_expiry = record.refresh_token_expiry_epoch_ms.to_string();
        let access_expiry = record.access_token_expiry_epoch_ms.to_string();
        writer
            .write_record([
                record.account_id.as_str(),
                record.invoker_id.as_str(),
                record.refresh_token.as_str(),
                record.access_token.as_str(),
                refresh_expiry.as_str(),
                access_expiry.as_str(),
            ])
            .map_err(|e| AuthnError::storage_caused_by("Failed to write to csv.", e))?;
        writer
            .flush()
            .map_err(|e| AuthnError::storage_caused_by("Failed to write to csv.", e))?;

        log::debug!("Saved credentials for {} to {}", record.account_id, path.display());
        Ok(())
    }

    /// Read the record stored under `name`
    ///
    /// # Errors
    ///
    /// - `AuthnError::Validation` if `name` is not a plain file name
    /// - `AuthnError::Storage` if the file is missing, unreadable or malformed,
    ///   has fewer than six fields, or an expiry is not an integer
    pub fn load(&self, name: &str) -> Result<TokenRecord> {
        let path = self.path_for(name)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| AuthnError::storage_caused_by("Failed to read from csv.", e))?;

        let mut row = csv::StringRecord::new();
        let found = reader
            .read_record(&mut row)
            .map_err(|e| AuthnError::storage_caused_by("Failed to read from csv.", e))?;
        if !found || row.len() < TokenRecord::FIELD_COUNT {
            return Err(AuthnError::storage("Invalid token information."));
        }

        Ok(TokenRecord {
            account_id: row[0].to_string(),
            invoker_id: row[1].to_string(),
            refresh_token: row[2].to_string(),
            access_token: row[3].to_string(),
            refresh_token_expiry_epoch_ms: parse_epoch_ms(&row[4])?,
            access_token_expiry_epoch_ms: parse_epoch_ms(&row[5])?,
        })
    }

    /// Remove the record stored under `name`; a missing record is not an error
    ///
    /// # Errors
    ///
    /// - `AuthnError::Validation` if `name` is not a plain file name
    /// - `AuthnError::Storage` if an existing file cannot be removed
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthnError::storage_caused_by(
                "Failed to delete credentials.",
                e,
            )),
        }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let invalid = name.trim().is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\']);
        if invalid {
            return Err(AuthnError::Validation(format!(
                "Invalid credential name: {name}"
            )));
        }
        Ok(self.directory.join(name))
    }
}

fn parse_epoch_ms(field: &str) -> Result<i64> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|e| AuthnError::storage_caused_by(format!("Invalid expiry value: {field}"), e))
}
