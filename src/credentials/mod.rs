//! File-backed persistence of per-account token records

pub mod store;

pub use store::{CredentialStore, DEFAULT_TOKENS_DIR};
