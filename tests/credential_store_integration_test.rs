// Credential files on disk through the public API
use krista_authn::{AuthnError, CredentialStore, TokenRecord};
use tempfile::tempdir;

fn record() -> TokenRecord {
    TokenRecord {
        account_id: "acct-42".to_string(),
        invoker_id: "invoker-1".to_string(),
        refresh_token: "refresh-token".to_string(),
        access_token: "access-token".to_string(),
        refresh_token_expiry_epoch_ms: 1_900_000_000_000,
        access_token_expiry_epoch_ms: 1_700_000_000_000,
    }
}

#[test]
fn test_save_load_delete_cycle() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("nested").join("tokens"));

    store.save("acct-42", &record()).unwrap();
    assert_eq!(store.load("acct-42").unwrap(), record());

    store.delete("acct-42").unwrap();
    assert!(matches!(
        store.load("acct-42"),
        Err(AuthnError::Storage { .. })
    ));
    store.delete("acct-42").unwrap();
}

#[test]
fn test_missing_record_is_storage_error() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(dir.path());
    let err = store.load("unknown").unwrap_err();
    assert!(matches!(err, AuthnError::Storage { .. }));
    assert_eq!(err.status_code().as_u16(), 500);
}

#[test]
fn test_expiry_helpers_on_loaded_record() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(dir.path());
    store.save("acct-42", &record()).unwrap();

    let loaded = store.load("acct-42").unwrap();
    let now = chrono::DateTime::from_timestamp_millis(1_800_000_000_000).unwrap();
    assert!(loaded.access_token_expired_at(now));
    assert!(!loaded.refresh_token_expired_at(now));
}
