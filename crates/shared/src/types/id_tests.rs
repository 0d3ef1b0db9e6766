use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_creation() {
    let id = SyncConfigId::new();
    assert!(!id.to_string().is_empty());
}

#[test]
fn test_typed_id_is_unique() {
    assert_ne!(SyncConfigId::new(), SyncConfigId::new());
}

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = SyncConfigId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_display_round_trip() {
    let uuid = Uuid::new_v4();
    let id = SyncConfigId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(format!("{id}"), uuid.to_string());
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(SyncConfigId::from_str("sync_123_abc").is_err());
}

#[test]
fn test_provider_parse() {
    assert_eq!(CloudProvider::parse("google"), Some(CloudProvider::Google));
    assert_eq!(CloudProvider::parse("Microsoft"), Some(CloudProvider::Microsoft));
    assert_eq!(CloudProvider::parse("dropbox"), None);
    assert_eq!(CloudProvider::parse(""), None);
}

#[test]
fn test_provider_serde_lowercase() {
    let json = serde_json::to_string(&CloudProvider::Microsoft).unwrap();
    assert_eq!(json, "\"microsoft\"");
    let parsed: CloudProvider = serde_json::from_str("\"google\"").unwrap();
    assert_eq!(parsed, CloudProvider::Google);
}
