use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_creation_is_v7() {
    let id = UserId::new();
    assert_eq!(id.into_inner().get_version_num(), 7);
}

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = BalanceGroupId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
    assert_eq!(Uuid::from(id), uuid);
}

#[test]
fn test_typed_id_display() {
    let uuid = Uuid::new_v4();
    let id = ExpenseId::from(uuid);
    assert_eq!(format!("{id}"), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = UserId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
    assert!(UserId::from_str("invalid").is_err());
}

#[test]
fn test_typed_id_serializes_as_plain_uuid() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&UserId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));

    let back: UserId = serde_json::from_str(&json).unwrap();
    assert_eq!(back.into_inner(), uuid);
}
