//! Unit tests for the balance group module.

use std::sync::Arc;

use kitty_shared::types::{BalanceGroupId, ExpenseId, UserId};
use rstest::rstest;
use rust_decimal_macros::dec;

use super::*;
use crate::auth::UserRole;
use crate::testing::{
    LogCapture, MockBalanceGroupRepository, MockExpenseRepository, MockUserRepository,
};

type TestService =
    BalanceGroupService<MockUserRepository, MockBalanceGroupRepository, MockExpenseRepository>;

struct Fixture {
    users: Arc<MockUserRepository>,
    groups: Arc<MockBalanceGroupRepository>,
    expenses: Arc<MockExpenseRepository>,
    service: TestService,
}

fn fixture() -> Fixture {
    let users = Arc::new(MockUserRepository::new());
    let groups = Arc::new(MockBalanceGroupRepository::new());
    let expenses = Arc::new(MockExpenseRepository::new());
    let service = BalanceGroupService::new(users.clone(), groups.clone(), expenses.clone());
    Fixture {
        users,
        groups,
        expenses,
        service,
    }
}

fn validation_message(err: BalanceGroupError) -> String {
    match err {
        BalanceGroupError::Validation(msg) => msg,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_group_without_members() {
    let f = fixture();
    let owner = f.users.add_user("u@b.com", UserRole::User);

    let saved = f
        .service
        .save(BalanceGroup::new("trip", vec![], owner))
        .await
        .unwrap();

    assert!(saved.id.is_some());
    assert_eq!(saved.owner_id, owner);
    assert!(saved.member_ids.is_empty());
    assert!(saved.updated_at.is_none());
}

#[tokio::test]
async fn test_valid_group_passes_validation() {
    let f = fixture();
    let owner = f.users.add_user("u@b.com", UserRole::User);
    let friend = f.users.add_user("f@b.com", UserRole::User);
    let other = f.groups.add_group("other", owner, vec![owner]);
    let expense = f.expenses.add_expense(other, owner, dec!(5));

    let mut group = BalanceGroup::new("trip", vec![owner, friend], owner);
    group.expense_ids = vec![expense];

    let validator = BalanceGroupValidator::new(f.users.clone(), f.groups.clone(), f.expenses.clone());
    assert!(validator.validate(&group).await.is_ok());
}

#[tokio::test]
async fn test_missing_owner_is_checked_first() {
    let f = fixture();

    let group = BalanceGroup::new("   ", vec![UserId::new()], UserId::new());
    let err = f.service.save(group).await.unwrap_err();

    assert_eq!(validation_message(err), "Balance group owner does not exist");
}

#[rstest]
#[case("")]
#[case(" ")]
#[case("\t \n")]
#[tokio::test]
async fn test_blank_name_rejected_before_members(#[case] name: &str) {
    let f = fixture();
    let owner = f.users.add_user("u@b.com", UserRole::User);

    let group = BalanceGroup::new(name, vec![UserId::new()], owner);
    let err = f.service.save(group).await.unwrap_err();

    assert_eq!(
        validation_message(err),
        "Balance group name cannot contain whitespace only"
    );
}

#[rstest]
#[case(1)]
#[case(3)]
#[tokio::test]
async fn test_missing_members_reported_once(#[case] missing: usize) {
    let f = fixture();
    let owner = f.users.add_user("u@b.com", UserRole::User);
    let mut members = vec![owner];
    members.extend((0..missing).map(|_| UserId::new()));

    let err = f
        .service
        .save(BalanceGroup::new("trip", members, owner))
        .await
        .unwrap_err();

    assert_eq!(
        validation_message(err),
        "Some of the members have not been found"
    );
    assert!(f.groups.get_all_where_user_is_group_member(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_expenses_rejected() {
    let f = fixture();
    let owner = f.users.add_user("u@b.com", UserRole::User);
    let mut group = BalanceGroup::new("trip", vec![owner], owner);
    group.expense_ids = vec![ExpenseId::new()];

    let err = f.service.save(group).await.unwrap_err();

    assert_eq!(
        validation_message(err),
        "Some of the expenses have not been found"
    );
}

#[tokio::test]
async fn test_update_validates_payload_before_existence() {
    let f = fixture();
    let owner = f.users.add_user("u@b.com", UserRole::User);

    let err = f
        .service
        .update(BalanceGroupId::new(), BalanceGroup::new(" ", vec![], owner))
        .await
        .unwrap_err();
    assert!(matches!(err, BalanceGroupError::Validation(_)));

    let missing = BalanceGroupId::new();
    let err = f
        .service
        .update(missing, BalanceGroup::new("trip", vec![], owner))
        .await
        .unwrap_err();
    assert!(matches!(err, BalanceGroupError::NotFound(id) if id == missing));
}

#[tokio::test]
async fn test_update_replaces_name_and_members() {
    let f = fixture();
    let owner = f.users.add_user("u@b.com", UserRole::User);
    let friend = f.users.add_user("f@b.com", UserRole::User);
    let id = f.groups.add_group("trip", owner, vec![owner]);

    let mut payload = BalanceGroup::new("holiday", vec![owner, friend], owner);
    payload.version = Some(0);
    let updated = f.service.update(id, payload).await.unwrap();

    assert_eq!(updated.name, "holiday");
    assert_eq!(updated.member_ids, vec![owner, friend]);
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.version, Some(1));
}

#[tokio::test]
async fn test_update_with_stale_version_conflicts() {
    let f = fixture();
    let owner = f.users.add_user("u@b.com", UserRole::User);
    let id = f.groups.add_group("trip", owner, vec![owner]);

    let mut first = BalanceGroup::new("one", vec![owner], owner);
    first.version = Some(0);
    f.service.update(id, first).await.unwrap();

    let mut second = BalanceGroup::new("two", vec![owner], owner);
    second.version = Some(0);
    let err = f.service.update(id, second).await.unwrap_err();

    assert!(matches!(
        err,
        BalanceGroupError::Repository(crate::RepositoryError::Conflict { .. })
    ));
    assert_eq!(f.groups.get(id).unwrap().name, "one");
}

#[tokio::test]
async fn test_delete_and_get_by_id() {
    let f = fixture();
    let owner = f.users.add_user("u@b.com", UserRole::User);
    let id = f.groups.add_group("trip", owner, vec![owner]);

    assert_eq!(f.service.get_by_id(id).await.unwrap().name, "trip");
    f.service.delete(id).await.unwrap();

    assert!(matches!(
        f.service.get_by_id(id).await,
        Err(BalanceGroupError::NotFound(_))
    ));
    assert!(matches!(
        f.service.delete(id).await,
        Err(BalanceGroupError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_get_all_where_user_is_group_member() {
    let f = fixture();
    let owner = f.users.add_user("u@b.com", UserRole::User);
    let friend = f.users.add_user("f@b.com", UserRole::User);
    f.groups.add_group("trip", owner, vec![owner, friend]);
    f.groups.add_group("solo", owner, vec![owner]);

    let groups = f
        .service
        .get_all_where_user_is_group_member(friend)
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "trip");

    assert_eq!(f.service.get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_membership_listing_requires_known_user() {
    let f = fixture();
    let unknown = UserId::new();

    let err = f
        .service
        .get_all_where_user_is_group_member(unknown)
        .await
        .unwrap_err();

    assert_eq!(
        validation_message(err),
        format!("User with id {unknown} does not exist")
    );
}

#[test]
fn test_membership_with_owner_keeps_owner_once() {
    let owner = UserId::new();
    let a = UserId::new();
    let b = UserId::new();

    assert_eq!(membership_with_owner(&[], owner), vec![owner]);
    assert_eq!(
        membership_with_owner(&[a, owner, b, a], owner),
        vec![owner, a, b]
    );
}

#[test]
fn test_group_errors_map_to_app_errors() {
    use kitty_shared::AppError;

    let err: AppError = BalanceGroupError::NotFound(BalanceGroupId::new()).into();
    assert_eq!(err.status_code(), 404);

    let err: AppError = BalanceGroupError::validation("bad").into();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_rejections_are_logged() {
    let f = fixture();
    let (logs, _guard) = LogCapture::install();

    let ghost = UserId::new();
    assert!(
        f.service
            .save(BalanceGroup::new("trip", vec![], ghost))
            .await
            .is_err()
    );
    let missing = BalanceGroupId::new();
    assert!(f.service.get_by_id(missing).await.is_err());

    let logged = logs.contents();
    assert!(logged.contains("Balance group owner not found"));
    assert!(logged.contains(&format!("owner_id={ghost}")));
    assert!(logged.contains(&format!("group_id={missing}")));
}
