//! Balance group routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use kitty_core::access::CurrentUser;
use kitty_core::balance_group::BalanceGroup;
use kitty_shared::types::{BalanceGroupId, ExpenseId, UserId};

use crate::{
    AppState,
    error::ApiResult,
    middleware::{AuthUser, guard},
};

/// Creates the balance group routes (requires auth middleware to be applied externally).
pub fn routes(state: &AppState) -> Router<AppState> {
    let member = middleware::from_fn_with_state(state.clone(), guard::group_member_or_admin);
    let owner = middleware::from_fn_with_state(state.clone(), guard::group_owner_or_admin);

    Router::new()
        .route("/balance-groups", get(list_groups).post(create_group))
        .route(
            "/balance-groups/{group_id}",
            get(get_group)
                .route_layer(member)
                .merge(put(update_group).delete(delete_group).route_layer(owner)),
        )
}

/// Request body for creating a group.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBalanceGroupRequest {
    /// Group name.
    #[validate(length(max = 128))]
    pub group_name: String,
    /// Members besides the caller.
    #[serde(default)]
    pub group_member_ids: Vec<UserId>,
}

/// Request body for replacing a group's name and members.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBalanceGroupRequest {
    /// Group name.
    #[validate(length(max = 128))]
    pub group_name: String,
    /// Full member list.
    #[serde(default)]
    pub group_member_ids: Vec<UserId>,
    /// Version last read by the client. Omit to skip the check.
    pub version: Option<i32>,
}

/// A group with the caller's balance in it.
#[derive(Debug, Serialize)]
pub struct BalanceGroupResponse {
    /// Group ID.
    pub id: Option<BalanceGroupId>,
    /// Group name.
    pub group_name: String,
    /// Creator.
    pub owner_id: UserId,
    /// Members, owner first.
    pub group_member_ids: Vec<UserId>,
    /// Expenses, oldest first.
    pub expense_ids: Vec<ExpenseId>,
    /// Caller's balance. Positive means the group owes the caller.
    pub balance: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: Option<DateTime<Utc>>,
    /// Optimistic lock version.
    pub version: Option<i32>,
}

impl BalanceGroupResponse {
    fn new(group: BalanceGroup, balance: Decimal) -> Self {
        Self {
            id: group.id,
            group_name: group.name,
            owner_id: group.owner_id,
            group_member_ids: group.member_ids,
            expense_ids: group.expense_ids,
            balance,
            created_at: group.created_at,
            updated_at: group.updated_at,
            version: group.version,
        }
    }
}

async fn with_balance(state: &AppState, group: BalanceGroup, caller: CurrentUser) -> BalanceGroupResponse {
    let balance = match group.id {
        Some(id) => state.balances.calculate_balance(id, caller.id).await,
        None => Decimal::ZERO,
    };
    BalanceGroupResponse::new(group, balance)
}

/// GET /balance-groups - Groups the caller belongs to; every group for admins.
async fn list_groups(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Vec<BalanceGroupResponse>>> {
    let groups = if caller.role.is_admin() {
        state.balance_groups.get_all().await?
    } else {
        state
            .balance_groups
            .get_all_where_user_is_group_member(caller.id)
            .await?
    };

    let mut response = Vec::with_capacity(groups.len());
    for group in groups {
        response.push(with_balance(&state, group, caller).await);
    }
    Ok(Json(response))
}

/// POST /balance-groups - Create a group owned by the caller.
async fn create_group(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CreateBalanceGroupRequest>,
) -> ApiResult<(StatusCode, Json<BalanceGroupResponse>)> {
    payload.validate()?;

    let group = BalanceGroup::new(payload.group_name, payload.group_member_ids, caller.id);
    let saved = state.balance_groups.save(group).await?;

    Ok((StatusCode::CREATED, Json(with_balance(&state, saved, caller).await)))
}

/// GET /balance-groups/{group_id}
async fn get_group(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(group_id): Path<BalanceGroupId>,
) -> ApiResult<Json<BalanceGroupResponse>> {
    let group = state.balance_groups.get_by_id(group_id).await?;
    Ok(Json(with_balance(&state, group, caller).await))
}

/// PUT /balance-groups/{group_id} - Replace name and members.
///
/// The stored owner is kept whoever makes the call.
async fn update_group(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(group_id): Path<BalanceGroupId>,
    Json(payload): Json<UpdateBalanceGroupRequest>,
) -> ApiResult<Json<BalanceGroupResponse>> {
    payload.validate()?;

    let mut group = BalanceGroup::new(payload.group_name, payload.group_member_ids, caller.id);
    group.version = payload.version;
    let updated = state.balance_groups.update(group_id, group).await?;

    Ok(Json(with_balance(&state, updated, caller).await))
}

/// DELETE /balance-groups/{group_id} - Remove a group and its expenses.
async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<BalanceGroupId>,
) -> ApiResult<StatusCode> {
    state.balance_groups.delete(group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_uses_wire_names() {
        let owner = UserId::new();
        let group = BalanceGroup::new("trip", vec![owner], owner);

        let json = serde_json::to_value(BalanceGroupResponse::new(group, Decimal::new(-1550, 2))).unwrap();

        assert_eq!(json["group_name"], "trip");
        assert_eq!(json["group_member_ids"][0], owner.to_string());
        assert_eq!(json["balance"], "-15.50");
    }

    #[test]
    fn test_member_ids_default_to_empty() {
        let request: CreateBalanceGroupRequest =
            serde_json::from_str(r#"{"group_name": "trip"}"#).unwrap();
        assert!(request.group_member_ids.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_group_name_length_limit() {
        let request = UpdateBalanceGroupRequest {
            group_name: "x".repeat(129),
            group_member_ids: Vec::new(),
            version: Some(0),
        };
        assert!(request.validate().is_err());
    }
}
