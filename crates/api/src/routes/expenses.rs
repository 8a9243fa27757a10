//! Expense routes, nested under their balance group.

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

use kitty_core::expense::{Expense, SplitType};
use kitty_shared::types::{BalanceGroupId, ExpenseId, UserId};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{AuthUser, guard},
};

/// Creates the expense routes (requires auth middleware to be applied externally).
pub fn routes(state: &AppState) -> Router<AppState> {
    let member = middleware::from_fn_with_state(state.clone(), guard::group_member_or_admin);
    let owner = middleware::from_fn_with_state(state.clone(), guard::expense_owner_or_admin);

    Router::new()
        .route(
            "/balance-groups/{group_id}/expenses",
            get(list_expenses)
                .post(create_expense)
                .route_layer(member.clone()),
        )
        .route(
            "/balance-groups/{group_id}/expenses/{expense_id}",
            get(get_expense)
                .route_layer(member)
                .merge(put(update_expense).delete(delete_expense).route_layer(owner)),
        )
}

/// Request body for logging an expense.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    /// Description.
    #[validate(length(max = 128))]
    pub name: String,
    /// Amount paid.
    pub amount: Decimal,
    /// Split rule.
    #[serde(default)]
    pub split_type: SplitType,
}

/// Request body for replacing an expense.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateExpenseRequest {
    /// Description.
    #[validate(length(max = 128))]
    pub name: String,
    /// Amount paid.
    pub amount: Decimal,
    /// Split rule.
    #[serde(default)]
    pub split_type: SplitType,
    /// Version last read by the client. Omit to skip the check.
    pub version: Option<i32>,
}

/// An expense as returned by the API.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Expense ID.
    pub id: Option<ExpenseId>,
    /// Description.
    pub name: String,
    /// Owning group.
    pub balance_group_id: BalanceGroupId,
    /// Member who paid.
    pub owner_id: UserId,
    /// Amount paid.
    pub amount: Decimal,
    /// Split rule.
    pub split_type: SplitType,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: Option<DateTime<Utc>>,
    /// Optimistic lock version.
    pub version: Option<i32>,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            name: expense.name,
            balance_group_id: expense.balance_group_id,
            owner_id: expense.owner_id,
            amount: expense.amount,
            split_type: expense.split_type,
            created_at: expense.created_at,
            updated_at: expense.updated_at,
            version: expense.version,
        }
    }
}

/// Loads an expense, hiding it when it belongs to another group.
async fn load_in_group(
    state: &AppState,
    group_id: BalanceGroupId,
    expense_id: ExpenseId,
) -> ApiResult<Expense> {
    let expense = state.expenses.get_by_id(expense_id).await?;
    if expense.balance_group_id != group_id {
        return Err(ApiError::not_found(format!(
            "Expense {expense_id} not found in balance group {group_id}"
        )));
    }
    Ok(expense)
}

/// GET /balance-groups/{group_id}/expenses
async fn list_expenses(
    State(state): State<AppState>,
    Path(group_id): Path<BalanceGroupId>,
) -> ApiResult<Json<Vec<ExpenseResponse>>> {
    let expenses = state.expenses.get_all_by_balance_group(group_id).await?;
    Ok(Json(expenses.into_iter().map(Into::into).collect()))
}

/// POST /balance-groups/{group_id}/expenses - Log an expense paid by the caller.
async fn create_expense(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(group_id): Path<BalanceGroupId>,
    Json(payload): Json<CreateExpenseRequest>,
) -> ApiResult<(StatusCode, Json<ExpenseResponse>)> {
    payload.validate()?;

    let expense = Expense::new(
        payload.name,
        group_id,
        caller.id,
        payload.amount,
        payload.split_type,
    );
    let saved = state.expenses.save(expense).await?;

    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// GET /balance-groups/{group_id}/expenses/{expense_id}
async fn get_expense(
    State(state): State<AppState>,
    Path((group_id, expense_id)): Path<(BalanceGroupId, ExpenseId)>,
) -> ApiResult<Json<ExpenseResponse>> {
    let expense = load_in_group(&state, group_id, expense_id).await?;
    Ok(Json(expense.into()))
}

/// PUT /balance-groups/{group_id}/expenses/{expense_id}
///
/// Group and payer stay as stored.
async fn update_expense(
    State(state): State<AppState>,
    Path((group_id, expense_id)): Path<(BalanceGroupId, ExpenseId)>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> ApiResult<Json<ExpenseResponse>> {
    payload.validate()?;

    let existing = load_in_group(&state, group_id, expense_id).await?;
    let mut expense = Expense::new(
        payload.name,
        group_id,
        existing.owner_id,
        payload.amount,
        payload.split_type,
    );
    expense.version = payload.version;
    let updated = state.expenses.update(expense_id, expense).await?;

    Ok(Json(updated.into()))
}

/// DELETE /balance-groups/{group_id}/expenses/{expense_id}
async fn delete_expense(
    State(state): State<AppState>,
    Path((group_id, expense_id)): Path<(BalanceGroupId, ExpenseId)>,
) -> ApiResult<StatusCode> {
    load_in_group(&state, group_id, expense_id).await?;
    state.expenses.delete(expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_string_and_number_amounts() {
        let request: CreateExpenseRequest =
            serde_json::from_str(r#"{"name": "lunch", "amount": "20.50", "split_type": "EQUALLY"}"#)
                .unwrap();
        assert_eq!(request.amount, Decimal::new(2050, 2));
        assert_eq!(request.split_type, SplitType::Equally);

        let request: CreateExpenseRequest =
            serde_json::from_str(r#"{"name": "lunch", "amount": 20}"#).unwrap();
        assert_eq!(request.amount, Decimal::from(20));
    }

    #[test]
    fn test_unknown_split_type_is_rejected() {
        let result = serde_json::from_str::<CreateExpenseRequest>(
            r#"{"name": "lunch", "amount": "20", "split_type": "BY_SHARES"}"#,
        );
        assert!(result.is_err());
    }
}
