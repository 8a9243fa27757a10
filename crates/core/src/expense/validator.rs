//! Expense validation rules.

use std::sync::Arc;

use kitty_shared::types::{BalanceGroupId, ExpenseId};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::ExpenseError;
use super::service::ExpenseRepository;
use super::types::Expense;
use crate::balance_group::BalanceGroupRepository;
use crate::user::UserRepository;

/// Checks an expense before it is written.
///
/// Rules: owner exists, group exists, owner is a member, name is not blank,
/// amount is positive. The first failure is returned.
pub struct ExpenseValidator<U, G, E> {
    users: Arc<U>,
    groups: Arc<G>,
    expenses: Arc<E>,
}

impl<U, G, E> ExpenseValidator<U, G, E>
where
    U: UserRepository,
    G: BalanceGroupRepository,
    E: ExpenseRepository,
{
    /// Create a new validator.
    #[must_use]
    pub fn new(users: Arc<U>, groups: Arc<G>, expenses: Arc<E>) -> Self {
        Self {
            users,
            groups,
            expenses,
        }
    }

    /// Validate the fields of an expense.
    pub async fn validate(&self, expense: &Expense) -> Result<(), ExpenseError> {
        if self.users.find_by_id(expense.owner_id).await?.is_none() {
            debug!(owner_id = %expense.owner_id, "Expense owner not found");
            return Err(ExpenseError::validation("Expense owner does not exist"));
        }

        let group_id = expense.balance_group_id;
        let Some(group) = self.groups.get_by_id(group_id).await? else {
            debug!(group_id = %group_id, "Balance group of expense not found");
            return Err(ExpenseError::validation("Balance group does not exist"));
        };
        if !group.is_member(expense.owner_id) {
            debug!(
                group_id = %group_id,
                owner_id = %expense.owner_id,
                "Expense owner is not a group member"
            );
            return Err(ExpenseError::validation(format!(
                "Expense creator is not a member of balance group ({group_id}), expense cannot be created"
            )));
        }

        if expense.name.trim().is_empty() {
            debug!("Expense name is blank");
            return Err(ExpenseError::validation(
                "Expense name cannot contain whitespace only",
            ));
        }

        if expense.amount <= Decimal::ZERO {
            debug!(amount = %expense.amount, "Expense amount is not positive");
            return Err(ExpenseError::validation("Amount must be positive value"));
        }

        Ok(())
    }

    /// Validate an update: the expense must exist, the new data must be valid, and
    /// neither the group nor the owner may change.
    pub async fn validate_for_update(
        &self,
        expense_id: ExpenseId,
        expense: &Expense,
    ) -> Result<(), ExpenseError> {
        self.check_exists(expense_id).await?;
        self.validate(expense).await?;

        let existing = self.get_if_exists(expense_id).await?;
        if existing.balance_group_id != expense.balance_group_id {
            debug!(
                expense_id = %expense_id,
                from = %existing.balance_group_id,
                to = %expense.balance_group_id,
                "Rejected moving expense between groups"
            );
            return Err(ExpenseError::validation(
                "Moving expenses between balance groups is not supported",
            ));
        }
        if existing.owner_id != expense.owner_id {
            debug!(expense_id = %expense_id, "Rejected expense owner change");
            return Err(ExpenseError::validation(
                "Changing expense owner is not supported",
            ));
        }

        Ok(())
    }

    /// Fail with `NotFound` if the expense does not exist.
    pub async fn check_exists(&self, expense_id: ExpenseId) -> Result<(), ExpenseError> {
        self.get_if_exists(expense_id).await.map(|_| ())
    }

    /// Fail with `BalanceGroupNotFound` if the group does not exist.
    pub async fn check_group_exists(&self, group_id: BalanceGroupId) -> Result<(), ExpenseError> {
        match self.groups.get_by_id(group_id).await? {
            Some(_) => Ok(()),
            None => {
                debug!(group_id = %group_id, "Balance group not found");
                Err(ExpenseError::BalanceGroupNotFound(group_id))
            }
        }
    }

    /// Fetch an expense or fail with `NotFound`.
    pub async fn get_if_exists(&self, expense_id: ExpenseId) -> Result<Expense, ExpenseError> {
        self.expenses
            .get_by_id(expense_id)
            .await?
            .ok_or_else(|| {
                debug!(expense_id = %expense_id, "Expense not found");
                ExpenseError::NotFound(expense_id)
            })
    }
}
