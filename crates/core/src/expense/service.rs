//! Expense service implementation.

use std::sync::Arc;

use chrono::Utc;
use kitty_shared::types::{BalanceGroupId, ExpenseId};
use tracing::info;

use super::error::ExpenseError;
use super::types::Expense;
use super::validator::ExpenseValidator;
use crate::balance_group::BalanceGroupRepository;
use crate::repository::RepositoryError;
use crate::user::UserRepository;

/// Repository trait for expense persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait ExpenseRepository: Send + Sync {
    /// Insert a new expense and assign its id.
    fn save(
        &self,
        expense: Expense,
    ) -> impl std::future::Future<Output = Result<Expense, RepositoryError>> + Send;

    /// Replace name, amount and split type of an existing expense.
    ///
    /// Fails with `RepositoryError::Conflict` when `expense.version` is stale.
    fn update(
        &self,
        id: ExpenseId,
        expense: Expense,
    ) -> impl std::future::Future<Output = Result<Expense, RepositoryError>> + Send;

    /// Find an expense by ID.
    fn get_by_id(
        &self,
        id: ExpenseId,
    ) -> impl std::future::Future<Output = Result<Option<Expense>, RepositoryError>> + Send;

    /// List the expenses of a group, oldest first.
    fn get_all_by_balance_group(
        &self,
        group_id: BalanceGroupId,
    ) -> impl std::future::Future<Output = Result<Vec<Expense>, RepositoryError>> + Send;

    /// Delete an expense.
    fn delete(
        &self,
        id: ExpenseId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Expense service.
pub struct ExpenseService<U, G, E> {
    validator: ExpenseValidator<U, G, E>,
    expenses: Arc<E>,
}

impl<U, G, E> ExpenseService<U, G, E>
where
    U: UserRepository,
    G: BalanceGroupRepository,
    E: ExpenseRepository,
{
    /// Create a new expense service.
    #[must_use]
    pub fn new(users: Arc<U>, groups: Arc<G>, expenses: Arc<E>) -> Self {
        Self {
            validator: ExpenseValidator::new(users, groups, expenses.clone()),
            expenses,
        }
    }

    /// Validate and insert an expense.
    pub async fn save(&self, expense: Expense) -> Result<Expense, ExpenseError> {
        self.validator.validate(&expense).await?;
        let saved = self.expenses.save(expense).await?;
        info!(
            expense_id = ?saved.id,
            group_id = %saved.balance_group_id,
            amount = %saved.amount,
            "Created expense"
        );
        Ok(saved)
    }

    /// Validate and apply an update.
    pub async fn update(&self, id: ExpenseId, mut expense: Expense) -> Result<Expense, ExpenseError> {
        self.validator.validate_for_update(id, &expense).await?;
        expense.updated_at = Some(Utc::now());
        let updated = self.expenses.update(id, expense).await?;
        info!(expense_id = %id, "Updated expense");
        Ok(updated)
    }

    /// Delete an expense.
    pub async fn delete(&self, id: ExpenseId) -> Result<(), ExpenseError> {
        self.validator.check_exists(id).await?;
        self.expenses.delete(id).await?;
        info!(expense_id = %id, "Deleted expense");
        Ok(())
    }

    /// Get an expense by ID.
    pub async fn get_by_id(&self, id: ExpenseId) -> Result<Expense, ExpenseError> {
        self.validator.get_if_exists(id).await
    }

    /// List the expenses of an existing group.
    pub async fn get_all_by_balance_group(
        &self,
        group_id: BalanceGroupId,
    ) -> Result<Vec<Expense>, ExpenseError> {
        self.validator.check_group_exists(group_id).await?;
        Ok(self.expenses.get_all_by_balance_group(group_id).await?)
    }
}
