//! Balance group validation rules.

use std::sync::Arc;

use kitty_shared::types::BalanceGroupId;
use tracing::debug;

use super::error::BalanceGroupError;
use super::service::BalanceGroupRepository;
use super::types::BalanceGroup;
use crate::expense::ExpenseRepository;
use crate::user::UserRepository;

/// Checks a group before it is written.
///
/// Rules run in a fixed order (owner, name, members, expenses) and the first
/// failure is returned.
pub struct BalanceGroupValidator<U, G, E> {
    users: Arc<U>,
    groups: Arc<G>,
    expenses: Arc<E>,
}

impl<U, G, E> BalanceGroupValidator<U, G, E>
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

    /// Validate the fields of a group.
    pub async fn validate(&self, group: &BalanceGroup) -> Result<(), BalanceGroupError> {
        if self.users.find_by_id(group.owner_id).await?.is_none() {
            debug!(owner_id = %group.owner_id, "Balance group owner not found");
            return Err(BalanceGroupError::validation(
                "Balance group owner does not exist",
            ));
        }

        if group.name.trim().is_empty() {
            debug!("Balance group name is blank");
            return Err(BalanceGroupError::validation(
                "Balance group name cannot contain whitespace only",
            ));
        }

        let mut missing_members = Vec::new();
        for member_id in &group.member_ids {
            if self.users.find_by_id(*member_id).await?.is_none() {
                missing_members.push(*member_id);
            }
        }
        if !missing_members.is_empty() {
            debug!(?missing_members, "Balance group members not found");
            return Err(BalanceGroupError::validation(
                "Some of the members have not been found",
            ));
        }

        let mut missing_expenses = Vec::new();
        for expense_id in &group.expense_ids {
            if self.expenses.get_by_id(*expense_id).await?.is_none() {
                missing_expenses.push(*expense_id);
            }
        }
        if !missing_expenses.is_empty() {
            debug!(?missing_expenses, "Balance group expenses not found");
            return Err(BalanceGroupError::validation(
                "Some of the expenses have not been found",
            ));
        }

        Ok(())
    }

    /// Validate the new data, then confirm the target group exists.
    ///
    /// Field validation runs first, so a bad payload against a missing id reports
    /// the payload problem.
    pub async fn validate_for_update(
        &self,
        group_id: BalanceGroupId,
        group: &BalanceGroup,
    ) -> Result<(), BalanceGroupError> {
        self.validate(group).await?;
        self.get_if_exists(group_id).await?;
        Ok(())
    }

    /// Fetch a group or fail with `NotFound`.
    pub async fn get_if_exists(
        &self,
        group_id: BalanceGroupId,
    ) -> Result<BalanceGroup, BalanceGroupError> {
        self.groups
            .get_by_id(group_id)
            .await?
            .ok_or_else(|| {
                debug!(group_id = %group_id, "Balance group not found");
                BalanceGroupError::NotFound(group_id)
            })
    }
}
