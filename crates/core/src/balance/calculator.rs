//! Balance calculator.

use std::sync::Arc;

use kitty_shared::types::{BalanceGroupId, UserId};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::BalanceError;
use crate::balance_group::BalanceGroupRepository;
use crate::expense::{Expense, ExpenseRepository};

/// Computes a user's balance from the group's member count and expense list.
///
/// # Errors
///
/// Returns `BalanceError::NoMembers` for an empty group and
/// `BalanceError::Overflow` if a sum leaves the decimal range.
///
/// # Example
///
/// ```
/// use kitty_core::balance::compute_balance;
/// use kitty_shared::types::UserId;
///
/// let balance = compute_balance(2, &[], UserId::new()).unwrap();
/// assert!(balance.is_zero());
/// ```
pub fn compute_balance(
    member_count: usize,
    expenses: &[Expense],
    user_id: UserId,
) -> Result<Decimal, BalanceError> {
    let total_spend = sum_amounts(expenses.iter())?;
    let user_spend = sum_amounts(expenses.iter().filter(|e| e.owner_id == user_id))?;

    let per_member_share = total_spend
        .checked_div(Decimal::from(member_count))
        .ok_or(if member_count == 0 {
            BalanceError::NoMembers
        } else {
            BalanceError::Overflow
        })?;

    debug!(
        %total_spend,
        %user_spend,
        %per_member_share,
        member_count,
        "Computed balance inputs"
    );

    user_spend
        .checked_sub(per_member_share)
        .ok_or(BalanceError::Overflow)
}

fn sum_amounts<'a>(mut expenses: impl Iterator<Item = &'a Expense>) -> Result<Decimal, BalanceError> {
    expenses.try_fold(Decimal::ZERO, |acc, e| {
        acc.checked_add(e.amount).ok_or(BalanceError::Overflow)
    })
}

/// Reads a group and its expenses and derives balances.
pub struct BalanceCalculator<G, E> {
    groups: Arc<G>,
    expenses: Arc<E>,
}

impl<G, E> BalanceCalculator<G, E>
where
    G: BalanceGroupRepository,
    E: ExpenseRepository,
{
    /// Create a new calculator.
    #[must_use]
    pub fn new(groups: Arc<G>, expenses: Arc<E>) -> Self {
        Self { groups, expenses }
    }

    /// Balance of `user_id` in `group_id`, or zero if it cannot be computed.
    ///
    /// Every failure, including a missing group or an empty member list, is logged
    /// and reported as zero, which is indistinguishable from a settled balance. Use
    /// [`Self::try_calculate_balance`] anywhere the cause matters.
    pub async fn calculate_balance(&self, group_id: BalanceGroupId, user_id: UserId) -> Decimal {
        match self.try_calculate_balance(group_id, user_id).await {
            Ok(balance) => balance,
            Err(e) => {
                warn!(
                    group_id = %group_id,
                    user_id = %user_id,
                    error = %e,
                    "Balance calculation failed, reporting zero"
                );
                Decimal::ZERO
            }
        }
    }

    /// Balance of `user_id` in `group_id`.
    pub async fn try_calculate_balance(
        &self,
        group_id: BalanceGroupId,
        user_id: UserId,
    ) -> Result<Decimal, BalanceError> {
        let group = self
            .groups
            .get_by_id(group_id)
            .await?
            .ok_or(BalanceError::GroupNotFound(group_id))?;
        debug!(group_id = %group_id, members = group.member_ids.len(), "Loaded group for balance");

        let expenses = self.expenses.get_all_by_balance_group(group_id).await?;
        debug!(group_id = %group_id, expenses = expenses.len(), "Loaded expenses for balance");

        compute_balance(group.member_ids.len(), &expenses, user_id)
    }
}
