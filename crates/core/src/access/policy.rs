//! Authorization predicates and guards.

use std::sync::Arc;

use kitty_shared::types::{BalanceGroupId, ExpenseId, UserId};
use tracing::debug;

use super::error::AccessError;
use crate::auth::UserRole;
use crate::balance_group::BalanceGroupRepository;
use crate::expense::ExpenseRepository;

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    /// Caller's account id.
    pub id: UserId,
    /// Caller's role.
    pub role: UserRole,
}

impl CurrentUser {
    /// Creates a caller identity.
    #[must_use]
    pub const fn new(id: UserId, role: UserRole) -> Self {
        Self { id, role }
    }
}

/// Access rule attached to a route. Admins pass every guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Caller is a member of the group.
    GroupMemberOrAdmin(BalanceGroupId),
    /// Caller created the group.
    GroupOwnerOrAdmin(BalanceGroupId),
    /// Caller created the expense.
    ExpenseOwnerOrAdmin(ExpenseId),
    /// Caller is the account itself.
    SelfOrAdmin(UserId),
}

/// Boolean access questions about the caller.
///
/// Every predicate fails with `AccessError::Unauthenticated` when there is no
/// caller, and fetches what it needs on each call.
pub struct AuthorizationPredicates<G, E> {
    groups: Arc<G>,
    expenses: Arc<E>,
}

impl<G, E> AuthorizationPredicates<G, E>
where
    G: BalanceGroupRepository,
    E: ExpenseRepository,
{
    /// Create a new predicate set.
    #[must_use]
    pub fn new(groups: Arc<G>, expenses: Arc<E>) -> Self {
        Self { groups, expenses }
    }

    /// Returns the caller's id.
    pub fn current_user_id(caller: Option<&CurrentUser>) -> Result<UserId, AccessError> {
        caller.map(|c| c.id).ok_or(AccessError::Unauthenticated)
    }

    /// Caller's role is admin.
    pub fn is_admin(caller: Option<&CurrentUser>) -> Result<bool, AccessError> {
        caller
            .map(|c| c.role.is_admin())
            .ok_or(AccessError::Unauthenticated)
    }

    /// Caller is the given account.
    pub fn is_self(caller: Option<&CurrentUser>, user_id: UserId) -> Result<bool, AccessError> {
        Ok(Self::current_user_id(caller)? == user_id)
    }

    /// Caller is in the group's member list.
    pub async fn is_balance_group_member(
        &self,
        caller: Option<&CurrentUser>,
        group_id: BalanceGroupId,
    ) -> Result<bool, AccessError> {
        let caller_id = Self::current_user_id(caller)?;
        let group = self
            .groups
            .get_by_id(group_id)
            .await?
            .ok_or(AccessError::BalanceGroupNotFound(group_id))?;
        Ok(group.is_member(caller_id))
    }

    /// Caller created the group.
    pub async fn is_balance_group_creator(
        &self,
        caller: Option<&CurrentUser>,
        group_id: BalanceGroupId,
    ) -> Result<bool, AccessError> {
        let caller_id = Self::current_user_id(caller)?;
        let group = self
            .groups
            .get_by_id(group_id)
            .await?
            .ok_or(AccessError::BalanceGroupNotFound(group_id))?;
        Ok(group.is_owned_by(caller_id))
    }

    /// Caller created the expense.
    pub async fn is_expense_creator(
        &self,
        caller: Option<&CurrentUser>,
        expense_id: ExpenseId,
    ) -> Result<bool, AccessError> {
        let caller_id = Self::current_user_id(caller)?;
        let expense = self
            .expenses
            .get_by_id(expense_id)
            .await?
            .ok_or(AccessError::ExpenseNotFound(expense_id))?;
        Ok(expense.owner_id == caller_id)
    }

    /// Evaluate a guard, failing with `Forbidden` when it does not hold.
    ///
    /// The admin check runs first; admins never trigger a resource fetch.
    pub async fn authorize(
        &self,
        caller: Option<&CurrentUser>,
        guard: Guard,
    ) -> Result<(), AccessError> {
        if Self::is_admin(caller)? {
            return Ok(());
        }

        let allowed = match guard {
            Guard::GroupMemberOrAdmin(id) => self.is_balance_group_member(caller, id).await?,
            Guard::GroupOwnerOrAdmin(id) => self.is_balance_group_creator(caller, id).await?,
            Guard::ExpenseOwnerOrAdmin(id) => self.is_expense_creator(caller, id).await?,
            Guard::SelfOrAdmin(id) => Self::is_self(caller, id)?,
        };

        if allowed {
            Ok(())
        } else {
            debug!(?guard, caller = ?caller.map(|c| c.id), "Guard rejected caller");
            Err(AccessError::Forbidden)
        }
    }
}
