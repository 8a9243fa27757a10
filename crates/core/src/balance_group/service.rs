//! Balance group service implementation.

use std::sync::Arc;

use chrono::Utc;
use kitty_shared::types::{BalanceGroupId, UserId};
use tracing::info;

use super::error::BalanceGroupError;
use super::types::BalanceGroup;
use super::validator::BalanceGroupValidator;
use crate::expense::ExpenseRepository;
use crate::repository::RepositoryError;
use crate::user::UserRepository;

/// Repository trait for balance group persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait BalanceGroupRepository: Send + Sync {
    /// Insert a new group and assign its id.
    fn save(
        &self,
        group: BalanceGroup,
    ) -> impl std::future::Future<Output = Result<BalanceGroup, RepositoryError>> + Send;

    /// Replace the name and members of an existing group.
    ///
    /// Owner, creation time and expenses are kept. Fails with
    /// `RepositoryError::Conflict` when `group.version` is stale.
    fn update(
        &self,
        id: BalanceGroupId,
        group: BalanceGroup,
    ) -> impl std::future::Future<Output = Result<BalanceGroup, RepositoryError>> + Send;

    /// Find a group by ID.
    fn get_by_id(
        &self,
        id: BalanceGroupId,
    ) -> impl std::future::Future<Output = Result<Option<BalanceGroup>, RepositoryError>> + Send;

    /// List every group.
    fn get_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<BalanceGroup>, RepositoryError>> + Send;

    /// Delete a group together with its expenses.
    fn delete(
        &self,
        id: BalanceGroupId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List groups whose member list contains `user_id`.
    fn get_all_where_user_is_group_member(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<BalanceGroup>, RepositoryError>> + Send;
}

/// Balance group service.
pub struct BalanceGroupService<U, G, E> {
    validator: BalanceGroupValidator<U, G, E>,
    users: Arc<U>,
    groups: Arc<G>,
}

impl<U, G, E> BalanceGroupService<U, G, E>
where
    U: UserRepository,
    G: BalanceGroupRepository,
    E: ExpenseRepository,
{
    /// Create a new balance group service.
    #[must_use]
    pub fn new(users: Arc<U>, groups: Arc<G>, expenses: Arc<E>) -> Self {
        Self {
            validator: BalanceGroupValidator::new(users.clone(), groups.clone(), expenses),
            users,
            groups,
        }
    }

    /// Validate and insert a group.
    pub async fn save(&self, group: BalanceGroup) -> Result<BalanceGroup, BalanceGroupError> {
        self.validator.validate(&group).await?;
        let saved = self.groups.save(group).await?;
        info!(group_id = ?saved.id, owner_id = %saved.owner_id, "Created balance group");
        Ok(saved)
    }

    /// Validate and apply an update.
    pub async fn update(
        &self,
        id: BalanceGroupId,
        mut group: BalanceGroup,
    ) -> Result<BalanceGroup, BalanceGroupError> {
        self.validator.validate_for_update(id, &group).await?;
        group.updated_at = Some(Utc::now());
        let updated = self.groups.update(id, group).await?;
        info!(group_id = %id, "Updated balance group");
        Ok(updated)
    }

    /// Delete a group and its expenses.
    pub async fn delete(&self, id: BalanceGroupId) -> Result<(), BalanceGroupError> {
        self.validator.get_if_exists(id).await?;
        self.groups.delete(id).await?;
        info!(group_id = %id, "Deleted balance group");
        Ok(())
    }

    /// Get a group by ID.
    pub async fn get_by_id(&self, id: BalanceGroupId) -> Result<BalanceGroup, BalanceGroupError> {
        self.validator.get_if_exists(id).await
    }

    /// List every group.
    pub async fn get_all(&self) -> Result<Vec<BalanceGroup>, BalanceGroupError> {
        Ok(self.groups.get_all().await?)
    }

    /// List groups the user belongs to.
    ///
    /// An unknown user is a validation error rather than an empty list.
    pub async fn get_all_where_user_is_group_member(
        &self,
        user_id: UserId,
    ) -> Result<Vec<BalanceGroup>, BalanceGroupError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(BalanceGroupError::validation(format!(
                "User with id {user_id} does not exist"
            )));
        }
        Ok(self.groups.get_all_where_user_is_group_member(user_id).await?)
    }
}
