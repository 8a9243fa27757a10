//! Balance group repository for database operations.
//!
//! A group is stored as one `balance_groups` row plus ordered
//! `balance_group_members` rows. Expense ids are read back from `expenses`.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use tracing::debug;
use uuid::Uuid;

use kitty_core::RepositoryError;
use kitty_core::balance_group::{
    BalanceGroup, BalanceGroupRepository as BalanceGroupRepoTrait, membership_with_owner,
};
use kitty_shared::types::{BalanceGroupId, ExpenseId, UserId};

use super::{db_error, insert_error};
use crate::entities::{balance_group_members, balance_groups, expenses};

/// Balance group repository implementation.
#[derive(Debug, Clone)]
pub struct BalanceGroupRepository {
    db: DatabaseConnection,
}

impl BalanceGroupRepository {
    /// Creates a new balance group repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads members and expense ids for the given rows, keeping row order.
    async fn assemble(
        &self,
        models: Vec<balance_groups::Model>,
    ) -> Result<Vec<BalanceGroup>, RepositoryError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

        let memberships = balance_group_members::Entity::find()
            .filter(balance_group_members::Column::BalanceGroupId.is_in(ids.clone()))
            .order_by_asc(balance_group_members::Column::Position)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        let expense_rows: Vec<(Uuid, Uuid)> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Id)
            .column(expenses::Column::BalanceGroupId)
            .filter(expenses::Column::BalanceGroupId.is_in(ids))
            .order_by_asc(expenses::Column::CreatedAt)
            .order_by_asc(expenses::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error)?;

        let mut members: HashMap<Uuid, Vec<UserId>> = HashMap::new();
        for row in memberships {
            members
                .entry(row.balance_group_id)
                .or_default()
                .push(row.user_id.into());
        }

        let mut expense_ids: HashMap<Uuid, Vec<ExpenseId>> = HashMap::new();
        for (expense_id, group_id) in expense_rows {
            expense_ids
                .entry(group_id)
                .or_default()
                .push(expense_id.into());
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let member_ids = members.remove(&model.id).unwrap_or_default();
                let expense_ids = expense_ids.remove(&model.id).unwrap_or_default();
                to_domain(model, member_ids, expense_ids)
            })
            .collect())
    }

    async fn assemble_one(
        &self,
        model: balance_groups::Model,
    ) -> Result<BalanceGroup, RepositoryError> {
        let id = model.id;
        self.assemble(vec![model])
            .await?
            .pop()
            .ok_or_else(|| RepositoryError::not_found("balance group", id))
    }

    async fn missing_or_stale(&self, id: BalanceGroupId) -> RepositoryError {
        match balance_groups::Entity::find_by_id(Uuid::from(id))
            .one(&self.db)
            .await
        {
            Ok(Some(_)) => RepositoryError::conflict("balance group", id),
            Ok(None) => RepositoryError::not_found("balance group", id),
            Err(e) => db_error(e),
        }
    }
}

/// Member rows for a group in list order.
fn member_rows(group_id: Uuid, members: &[UserId]) -> Vec<balance_group_members::ActiveModel> {
    members
        .iter()
        .zip(0..)
        .map(|(user_id, position)| balance_group_members::ActiveModel {
            balance_group_id: Set(group_id),
            user_id: Set((*user_id).into()),
            position: Set(position),
        })
        .collect()
}

impl BalanceGroupRepoTrait for BalanceGroupRepository {
    async fn save(&self, group: BalanceGroup) -> Result<BalanceGroup, RepositoryError> {
        let id = BalanceGroupId::new();
        let txn = self.db.begin().await.map_err(db_error)?;

        let model = balance_groups::ActiveModel {
            id: Set(id.into()),
            name: Set(group.name),
            owner_id: Set(group.owner_id.into()),
            created_at: Set(group.created_at.into()),
            updated_at: Set(group.updated_at.map(Into::into)),
            version: Set(0),
        }
        .insert(&txn)
        .await
        .map_err(|e| insert_error("balance group", id.into(), e))?;

        let member_ids = membership_with_owner(&group.member_ids, group.owner_id);
        balance_group_members::Entity::insert_many(member_rows(model.id, &member_ids))
            .exec(&txn)
            .await
            .map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        debug!(group_id = %id, "Inserted balance group rows");
        Ok(to_domain(model, member_ids, Vec::new()))
    }

    async fn update(
        &self,
        id: BalanceGroupId,
        group: BalanceGroup,
    ) -> Result<BalanceGroup, RepositoryError> {
        let group_id = Uuid::from(id);
        let txn = self.db.begin().await.map_err(db_error)?;

        let changes = balance_groups::ActiveModel {
            name: Set(group.name),
            updated_at: Set(group.updated_at.map(Into::into)),
            ..Default::default()
        };
        let mut query = balance_groups::Entity::update_many()
            .set(changes)
            .col_expr(
                balance_groups::Column::Version,
                Expr::col(balance_groups::Column::Version).add(1),
            )
            .filter(balance_groups::Column::Id.eq(group_id));
        if let Some(expected) = group.version {
            query = query.filter(balance_groups::Column::Version.eq(expected));
        }
        let result = query.exec(&txn).await.map_err(db_error)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(db_error)?;
            return Err(self.missing_or_stale(id).await);
        }

        let model = balance_groups::Entity::find_by_id(group_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or_else(|| RepositoryError::not_found("balance group", id))?;

        balance_group_members::Entity::delete_many()
            .filter(balance_group_members::Column::BalanceGroupId.eq(group_id))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        let member_ids = membership_with_owner(&group.member_ids, model.owner_id.into());
        balance_group_members::Entity::insert_many(member_rows(group_id, &member_ids))
            .exec(&txn)
            .await
            .map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        debug!(group_id = %id, version = model.version, "Updated balance group rows");
        self.assemble_one(model).await
    }

    async fn get_by_id(&self, id: BalanceGroupId) -> Result<Option<BalanceGroup>, RepositoryError> {
        let model = balance_groups::Entity::find_by_id(Uuid::from(id))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        match model {
            Some(model) => Ok(Some(self.assemble_one(model).await?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<BalanceGroup>, RepositoryError> {
        let models = balance_groups::Entity::find()
            .order_by_asc(balance_groups::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        self.assemble(models).await
    }

    async fn delete(&self, id: BalanceGroupId) -> Result<(), RepositoryError> {
        // Members and expenses go with the row through ON DELETE CASCADE.
        let result = balance_groups::Entity::delete_by_id(Uuid::from(id))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        debug!(group_id = %id, rows = result.rows_affected, "Deleted balance group row");
        Ok(())
    }

    async fn get_all_where_user_is_group_member(
        &self,
        user_id: UserId,
    ) -> Result<Vec<BalanceGroup>, RepositoryError> {
        let group_ids: Vec<Uuid> = balance_group_members::Entity::find()
            .select_only()
            .column(balance_group_members::Column::BalanceGroupId)
            .filter(balance_group_members::Column::UserId.eq(Uuid::from(user_id)))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error)?;

        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = balance_groups::Entity::find()
            .filter(balance_groups::Column::Id.is_in(group_ids))
            .order_by_asc(balance_groups::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        self.assemble(models).await
    }
}

/// Convert database model to domain type.
fn to_domain(
    model: balance_groups::Model,
    member_ids: Vec<UserId>,
    expense_ids: Vec<ExpenseId>,
) -> BalanceGroup {
    BalanceGroup {
        id: Some(model.id.into()),
        name: model.name,
        member_ids,
        expense_ids,
        owner_id: model.owner_id.into(),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.map(|t| t.with_timezone(&Utc)),
        version: Some(model.version),
    }
}
