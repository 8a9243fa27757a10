//! Expense repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use tracing::debug;
use uuid::Uuid;

use kitty_core::RepositoryError;
use kitty_core::expense::{Expense, ExpenseRepository as ExpenseRepoTrait, SplitType};
use kitty_shared::types::{BalanceGroupId, ExpenseId};

use super::{db_error, insert_error};
use crate::entities::{expenses, sea_orm_active_enums::SplitType as DbSplitType};

/// Expense repository implementation.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn missing_or_stale(&self, id: ExpenseId) -> RepositoryError {
        match expenses::Entity::find_by_id(Uuid::from(id)).one(&self.db).await {
            Ok(Some(_)) => RepositoryError::conflict("expense", id),
            Ok(None) => RepositoryError::not_found("expense", id),
            Err(e) => db_error(e),
        }
    }
}

impl ExpenseRepoTrait for ExpenseRepository {
    async fn save(&self, expense: Expense) -> Result<Expense, RepositoryError> {
        let id = ExpenseId::new();
        let active_model = expenses::ActiveModel {
            id: Set(id.into()),
            name: Set(expense.name),
            balance_group_id: Set(expense.balance_group_id.into()),
            owner_id: Set(expense.owner_id.into()),
            amount: Set(expense.amount),
            split_type: Set(to_db_split_type(expense.split_type)),
            created_at: Set(expense.created_at.into()),
            updated_at: Set(expense.updated_at.map(Into::into)),
            version: Set(0),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| insert_error("expense", id.into(), e))?;

        debug!(expense_id = %id, "Inserted expense row");
        Ok(to_domain(model))
    }

    async fn update(&self, id: ExpenseId, expense: Expense) -> Result<Expense, RepositoryError> {
        let expense_id = Uuid::from(id);
        let changes = expenses::ActiveModel {
            name: Set(expense.name),
            amount: Set(expense.amount),
            split_type: Set(to_db_split_type(expense.split_type)),
            updated_at: Set(expense.updated_at.map(Into::into)),
            ..Default::default()
        };

        let mut query = expenses::Entity::update_many()
            .set(changes)
            .col_expr(
                expenses::Column::Version,
                Expr::col(expenses::Column::Version).add(1),
            )
            .filter(expenses::Column::Id.eq(expense_id));
        if let Some(expected) = expense.version {
            query = query.filter(expenses::Column::Version.eq(expected));
        }
        let result = query.exec(&self.db).await.map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(self.missing_or_stale(id).await);
        }

        let model = expenses::Entity::find_by_id(expense_id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| RepositoryError::not_found("expense", id))?;

        debug!(expense_id = %id, version = model.version, "Updated expense row");
        Ok(to_domain(model))
    }

    async fn get_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, RepositoryError> {
        let model = expenses::Entity::find_by_id(Uuid::from(id))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(to_domain))
    }

    async fn get_all_by_balance_group(
        &self,
        group_id: BalanceGroupId,
    ) -> Result<Vec<Expense>, RepositoryError> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::BalanceGroupId.eq(Uuid::from(group_id)))
            .order_by_asc(expenses::Column::CreatedAt)
            .order_by_asc(expenses::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        let result = expenses::Entity::delete_by_id(Uuid::from(id))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        debug!(expense_id = %id, rows = result.rows_affected, "Deleted expense row");
        Ok(())
    }
}

const fn to_db_split_type(split_type: SplitType) -> DbSplitType {
    match split_type {
        SplitType::Equally => DbSplitType::Equally,
    }
}

const fn from_db_split_type(split_type: DbSplitType) -> SplitType {
    match split_type {
        DbSplitType::Equally => SplitType::Equally,
    }
}

/// Convert database model to domain type.
fn to_domain(model: expenses::Model) -> Expense {
    Expense {
        id: Some(model.id.into()),
        name: model.name,
        balance_group_id: model.balance_group_id.into(),
        owner_id: model.owner_id.into(),
        amount: model.amount,
        split_type: from_db_split_type(model.split_type),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.map(|t| t.with_timezone(&Utc)),
        version: Some(model.version),
    }
}
