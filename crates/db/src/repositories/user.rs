//! User repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use tracing::debug;
use uuid::Uuid;

use kitty_core::RepositoryError;
use kitty_core::auth::{AccountStatus, UserRole};
use kitty_core::user::{User, UserRepository as UserRepoTrait};
use kitty_shared::types::UserId;

use super::{db_error, insert_error};
use crate::entities::{
    sea_orm_active_enums::AccountStatus as DbAccountStatus,
    sea_orm_active_enums::UserRole as DbUserRole, users,
};

/// User repository implementation.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let id = UserId::new();
        let active_model = users::ActiveModel {
            id: Set(id.into()),
            email: Set(user.email),
            nickname: Set(user.nickname),
            password_hash: Set(user.password_hash),
            role: Set(to_db_role(user.role)),
            is_email_verified: Set(user.is_email_verified),
            account_status: Set(to_db_status(user.account_status)),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.map(Into::into)),
            last_login_at: Set(user.last_login_at.map(Into::into)),
            version: Set(0),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| insert_error("user", id.into(), e))?;

        debug!(user_id = %id, "Inserted user row");
        Ok(to_domain(model))
    }

    /// Compare-and-swap on `version`; the row is only written if nobody else has.
    async fn update(&self, id: UserId, user: User) -> Result<User, RepositoryError> {
        let expected = user.version;
        let changes = users::ActiveModel {
            email: Set(user.email.clone()),
            nickname: Set(user.nickname.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(to_db_role(user.role)),
            is_email_verified: Set(user.is_email_verified),
            account_status: Set(to_db_status(user.account_status)),
            updated_at: Set(user.updated_at.map(Into::into)),
            last_login_at: Set(user.last_login_at.map(Into::into)),
            ..Default::default()
        };

        let result = users::Entity::update_many()
            .set(changes)
            .col_expr(users::Column::Version, Expr::col(users::Column::Version).add(1))
            .filter(users::Column::Id.eq(Uuid::from(id)))
            .filter(users::Column::Version.eq(expected))
            .exec(&self.db)
            .await
            .map_err(|e| insert_error("user", id.into(), e))?;

        if result.rows_affected == 0 {
            return Err(self.missing_or_stale(id).await);
        }

        Ok(User {
            version: expected + 1,
            ..user
        })
    }

    async fn missing_or_stale(&self, id: UserId) -> RepositoryError {
        match users::Entity::find_by_id(Uuid::from(id)).one(&self.db).await {
            Ok(Some(_)) => RepositoryError::conflict("user", id),
            Ok(None) => RepositoryError::not_found("user", id),
            Err(e) => db_error(e),
        }
    }
}

impl UserRepoTrait for UserRepository {
    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        match user.id {
            None => self.insert(user).await,
            Some(id) => self.update(id, user).await,
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(to_domain))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let model = users::Entity::find_by_id(Uuid::from(id))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(to_domain))
    }

    async fn delete(&self, user: &User) -> Result<(), RepositoryError> {
        let Some(id) = user.id else {
            return Ok(());
        };

        let result = users::Entity::delete_by_id(Uuid::from(id))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        debug!(user_id = %id, rows = result.rows_affected, "Deleted user row");
        Ok(())
    }
}

/// Convert domain role to database enum.
const fn to_db_role(role: UserRole) -> DbUserRole {
    match role {
        UserRole::User => DbUserRole::User,
        UserRole::Admin => DbUserRole::Admin,
    }
}

/// Convert database role to domain enum.
const fn from_db_role(role: DbUserRole) -> UserRole {
    match role {
        DbUserRole::User => UserRole::User,
        DbUserRole::Admin => UserRole::Admin,
    }
}

const fn to_db_status(status: AccountStatus) -> DbAccountStatus {
    match status {
        AccountStatus::Active => DbAccountStatus::Active,
        AccountStatus::Inactive => DbAccountStatus::Inactive,
        AccountStatus::Blocked => DbAccountStatus::Blocked,
    }
}

const fn from_db_status(status: DbAccountStatus) -> AccountStatus {
    match status {
        DbAccountStatus::Active => AccountStatus::Active,
        DbAccountStatus::Inactive => AccountStatus::Inactive,
        DbAccountStatus::Blocked => AccountStatus::Blocked,
    }
}

/// Convert database model to domain type.
fn to_domain(model: users::Model) -> User {
    User {
        id: Some(model.id.into()),
        email: model.email,
        nickname: model.nickname,
        password_hash: model.password_hash,
        role: from_db_role(model.role),
        is_email_verified: model.is_email_verified,
        account_status: from_db_status(model.account_status),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.map(|t| t.with_timezone(&Utc)),
        last_login_at: model.last_login_at.map(|t| t.with_timezone(&Utc)),
        version: model.version,
    }
}
