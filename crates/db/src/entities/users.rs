//! `SeaORM` Entity for users table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AccountStatus, UserRole};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub nickname: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub is_email_verified: bool,
    pub account_status: AccountStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub last_login_at: Option<DateTimeWithTimeZone>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::balance_groups::Entity")]
    BalanceGroups,
    #[sea_orm(has_many = "super::balance_group_members::Entity")]
    BalanceGroupMembers,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::balance_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BalanceGroups.def()
    }
}

impl Related<super::balance_group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BalanceGroupMembers.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
