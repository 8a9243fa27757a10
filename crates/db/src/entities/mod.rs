//! `SeaORM` entity definitions.

#![allow(missing_docs)]

pub mod prelude;

pub mod balance_group_members;
pub mod balance_groups;
pub mod expenses;
pub mod sea_orm_active_enums;
pub mod users;
