//! Entity re-exports.

pub use super::balance_group_members::Entity as BalanceGroupMembers;
pub use super::balance_groups::Entity as BalanceGroups;
pub use super::expenses::Entity as Expenses;
pub use super::users::Entity as Users;
