//! Balance group types.

use chrono::{DateTime, Utc};
use kitty_shared::types::{BalanceGroupId, ExpenseId, UserId};
use serde::{Deserialize, Serialize};

/// A named set of users sharing expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceGroup {
    /// Group ID, absent until first saved.
    pub id: Option<BalanceGroupId>,
    /// Display name, never blank.
    pub name: String,
    /// Members as stored. The relational store always includes the owner.
    pub member_ids: Vec<UserId>,
    /// Expenses logged against the group.
    pub expense_ids: Vec<ExpenseId>,
    /// Creator of the group.
    pub owner_id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Optimistic lock version. On update, `Some` is the version the caller last saw.
    pub version: Option<i32>,
}

impl BalanceGroup {
    /// Builds an unsaved group owned by `owner_id`.
    #[must_use]
    pub fn new(name: impl Into<String>, member_ids: Vec<UserId>, owner_id: UserId) -> Self {
        Self {
            id: None,
            name: name.into(),
            member_ids,
            expense_ids: Vec::new(),
            owner_id,
            created_at: Utc::now(),
            updated_at: None,
            version: None,
        }
    }

    /// Returns true if `user_id` is in the member list.
    #[must_use]
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.member_ids.contains(&user_id)
    }

    /// Returns true if `user_id` created the group.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Membership as a set with the owner first and present exactly once.
///
/// Later duplicates are dropped; the order of first appearance is kept.
#[must_use]
pub fn membership_with_owner(member_ids: &[UserId], owner_id: UserId) -> Vec<UserId> {
    let mut members = Vec::with_capacity(member_ids.len() + 1);
    members.push(owner_id);
    for id in member_ids {
        if !members.contains(id) {
            members.push(*id);
        }
    }
    members
}
