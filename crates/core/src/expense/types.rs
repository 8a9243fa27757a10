//! Expense types.

use chrono::{DateTime, Utc};
use kitty_shared::types::{BalanceGroupId, ExpenseId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an expense is divided between group members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitType {
    /// Every member carries the same share.
    #[default]
    Equally,
}

impl SplitType {
    /// Convert to database string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equally => "EQUALLY",
        }
    }
}

/// Money spent by one member on behalf of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID, absent until first saved.
    pub id: Option<ExpenseId>,
    /// Description, never blank.
    pub name: String,
    /// Group the expense belongs to. Immutable after creation.
    pub balance_group_id: BalanceGroupId,
    /// Member who paid. Immutable after creation.
    pub owner_id: UserId,
    /// Amount paid, strictly positive.
    pub amount: Decimal,
    /// Split rule.
    pub split_type: SplitType,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Optimistic lock version. On update, `Some` is the version the caller last saw.
    pub version: Option<i32>,
}

impl Expense {
    /// Builds an unsaved expense.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        balance_group_id: BalanceGroupId,
        owner_id: UserId,
        amount: Decimal,
        split_type: SplitType,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            balance_group_id,
            owner_id,
            amount,
            split_type,
            created_at: Utc::now(),
            updated_at: None,
            version: None,
        }
    }
}
