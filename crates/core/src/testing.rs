//! In-memory port implementations shared by the unit tests.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::Utc;
use kitty_shared::types::{BalanceGroupId, ExpenseId, UserId};
use rust_decimal::Decimal;

use crate::auth::{AccountStatus, PasswordEncoder, PasswordError, UserRole};
use crate::balance_group::{BalanceGroup, BalanceGroupRepository};
use crate::expense::{Expense, ExpenseRepository, SplitType};
use crate::repository::RepositoryError;
use crate::user::{EmailVerificationSender, User, UserRepository};

/// User store keyed by id.
#[derive(Default)]
pub struct MockUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an active user and returns its id.
    pub fn add_user(&self, email: &str, role: UserRole) -> UserId {
        let id = UserId::new();
        let user = User {
            id: Some(id),
            email: email.to_string(),
            nickname: None,
            password_hash: "encoded:Passw0rd!".to_string(),
            role,
            is_email_verified: true,
            account_status: AccountStatus::Active,
            created_at: Utc::now(),
            updated_at: None,
            last_login_at: None,
            version: 0,
        };
        self.users.lock().unwrap().insert(id, user);
        id
    }

    pub fn get(&self, id: UserId) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

impl UserRepository for MockUserRepository {
    async fn save(&self, mut user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        match user.id {
            None => {
                let id = UserId::new();
                user.id = Some(id);
                user.version = 0;
                users.insert(id, user.clone());
            }
            Some(id) => {
                let stored = users
                    .get(&id)
                    .ok_or_else(|| RepositoryError::not_found("user", id))?;
                if stored.version != user.version {
                    return Err(RepositoryError::conflict("user", id));
                }
                user.version += 1;
                users.insert(id, user.clone());
            }
        }
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn delete(&self, user: &User) -> Result<(), RepositoryError> {
        if let Some(id) = user.id {
            self.users.lock().unwrap().remove(&id);
        }
        Ok(())
    }
}

/// Group store that keeps member lists exactly as submitted.
#[derive(Default)]
pub struct MockBalanceGroupRepository {
    groups: Mutex<HashMap<BalanceGroupId, BalanceGroup>>,
    fail_reads: AtomicBool,
}

impl MockBalanceGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a persisted group and returns its id.
    pub fn add_group(&self, name: &str, owner: UserId, members: Vec<UserId>) -> BalanceGroupId {
        let id = BalanceGroupId::new();
        let group = BalanceGroup {
            id: Some(id),
            name: name.to_string(),
            member_ids: members,
            expense_ids: Vec::new(),
            owner_id: owner,
            created_at: Utc::now(),
            updated_at: None,
            version: Some(0),
        };
        self.groups.lock().unwrap().insert(id, group);
        id
    }

    pub fn get(&self, id: BalanceGroupId) -> Option<BalanceGroup> {
        self.groups.lock().unwrap().get(&id).cloned()
    }

    pub fn remove(&self, id: BalanceGroupId) {
        self.groups.lock().unwrap().remove(&id);
    }

    /// Makes every read fail with a database error.
    pub fn break_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<(), RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::database("connection reset"));
        }
        Ok(())
    }
}

impl BalanceGroupRepository for MockBalanceGroupRepository {
    async fn save(&self, mut group: BalanceGroup) -> Result<BalanceGroup, RepositoryError> {
        let id = BalanceGroupId::new();
        group.id = Some(id);
        group.version = Some(0);
        self.groups.lock().unwrap().insert(id, group.clone());
        Ok(group)
    }

    async fn update(
        &self,
        id: BalanceGroupId,
        group: BalanceGroup,
    ) -> Result<BalanceGroup, RepositoryError> {
        let mut groups = self.groups.lock().unwrap();
        let stored = groups
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("balance group", id))?;
        let current = stored.version.unwrap_or_default();
        if group.version.is_some_and(|expected| expected != current) {
            return Err(RepositoryError::conflict("balance group", id));
        }
        stored.name = group.name;
        stored.member_ids = group.member_ids;
        stored.updated_at = group.updated_at;
        stored.version = Some(current + 1);
        Ok(stored.clone())
    }

    async fn get_by_id(&self, id: BalanceGroupId) -> Result<Option<BalanceGroup>, RepositoryError> {
        self.check_reads()?;
        Ok(self.groups.lock().unwrap().get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<BalanceGroup>, RepositoryError> {
        Ok(self.groups.lock().unwrap().values().cloned().collect())
    }

    async fn delete(&self, id: BalanceGroupId) -> Result<(), RepositoryError> {
        self.groups.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn get_all_where_user_is_group_member(
        &self,
        user_id: UserId,
    ) -> Result<Vec<BalanceGroup>, RepositoryError> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.member_ids.contains(&user_id))
            .cloned()
            .collect())
    }
}

/// Expense store keyed by id.
#[derive(Default)]
pub struct MockExpenseRepository {
    expenses: Mutex<HashMap<ExpenseId, Expense>>,
}

impl MockExpenseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a persisted expense and returns its id.
    pub fn add_expense(&self, group: BalanceGroupId, owner: UserId, amount: Decimal) -> ExpenseId {
        let id = ExpenseId::new();
        let expense = Expense {
            id: Some(id),
            name: "expense".to_string(),
            balance_group_id: group,
            owner_id: owner,
            amount,
            split_type: SplitType::Equally,
            created_at: Utc::now(),
            updated_at: None,
            version: Some(0),
        };
        self.expenses.lock().unwrap().insert(id, expense);
        id
    }

    pub fn get(&self, id: ExpenseId) -> Option<Expense> {
        self.expenses.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.expenses.lock().unwrap().len()
    }
}

impl ExpenseRepository for MockExpenseRepository {
    async fn save(&self, mut expense: Expense) -> Result<Expense, RepositoryError> {
        let id = ExpenseId::new();
        expense.id = Some(id);
        expense.version = Some(0);
        self.expenses.lock().unwrap().insert(id, expense.clone());
        Ok(expense)
    }

    async fn update(&self, id: ExpenseId, expense: Expense) -> Result<Expense, RepositoryError> {
        let mut expenses = self.expenses.lock().unwrap();
        let stored = expenses
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("expense", id))?;
        let current = stored.version.unwrap_or_default();
        if expense.version.is_some_and(|expected| expected != current) {
            return Err(RepositoryError::conflict("expense", id));
        }
        stored.name = expense.name;
        stored.amount = expense.amount;
        stored.split_type = expense.split_type;
        stored.updated_at = expense.updated_at;
        stored.version = Some(current + 1);
        Ok(stored.clone())
    }

    async fn get_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, RepositoryError> {
        Ok(self.expenses.lock().unwrap().get(&id).cloned())
    }

    async fn get_all_by_balance_group(
        &self,
        group_id: BalanceGroupId,
    ) -> Result<Vec<Expense>, RepositoryError> {
        let mut found: Vec<Expense> = self
            .expenses
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.balance_group_id == group_id)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.created_at);
        Ok(found)
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        self.expenses.lock().unwrap().remove(&id);
        Ok(())
    }
}

/// Encoder that prefixes instead of hashing and counts calls.
#[derive(Default)]
pub struct CountingEncoder {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl CountingEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let encoder = Self::default();
        encoder.fail.store(true, Ordering::SeqCst);
        encoder
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PasswordEncoder for CountingEncoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(PasswordError::HashError("no result".to_string()));
        }
        Ok(format!("encoded:{raw}"))
    }

    fn matches(&self, raw: &str, hash: &str) -> Result<bool, PasswordError> {
        Ok(hash == format!("encoded:{raw}"))
    }
}

/// Mailer that records recipients.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<String>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl EmailVerificationSender for RecordingMailer {
    async fn send_verification(&self, email: &str) {
        self.sent.lock().unwrap().push(email.to_string());
    }
}

/// Collects formatted log lines while installed as the thread's subscriber.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Installs a debug-level subscriber for the current thread.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
