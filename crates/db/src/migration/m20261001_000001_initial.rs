//! Initial database migration.
//!
//! Creates the enums, the account, group, membership and expense tables and the
//! indexes used by the membership and expense listings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(BALANCE_GROUPS_SQL).await?;
        db.execute_unprepared(BALANCE_GROUP_MEMBERS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('user', 'admin');

CREATE TYPE account_status AS ENUM ('active', 'inactive', 'blocked');

-- Only equal splits are supported for now
CREATE TYPE split_type AS ENUM ('EQUALLY');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    nickname VARCHAR(128),
    password_hash VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'user',
    is_email_verified BOOLEAN NOT NULL DEFAULT false,
    account_status account_status NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ,
    last_login_at TIMESTAMPTZ,
    version INTEGER NOT NULL DEFAULT 0
);
";

const BALANCE_GROUPS_SQL: &str = r"
CREATE TABLE balance_groups (
    id UUID PRIMARY KEY,
    name VARCHAR(128) NOT NULL,
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ,
    version INTEGER NOT NULL DEFAULT 0,

    CONSTRAINT chk_balance_group_name CHECK (btrim(name) <> '')
);

CREATE INDEX idx_balance_groups_owner ON balance_groups(owner_id);
";

const BALANCE_GROUP_MEMBERS_SQL: &str = r"
CREATE TABLE balance_group_members (
    balance_group_id UUID NOT NULL REFERENCES balance_groups(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,

    PRIMARY KEY (balance_group_id, user_id)
);

CREATE INDEX idx_balance_group_members_user ON balance_group_members(user_id);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    name VARCHAR(128) NOT NULL,
    balance_group_id UUID NOT NULL REFERENCES balance_groups(id) ON DELETE CASCADE,
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    amount NUMERIC(19, 4) NOT NULL,
    split_type split_type NOT NULL DEFAULT 'EQUALLY',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ,
    version INTEGER NOT NULL DEFAULT 0,

    CONSTRAINT chk_expense_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_expenses_group_created ON expenses(balance_group_id, created_at);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS balance_group_members CASCADE;
DROP TABLE IF EXISTS balance_groups CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS split_type;
DROP TYPE IF EXISTS account_status;
DROP TYPE IF EXISTS user_role;
";
