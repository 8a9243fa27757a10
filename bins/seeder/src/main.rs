//! Administrator seeder for Kitty.
//!
//! Registration only ever creates regular accounts. This binary creates the
//! account named by `KITTY_ADMIN_EMAIL` with the admin role, or promotes it when
//! it already exists.
//!
//! Usage: `KITTY_ADMIN_EMAIL=.. KITTY_ADMIN_PASSWORD=.. cargo run --bin seeder`

use anyhow::Context;
use chrono::Utc;

use kitty_core::auth::{AccountStatus, UserRole, hash_password};
use kitty_core::user::{User, UserRepository as _, validate_password};
use kitty_db::UserRepository;
use kitty_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let email = std::env::var("KITTY_ADMIN_EMAIL").context("KITTY_ADMIN_EMAIL must be set")?;
    let password =
        std::env::var("KITTY_ADMIN_PASSWORD").context("KITTY_ADMIN_PASSWORD must be set")?;
    validate_password(&password)?;

    let config = AppConfig::load()?;
    println!("Connecting to database...");
    let db = kitty_db::connect(&config.database.url).await?;
    let users = UserRepository::new(db);

    match users.find_by_email(&email).await? {
        Some(user) if user.is_admin() && user.can_log_in() => {
            println!("  {email} is already an active admin, skipping...");
        }
        Some(mut user) => {
            user.role = UserRole::Admin;
            user.account_status = AccountStatus::Active;
            user.updated_at = Some(Utc::now());
            users.save(user).await?;
            println!("  Promoted {email} to admin");
        }
        None => {
            let admin = User {
                id: None,
                email: email.clone(),
                nickname: Some("admin".to_string()),
                password_hash: hash_password(&password)?,
                role: UserRole::Admin,
                is_email_verified: true,
                account_status: AccountStatus::Active,
                created_at: Utc::now(),
                updated_at: None,
                last_login_at: None,
                version: 0,
            };
            let saved = users.save(admin).await?;
            println!("  Created admin {email} ({:?})", saved.id);
        }
    }

    println!("Seeding complete!");
    Ok(())
}
