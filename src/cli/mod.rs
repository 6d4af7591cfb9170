//! Administrative commands behind `scholaris-cli`.

use anyhow::{Context, anyhow};
use tracing::info;

use scholaris_core::{Role, hash_password};
use scholaris_db::{PgStore, StoreError};
use scholaris_models::Account;

/// Input for [`create_account`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

/// Creates an active account with a bcrypt-hashed password and, for every
/// role except admin, the matching directory record.
pub async fn create_account(store: &PgStore, new: NewAccount) -> anyhow::Result<Account> {
    let password_hash = hash_password(&new.password).map_err(|e| e.error)?;

    let account = store
        .create_account(
            &new.email,
            &password_hash,
            new.role,
            &new.first_name,
            &new.last_name,
        )
        .await
        .map_err(|e| {
            if let StoreError::Database(sqlx::Error::Database(db_err)) = &e {
                if db_err.is_unique_violation() {
                    return anyhow!("Account with email {} already exists", new.email);
                }
            }
            anyhow::Error::new(e).context("Failed to create account")
        })?;

    info!(user_id = %account.id, role = %account.role, "Account created");
    Ok(account)
}

/// Hashes a password with the server's bcrypt cost.
pub fn hash_password_command(password: &str) -> anyhow::Result<String> {
    hash_password(password)
        .map_err(|e| e.error)
        .context("Failed to hash password")
}
