//! User provisioning.
//!
//! # Usage
//!
//! ```bash
//! PADDOCK_NEW_USER_PASSWORD=... paddock-cli user create -u stallmeister \
//!     --first-name Greta --last-name Vogel --birth-date 1979-04-02 -r staff
//! ```

use chrono::NaiveDate;

use paddock_core::Role;
use paddock_server::db::PgStore;
use paddock_server::services::{AuthService, Registration};

use super::{CommandError, connect};

/// Account details for [`create`].
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub bank_account: String,
    pub birth_date: String,
    pub role: String,
    pub language: Option<String>,
}

/// Create a user with an explicit role.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `CommandError` for an unknown role, a malformed date, an invalid
/// username or password, a taken username, or a database failure.
pub async fn create(account: NewAccount) -> Result<i32, CommandError> {
    let role: Role = account
        .role
        .parse()
        .map_err(|_| CommandError::InvalidRole(account.role.clone()))?;
    let birth_date = NaiveDate::parse_from_str(&account.birth_date, "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidDate(account.birth_date.clone()))?;

    let store = PgStore::new(connect().await?);
    let user = AuthService::new(&store)
        .register(Registration {
            username: account.username,
            password: account.password,
            first_name: account.first_name,
            last_name: account.last_name,
            address: account.address,
            bank_account: account.bank_account,
            birth_date,
            language: account.language,
            role: Some(role),
        })
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}, Role: {}",
        user.id,
        user.username,
        role.name()
    );
    Ok(user.id.as_i32())
}
