//! User repository for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use paddock_core::{Role, UserId, Username};

use super::{RepositoryError, map_unique_violation};
use crate::models::{NewUser, User, UserPatch};

/// Advisory lock key held while an insert decides the first account's role.
const FIRST_ACCOUNT_LOCK: i64 = 0x7061_6464_6f63_6b01;

const USER_COLUMNS: &str = "id, username, first_name, last_name, address, bank_account, \
     birth_date, role_id, profile_image_url, language, created_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    first_name: String,
    last_name: String,
    address: String,
    bank_account: String,
    birth_date: NaiveDate,
    role_id: i32,
    profile_image_url: Option<String>,
    language: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let role = Role::try_from(row.role_id).map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: UserId::new(row.id),
            username,
            first_name: row.first_name,
            last_name: row.last_name,
            address: row.address,
            bank_account: row.bank_account,
            birth_date: row.birth_date,
            role_id: role,
            profile_image_url: row.profile_image_url,
            language: row.language,
            created_at: row.created_at,
        })
    }
}

/// Row with the password hash, read only by the login path.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count all users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// List all users in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user and their password hash by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<CredentialRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = $1"
        ))
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some((User::try_from(row.user)?, row.password_hash)))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent registrations so only one can see an empty table.
        if user.role.is_none() {
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(FIRST_ACCOUNT_LOCK)
                .execute(&mut *tx)
                .await?;
        }

        let row: UserRow = sqlx::query_as(&format!(
            r"
            INSERT INTO users (username, password_hash, first_name, last_name, address,
                               bank_account, birth_date, role_id, language)
            VALUES ($1, $2, $3, $4, $5, $6, $7,
                    COALESCE($8, CASE WHEN EXISTS (SELECT 1 FROM users) THEN $10 ELSE $11 END),
                    $9)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.address)
        .bind(&user.bank_account)
        .bind(user.birth_date)
        .bind(user.role.map(Role::id))
        .bind(&user.language)
        .bind(Role::Customer.id())
        .bind(Role::Admin.id())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "username already exists"))?;

        tx.commit().await?;
        row.try_into()
    }

    /// Apply a partial update inside a transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this ID.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let mut user: User = row.ok_or(RepositoryError::NotFound)?.try_into()?;

        patch.apply_to(&mut user);

        let row: UserRow = sqlx::query_as(&format!(
            r"
            UPDATE users
            SET first_name = $2, last_name = $3, address = $4, bank_account = $5,
                birth_date = $6, role_id = $7, profile_image_url = $8, language = $9
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.address)
        .bind(&user.bank_account)
        .bind(user.birth_date)
        .bind(user.role_id.id())
        .bind(&user.profile_image_url)
        .bind(&user.language)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.try_into()
    }
}
