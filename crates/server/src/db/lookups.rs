//! Read-only lookup tables: roles, stables, event groups, translations.

use sqlx::PgPool;

use paddock_core::{EventGroupId, StableId, TranslationId, UserId};

use super::RepositoryError;
use crate::models::{EventGroup, RoleInfo, Stable, Translation};

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: i32,
    name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct StableRow {
    id: StableId,
    number: String,
    occupied: bool,
    current_tenant_id: Option<UserId>,
}

#[derive(Debug, sqlx::FromRow)]
struct EventGroupRow {
    id: EventGroupId,
    name: String,
    color: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct TranslationRow {
    id: TranslationId,
    language: String,
    key: String,
    value: String,
}

/// Repository for the lookup tables.
pub struct LookupRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LookupRepository<'a> {
    /// Create a new lookup repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn roles(&self) -> Result<Vec<RoleInfo>, RepositoryError> {
        let rows: Vec<RoleRow> = sqlx::query_as("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| RoleInfo {
                id: row.id,
                name: row.name,
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stables(&self) -> Result<Vec<Stable>, RepositoryError> {
        let rows: Vec<StableRow> = sqlx::query_as(
            "SELECT id, number, occupied, current_tenant_id FROM stables ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Stable {
                id: row.id,
                number: row.number,
                occupied: row.occupied,
                current_tenant_id: row.current_tenant_id,
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn event_groups(&self) -> Result<Vec<EventGroup>, RepositoryError> {
        let rows: Vec<EventGroupRow> =
            sqlx::query_as("SELECT id, name, color FROM event_groups ORDER BY id")
                .fetch_all(self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|row| EventGroup {
                id: row.id,
                name: row.name,
                color: row.color,
            })
            .collect())
    }

    /// All strings for one language code (e.g. `de`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn translations(&self, language: &str) -> Result<Vec<Translation>, RepositoryError> {
        let rows: Vec<TranslationRow> = sqlx::query_as(
            "SELECT id, language, key, value FROM translations WHERE language = $1 ORDER BY id",
        )
        .bind(language)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Translation {
                id: row.id,
                language: row.language,
                key: row.key,
                value: row.value,
            })
            .collect())
    }
}
