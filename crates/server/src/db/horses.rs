//! Horse repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;

use paddock_core::{HorseId, StableId, UserId};

use super::{RepositoryError, map_foreign_key_violation};
use crate::models::{Horse, HorsePatch, NewHorse};

const HORSE_COLUMNS: &str =
    "id, name, age, breed, height, next_vet_appointment, profile_image_url, owner_id, stable_id";

const DANGLING_REFERENCE: &str = "owner or stable does not exist";

/// Internal row type for `PostgreSQL` horse queries.
#[derive(Debug, sqlx::FromRow)]
struct HorseRow {
    id: HorseId,
    name: String,
    age: i32,
    breed: String,
    height: i32,
    next_vet_appointment: Option<NaiveDate>,
    profile_image_url: Option<String>,
    owner_id: Option<UserId>,
    stable_id: Option<StableId>,
}

impl From<HorseRow> for Horse {
    fn from(row: HorseRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            age: row.age,
            breed: row.breed,
            height: row.height,
            next_vet_appointment: row.next_vet_appointment,
            profile_image_url: row.profile_image_url,
            owner_id: row.owner_id,
            stable_id: row.stable_id,
        }
    }
}

/// Repository for horse database operations.
pub struct HorseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HorseRepository<'a> {
    /// Create a new horse repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all horses in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Horse>, RepositoryError> {
        let rows: Vec<HorseRow> =
            sqlx::query_as(&format!("SELECT {HORSE_COLUMNS} FROM horses ORDER BY id"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(Horse::from).collect())
    }

    /// Get a horse by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: HorseId) -> Result<Option<Horse>, RepositoryError> {
        let row: Option<HorseRow> =
            sqlx::query_as(&format!("SELECT {HORSE_COLUMNS} FROM horses WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Horse::from))
    }

    /// Insert a horse.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if `owner_id` or `stable_id` is dangling.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, horse: &NewHorse) -> Result<Horse, RepositoryError> {
        let row: HorseRow = sqlx::query_as(&format!(
            r"
            INSERT INTO horses (name, age, breed, height, next_vet_appointment,
                                profile_image_url, owner_id, stable_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {HORSE_COLUMNS}
            "
        ))
        .bind(&horse.name)
        .bind(horse.age)
        .bind(&horse.breed)
        .bind(horse.height)
        .bind(horse.next_vet_appointment)
        .bind(&horse.profile_image_url)
        .bind(horse.owner_id)
        .bind(horse.stable_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, DANGLING_REFERENCE))?;

        Ok(row.into())
    }

    /// Apply a partial update inside a transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no horse has this ID.
    /// Returns `RepositoryError::Conflict` if `owner_id` or `stable_id` is dangling.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: HorseId, patch: HorsePatch) -> Result<Horse, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<HorseRow> = sqlx::query_as(&format!(
            "SELECT {HORSE_COLUMNS} FROM horses WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let mut horse = Horse::from(row.ok_or(RepositoryError::NotFound)?);

        patch.apply_to(&mut horse);

        let row: HorseRow = sqlx::query_as(&format!(
            r"
            UPDATE horses
            SET name = $2, age = $3, breed = $4, height = $5, next_vet_appointment = $6,
                profile_image_url = $7, owner_id = $8, stable_id = $9
            WHERE id = $1
            RETURNING {HORSE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&horse.name)
        .bind(horse.age)
        .bind(&horse.breed)
        .bind(horse.height)
        .bind(horse.next_vet_appointment)
        .bind(&horse.profile_image_url)
        .bind(horse.owner_id)
        .bind(horse.stable_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_foreign_key_violation(e, DANGLING_REFERENCE))?;

        tx.commit().await?;

        Ok(row.into())
    }
}
