//! Storage layer.
//!
//! # Tables
//!
//! - `roles` - Fixed lookup (`Admin`, `Staff`, `Customer`)
//! - `users` - Accounts and profile data
//! - `stables` - Numbered boxes and their current tenant
//! - `horses` - Horse records (owner, box, vet date)
//! - `event_groups` - Calendar categories
//! - `appointments` - Calendar entries
//! - `documents` - Uploaded file metadata with a polymorphic owner
//! - `translations` - UI strings per language
//!
//! Handlers talk to the [`Store`] trait. [`PgStore`] is the production
//! implementation; [`MemoryStore`] backs the HTTP tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p paddock-cli -- migrate
//! ```

pub mod appointments;
pub mod documents;
pub mod horses;
pub mod lookups;
pub mod memory;
pub mod postgres;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use paddock_core::{EntityKind, EntityRef, HorseId, UserId, Username};

use crate::models::{
    Appointment, Document, DocumentWithUploader, EventGroup, Horse, HorsePatch, NewAppointment,
    NewDocument, NewHorse, NewUser, RoleInfo, Stable, Translation, User, UserPatch,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence operations used by the HTTP handlers.
///
/// List operations return rows in insertion (id) order.
#[async_trait]
pub trait Store: Send + Sync {
    /// Check that the backing database answers.
    async fn ping(&self) -> Result<(), RepositoryError>;

    // Users

    /// Number of registered users.
    async fn count_users(&self) -> Result<i64, RepositoryError>;

    /// Insert a user. Fails with `Conflict` if the username is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Look up a user together with their password hash (login only).
    async fn get_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    /// Apply a partial update. Fails with `NotFound` if the user is absent.
    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, RepositoryError>;

    // Horses

    async fn list_horses(&self) -> Result<Vec<Horse>, RepositoryError>;

    async fn get_horse(&self, id: HorseId) -> Result<Option<Horse>, RepositoryError>;

    async fn create_horse(&self, horse: NewHorse) -> Result<Horse, RepositoryError>;

    /// Apply a partial update. Fails with `NotFound` if the horse is absent.
    async fn update_horse(&self, id: HorseId, patch: HorsePatch)
    -> Result<Horse, RepositoryError>;

    // Appointments

    async fn list_appointments(&self) -> Result<Vec<Appointment>, RepositoryError>;

    async fn create_appointment(
        &self,
        appointment: NewAppointment,
        created_by: UserId,
    ) -> Result<Appointment, RepositoryError>;

    // Documents

    /// Whether the referenced user or horse exists.
    async fn entity_exists(&self, entity: EntityRef) -> Result<bool, RepositoryError>;

    /// Documents attached to one entity, each with its uploader.
    async fn list_documents(
        &self,
        entity: EntityRef,
    ) -> Result<Vec<DocumentWithUploader>, RepositoryError>;

    /// Documents attached to any entity of the given kind.
    async fn list_documents_of_kind(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<Document>, RepositoryError>;

    async fn create_document(&self, document: NewDocument) -> Result<Document, RepositoryError>;

    // Lookups

    async fn list_roles(&self) -> Result<Vec<RoleInfo>, RepositoryError>;

    async fn list_stables(&self) -> Result<Vec<Stable>, RepositoryError>;

    async fn list_event_groups(&self) -> Result<Vec<EventGroup>, RepositoryError>;

    async fn list_translations(&self, language: &str) -> Result<Vec<Translation>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-violation into `Conflict`, anything else into `Database`.
pub(crate) fn map_unique_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

/// Map a foreign-key violation into `Conflict`, anything else into `Database`.
pub(crate) fn map_foreign_key_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
