//! `PostgreSQL`-backed [`Store`].

use async_trait::async_trait;
use sqlx::PgPool;

use paddock_core::{EntityKind, EntityRef, HorseId, UserId, Username};

use super::appointments::AppointmentRepository;
use super::documents::DocumentRepository;
use super::horses::HorseRepository;
use super::lookups::LookupRepository;
use super::users::UserRepository;
use super::{RepositoryError, Store};
use crate::models::{
    Appointment, Document, DocumentWithUploader, EventGroup, Horse, HorsePatch, NewAppointment,
    NewDocument, NewHorse, NewUser, RoleInfo, Stable, Translation, User, UserPatch,
};

/// Production store delegating to the per-table repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn count_users(&self) -> Result<i64, RepositoryError> {
        UserRepository::new(&self.pool).count().await
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        UserRepository::new(&self.pool).create(&user).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        UserRepository::new(&self.pool).get_by_id(id).await
    }

    async fn get_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        UserRepository::new(&self.pool)
            .get_credentials(username)
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        UserRepository::new(&self.pool).list_all().await
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        UserRepository::new(&self.pool).update(id, patch).await
    }

    async fn list_horses(&self) -> Result<Vec<Horse>, RepositoryError> {
        HorseRepository::new(&self.pool).list_all().await
    }

    async fn get_horse(&self, id: HorseId) -> Result<Option<Horse>, RepositoryError> {
        HorseRepository::new(&self.pool).get_by_id(id).await
    }

    async fn create_horse(&self, horse: NewHorse) -> Result<Horse, RepositoryError> {
        HorseRepository::new(&self.pool).create(&horse).await
    }

    async fn update_horse(
        &self,
        id: HorseId,
        patch: HorsePatch,
    ) -> Result<Horse, RepositoryError> {
        HorseRepository::new(&self.pool).update(id, patch).await
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, RepositoryError> {
        AppointmentRepository::new(&self.pool).list_all().await
    }

    async fn create_appointment(
        &self,
        appointment: NewAppointment,
        created_by: UserId,
    ) -> Result<Appointment, RepositoryError> {
        AppointmentRepository::new(&self.pool)
            .create(&appointment, created_by)
            .await
    }

    async fn entity_exists(&self, entity: EntityRef) -> Result<bool, RepositoryError> {
        DocumentRepository::new(&self.pool)
            .entity_exists(entity)
            .await
    }

    async fn list_documents(
        &self,
        entity: EntityRef,
    ) -> Result<Vec<DocumentWithUploader>, RepositoryError> {
        DocumentRepository::new(&self.pool)
            .list_for_entity(entity)
            .await
    }

    async fn list_documents_of_kind(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<Document>, RepositoryError> {
        DocumentRepository::new(&self.pool).list_for_kind(kind).await
    }

    async fn create_document(&self, document: NewDocument) -> Result<Document, RepositoryError> {
        DocumentRepository::new(&self.pool).create(&document).await
    }

    async fn list_roles(&self) -> Result<Vec<RoleInfo>, RepositoryError> {
        LookupRepository::new(&self.pool).roles().await
    }

    async fn list_stables(&self) -> Result<Vec<Stable>, RepositoryError> {
        LookupRepository::new(&self.pool).stables().await
    }

    async fn list_event_groups(&self) -> Result<Vec<EventGroup>, RepositoryError> {
        LookupRepository::new(&self.pool).event_groups().await
    }

    async fn list_translations(&self, language: &str) -> Result<Vec<Translation>, RepositoryError> {
        LookupRepository::new(&self.pool)
            .translations(language)
            .await
    }
}
