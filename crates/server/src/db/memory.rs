//! In-memory [`Store`] used by tests and local experiments.
//!
//! Mirrors the constraints the `PostgreSQL` schema enforces: unique
//! usernames, existing foreign keys, id-ordered listings.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use paddock_core::{
    AppointmentId, DocumentId, EntityKind, EntityRef, EventGroupId, HorseId, Role, StableId,
    TranslationId, UserId, Username,
};

use super::{RepositoryError, Store};
use crate::models::{
    Appointment, Document, DocumentWithUploader, EventGroup, Horse, HorsePatch, NewAppointment,
    NewDocument, NewHorse, NewUser, RoleInfo, Stable, Translation, User, UserPatch,
};

#[derive(Default)]
struct Tables {
    users: Vec<(User, String)>,
    horses: Vec<Horse>,
    stables: Vec<Stable>,
    event_groups: Vec<EventGroup>,
    appointments: Vec<Appointment>,
    documents: Vec<Document>,
    translations: Vec<Translation>,
    last_id: i32,
}

impl Tables {
    /// One sequence shared by all tables; ids only need to be unique per table.
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().map(|(user, _)| user).find(|u| u.id == id)
    }

    fn check_horse_refs(
        &self,
        owner_id: Option<UserId>,
        stable_id: Option<StableId>,
    ) -> Result<(), RepositoryError> {
        let owner_ok = owner_id.is_none_or(|id| self.user(id).is_some());
        let stable_ok = stable_id.is_none_or(|id| self.stables.iter().any(|s| s.id == id));
        if owner_ok && stable_ok {
            Ok(())
        } else {
            Err(RepositoryError::Conflict(
                "owner or stable does not exist".to_owned(),
            ))
        }
    }

    fn entity_exists(&self, entity: EntityRef) -> bool {
        match entity {
            EntityRef::User(id) => self.user(id).is_some(),
            EntityRef::Horse(id) => self.horses.iter().any(|h| h.id == id),
        }
    }
}

/// [`Store`] keeping every table in a `Vec` behind one lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stable box.
    pub async fn insert_stable(&self, number: &str, tenant: Option<UserId>) -> Stable {
        let mut tables = self.tables.write().await;
        let stable = Stable {
            id: StableId::new(tables.next_id()),
            number: number.to_owned(),
            occupied: tenant.is_some(),
            current_tenant_id: tenant,
        };
        tables.stables.push(stable.clone());
        stable
    }

    /// Add an event group.
    pub async fn insert_event_group(&self, name: &str, color: Option<&str>) -> EventGroup {
        let mut tables = self.tables.write().await;
        let group = EventGroup {
            id: EventGroupId::new(tables.next_id()),
            name: name.to_owned(),
            color: color.map(str::to_owned),
        };
        tables.event_groups.push(group.clone());
        group
    }

    /// Add a translated string.
    pub async fn insert_translation(&self, language: &str, key: &str, value: &str) -> Translation {
        let mut tables = self.tables.write().await;
        let translation = Translation {
            id: TranslationId::new(tables.next_id()),
            language: language.to_owned(),
            key: key.to_owned(),
            value: value.to_owned(),
        };
        tables.translations.push(translation.clone());
        translation
    }

    /// Number of stored document rows.
    pub async fn document_count(&self) -> usize {
        self.tables.read().await.documents.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn count_users(&self) -> Result<i64, RepositoryError> {
        let count = self.tables.read().await.users.len();
        i64::try_from(count).map_err(|e| RepositoryError::DataCorruption(e.to_string()))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|(existing, _)| existing.username == user.username)
        {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        let created = User {
            id: UserId::new(tables.next_id()),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            address: user.address,
            bank_account: user.bank_account,
            birth_date: user.birth_date,
            role_id: user.role.unwrap_or(if tables.users.is_empty() {
                Role::Admin
            } else {
                Role::Customer
            }),
            profile_image_url: None,
            language: user.language,
            created_at: Utc::now(),
        };
        tables.users.push((created.clone(), user.password_hash));
        Ok(created)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables.read().await.user(id).cloned())
    }

    async fn get_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .iter()
            .find(|(user, _)| &user.username == username)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .iter()
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        let (user, _) = tables
            .users
            .iter_mut()
            .find(|(user, _)| user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        patch.apply_to(user);
        Ok(user.clone())
    }

    async fn list_horses(&self) -> Result<Vec<Horse>, RepositoryError> {
        Ok(self.tables.read().await.horses.clone())
    }

    async fn get_horse(&self, id: HorseId) -> Result<Option<Horse>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .horses
            .iter()
            .find(|h| h.id == id)
            .cloned())
    }

    async fn create_horse(&self, horse: NewHorse) -> Result<Horse, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check_horse_refs(horse.owner_id, horse.stable_id)?;

        let created = Horse {
            id: HorseId::new(tables.next_id()),
            name: horse.name,
            age: horse.age,
            breed: horse.breed,
            height: horse.height,
            next_vet_appointment: horse.next_vet_appointment,
            profile_image_url: horse.profile_image_url,
            owner_id: horse.owner_id,
            stable_id: horse.stable_id,
        };
        tables.horses.push(created.clone());
        Ok(created)
    }

    async fn update_horse(
        &self,
        id: HorseId,
        patch: HorsePatch,
    ) -> Result<Horse, RepositoryError> {
        let mut tables = self.tables.write().await;
        let mut horse = tables
            .horses
            .iter()
            .find(|h| h.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;
        patch.apply_to(&mut horse);
        tables.check_horse_refs(horse.owner_id, horse.stable_id)?;

        if let Some(slot) = tables.horses.iter_mut().find(|h| h.id == id) {
            *slot = horse.clone();
        }
        Ok(horse)
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, RepositoryError> {
        Ok(self.tables.read().await.appointments.clone())
    }

    async fn create_appointment(
        &self,
        appointment: NewAppointment,
        created_by: UserId,
    ) -> Result<Appointment, RepositoryError> {
        let mut tables = self.tables.write().await;
        let refs_ok = tables.user(created_by).is_some()
            && appointment
                .horse_id
                .is_none_or(|id| tables.horses.iter().any(|h| h.id == id))
            && appointment
                .assigned_to_id
                .is_none_or(|id| tables.user(id).is_some())
            && appointment
                .event_group_id
                .is_none_or(|id| tables.event_groups.iter().any(|g| g.id == id));
        if !refs_ok {
            return Err(RepositoryError::Conflict(
                "referenced record does not exist".to_owned(),
            ));
        }

        let created = Appointment {
            id: AppointmentId::new(tables.next_id()),
            title: appointment.title,
            description: appointment.description,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            horse_id: appointment.horse_id,
            assigned_to_id: appointment.assigned_to_id,
            created_by_id: created_by,
            event_group_id: appointment.event_group_id,
            recurrence: appointment.recurrence,
        };
        tables.appointments.push(created.clone());
        Ok(created)
    }

    async fn entity_exists(&self, entity: EntityRef) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.entity_exists(entity))
    }

    async fn list_documents(
        &self,
        entity: EntityRef,
    ) -> Result<Vec<DocumentWithUploader>, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .documents
            .iter()
            .filter(|doc| doc.entity == entity)
            .map(|doc| {
                let uploader = tables.user(doc.uploaded_by_id).ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "document {} has no uploader",
                        doc.id
                    ))
                })?;
                Ok(DocumentWithUploader {
                    document: doc.clone(),
                    uploaded_by: uploader.summary(),
                })
            })
            .collect()
    }

    async fn list_documents_of_kind(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<Document>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .documents
            .iter()
            .filter(|doc| doc.entity.kind() == kind)
            .cloned()
            .collect())
    }

    async fn create_document(&self, document: NewDocument) -> Result<Document, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.user(document.uploaded_by_id).is_none() {
            return Err(RepositoryError::Conflict(
                "uploader does not exist".to_owned(),
            ));
        }

        let created = Document {
            id: DocumentId::new(tables.next_id()),
            title: document.title,
            file_url: document.file_url,
            document_type: document.document_type,
            uploaded_at: Utc::now(),
            entity: document.entity,
            uploaded_by_id: document.uploaded_by_id,
        };
        tables.documents.push(created.clone());
        Ok(created)
    }

    async fn list_roles(&self) -> Result<Vec<RoleInfo>, RepositoryError> {
        Ok(Role::ALL.into_iter().map(RoleInfo::from).collect())
    }

    async fn list_stables(&self) -> Result<Vec<Stable>, RepositoryError> {
        Ok(self.tables.read().await.stables.clone())
    }

    async fn list_event_groups(&self) -> Result<Vec<EventGroup>, RepositoryError> {
        Ok(self.tables.read().await.event_groups.clone())
    }

    async fn list_translations(&self, language: &str) -> Result<Vec<Translation>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .translations
            .iter()
            .filter(|t| t.language == language)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use paddock_core::DocumentType;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: Username::parse(username).unwrap(),
            password_hash: "hash".to_owned(),
            first_name: "Anna".to_owned(),
            last_name: "Meyer".to_owned(),
            address: "Hofweg 1".to_owned(),
            bank_account: "DE00 0000".to_owned(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            role: Some(Role::Customer),
            language: "de".to_owned(),
        }
    }

    fn new_horse(owner: Option<UserId>) -> NewHorse {
        NewHorse {
            name: "Blitz".to_owned(),
            age: 9,
            breed: "Hanoverian".to_owned(),
            height: 168,
            next_vet_appointment: None,
            profile_image_url: None,
            owner_id: owner,
            stable_id: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.create_user(new_user("anna")).await.unwrap();
        let err = store.create_user(new_user("anna")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_horse_with_unknown_owner_conflicts() {
        let store = MemoryStore::new();
        let err = store
            .create_horse(new_horse(Some(UserId::new(99))))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(store.list_horses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_horse_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_horse(HorseId::new(1), HorsePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_documents_are_scoped_to_their_entity() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("anna")).await.unwrap();
        let horse = store.create_horse(new_horse(Some(user.id))).await.unwrap();

        for entity in [EntityRef::Horse(horse.id), EntityRef::User(user.id)] {
            store
                .create_document(NewDocument {
                    title: "Rechnung".to_owned(),
                    document_type: DocumentType::Invoice,
                    file_url: "/uploads/documents/1-2.pdf".to_owned(),
                    entity,
                    uploaded_by_id: user.id,
                })
                .await
                .unwrap();
        }

        let horse_docs = store
            .list_documents(EntityRef::Horse(horse.id))
            .await
            .unwrap();
        assert_eq!(horse_docs.len(), 1);
        assert_eq!(horse_docs[0].uploaded_by.username.as_str(), "anna");
        assert_eq!(
            store
                .list_documents_of_kind(EntityKind::User)
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(
            !store
                .entity_exists(EntityRef::Horse(HorseId::new(999)))
                .await
                .unwrap()
        );
    }
}
