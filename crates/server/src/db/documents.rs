//! Document repository for database operations.
//!
//! `documents.entity_type`/`entity_id` has no foreign key. Callers check
//! [`DocumentRepository::entity_exists`] before inserting.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use paddock_core::{DocumentId, EntityKind, EntityRef, UserId, Username};

use super::RepositoryError;
use crate::models::{Document, DocumentWithUploader, NewDocument, UserSummary};

const DOCUMENT_COLUMNS: &str =
    "id, title, file_url, document_type, uploaded_at, entity_type, entity_id, uploaded_by_id";

/// Internal row type for `PostgreSQL` document queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: DocumentId,
    title: String,
    file_url: String,
    document_type: String,
    uploaded_at: DateTime<Utc>,
    entity_type: String,
    entity_id: i32,
    uploaded_by_id: UserId,
}

impl TryFrom<DocumentRow> for Document {
    type Error = RepositoryError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let document_type = row
            .document_type
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("{e}")))?;
        let kind: EntityKind = row
            .entity_type
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("{e}")))?;

        Ok(Self {
            id: row.id,
            title: row.title,
            file_url: row.file_url,
            document_type,
            uploaded_at: row.uploaded_at,
            entity: EntityRef::new(kind, row.entity_id),
            uploaded_by_id: row.uploaded_by_id,
        })
    }
}

/// Document row joined with the uploader's identity columns.
#[derive(Debug, sqlx::FromRow)]
struct DocumentWithUploaderRow {
    #[sqlx(flatten)]
    document: DocumentRow,
    uploader_username: String,
    uploader_first_name: String,
    uploader_last_name: String,
}

impl TryFrom<DocumentWithUploaderRow> for DocumentWithUploader {
    type Error = RepositoryError;

    fn try_from(row: DocumentWithUploaderRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.uploader_username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let document = Document::try_from(row.document)?;

        Ok(Self {
            uploaded_by: UserSummary {
                id: document.uploaded_by_id,
                username,
                first_name: row.uploader_first_name,
                last_name: row.uploader_last_name,
            },
            document,
        })
    }
}

/// Repository for document database operations.
pub struct DocumentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DocumentRepository<'a> {
    /// Create a new document repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether the row an [`EntityRef`] points at exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn entity_exists(&self, entity: EntityRef) -> Result<bool, RepositoryError> {
        let sql = match entity.kind() {
            EntityKind::User => "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)",
            EntityKind::Horse => "SELECT EXISTS (SELECT 1 FROM horses WHERE id = $1)",
        };
        let exists: bool = sqlx::query_scalar(sql)
            .bind(entity.raw_id())
            .fetch_one(self.pool)
            .await?;
        Ok(exists)
    }

    /// List the documents of one entity with their uploader, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn list_for_entity(
        &self,
        entity: EntityRef,
    ) -> Result<Vec<DocumentWithUploader>, RepositoryError> {
        let rows: Vec<DocumentWithUploaderRow> = sqlx::query_as(
            r"
            SELECT d.id, d.title, d.file_url, d.document_type, d.uploaded_at,
                   d.entity_type, d.entity_id, d.uploaded_by_id,
                   u.username AS uploader_username,
                   u.first_name AS uploader_first_name,
                   u.last_name AS uploader_last_name
            FROM documents d
            JOIN users u ON u.id = d.uploaded_by_id
            WHERE d.entity_type = $1 AND d.entity_id = $2
            ORDER BY d.id
            ",
        )
        .bind(entity.kind().as_str())
        .bind(entity.raw_id())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List all documents attached to entities of one kind, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn list_for_kind(&self, kind: EntityKind) -> Result<Vec<Document>, RepositoryError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE entity_type = $1 ORDER BY id"
        ))
        .bind(kind.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Insert a document row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, document: &NewDocument) -> Result<Document, RepositoryError> {
        let row: DocumentRow = sqlx::query_as(&format!(
            r"
            INSERT INTO documents (title, file_url, document_type, entity_type, entity_id,
                                   uploaded_by_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {DOCUMENT_COLUMNS}
            "
        ))
        .bind(&document.title)
        .bind(&document.file_url)
        .bind(document.document_type.as_str())
        .bind(document.entity.kind().as_str())
        .bind(document.entity.raw_id())
        .bind(document.uploaded_by_id)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }
}
