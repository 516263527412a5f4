//! Document domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use paddock_core::{DocumentId, DocumentType, EntityRef, UserId};

use super::user::UserSummary;

/// Metadata of an uploaded file attached to a user or horse.
///
/// `file_url` points at the stored file (see [`crate::services::uploads`]);
/// the row does not own the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub file_url: String,
    pub document_type: DocumentType,
    pub uploaded_at: DateTime<Utc>,
    /// Serialized as `entity_type` + `entity_id`.
    #[serde(flatten)]
    pub entity: EntityRef,
    pub uploaded_by_id: UserId,
}

/// Data needed to insert a document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub document_type: DocumentType,
    pub file_url: String,
    pub entity: EntityRef,
    pub uploaded_by_id: UserId,
}

/// A document joined with the identity of the user who uploaded it.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentWithUploader {
    #[serde(flatten)]
    pub document: Document,
    pub uploaded_by: UserSummary,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use paddock_core::{HorseId, Username};

    use super::*;

    #[test]
    fn test_document_serializes_flat_entity_reference() {
        let doc = Document {
            id: DocumentId::new(1),
            title: "Hufschmied März".to_owned(),
            file_url: "/uploads/documents/1-2.pdf".to_owned(),
            document_type: DocumentType::Invoice,
            uploaded_at: DateTime::<Utc>::UNIX_EPOCH,
            entity: EntityRef::Horse(HorseId::new(42)),
            uploaded_by_id: UserId::new(7),
        };
        let with_uploader = DocumentWithUploader {
            document: doc,
            uploaded_by: UserSummary {
                id: UserId::new(7),
                username: Username::parse("anna").unwrap(),
                first_name: "Anna".to_owned(),
                last_name: "Meyer".to_owned(),
            },
        };

        let json = serde_json::to_value(&with_uploader).unwrap();
        assert_eq!(json["entity_type"], "horse");
        assert_eq!(json["entity_id"], 42);
        assert_eq!(json["document_type"], "invoice");
        assert_eq!(json["uploaded_by_id"], 7);
        assert_eq!(json["uploaded_by"]["username"], "anna");
    }
}
