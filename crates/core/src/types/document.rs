//! Document classification and the polymorphic document owner.
//!
//! A document is attached to exactly one entity, either a user or a horse.
//! In storage this is a `(entity_type, entity_id)` pair with no foreign key,
//! so at the application boundary it is represented as [`EntityRef`], which
//! cannot name any other table.

use serde::{Deserialize, Serialize};

use super::id::{HorseId, UserId};

/// Error returned when a string does not name a known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Kind of uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// An invoice.
    Invoice,
    /// Anything else (certificates, photos, contracts).
    Other,
}

impl DocumentType {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoice" => Ok(Self::Invoice),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError::new("document type", s)),
        }
    }
}

/// Table a document owner lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// The `users` table.
    User,
    /// The `horses` table.
    Horse,
}

impl EntityKind {
    /// Storage representation of the `entity_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Horse => "horse",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "horse" => Ok(Self::Horse),
            _ => Err(ParseEnumError::new("entity type", s)),
        }
    }
}

/// Reference to the entity a document belongs to.
///
/// Serializes as the two flat fields the API and the `documents` table use:
///
/// ```
/// use paddock_core::{EntityRef, HorseId};
///
/// let owner = EntityRef::Horse(HorseId::new(42));
/// let json = serde_json::to_value(owner).unwrap();
/// assert_eq!(json, serde_json::json!({"entity_type": "horse", "entity_id": 42}));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "entity_type", content = "entity_id", rename_all = "snake_case")]
pub enum EntityRef {
    /// Attached to a user profile.
    User(UserId),
    /// Attached to a horse record.
    Horse(HorseId),
}

impl EntityRef {
    /// Build a reference from its stored parts.
    #[must_use]
    pub const fn new(kind: EntityKind, id: i32) -> Self {
        match kind {
            EntityKind::User => Self::User(UserId::new(id)),
            EntityKind::Horse => Self::Horse(HorseId::new(id)),
        }
    }

    /// The `entity_type` part.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::User(_) => EntityKind::User,
            Self::Horse(_) => EntityKind::Horse,
        }
    }

    /// The `entity_id` part.
    #[must_use]
    pub const fn raw_id(self) -> i32 {
        match self {
            Self::User(id) => id.as_i32(),
            Self::Horse(id) => id.as_i32(),
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.raw_id())
    }
}
