//! Lookup tables: roles, stables, event groups and translations.

use serde::Serialize;

use paddock_core::{EventGroupId, Role, StableId, TranslationId, UserId};

/// Row of the `roles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleInfo {
    pub id: i32,
    pub name: String,
}

impl From<Role> for RoleInfo {
    fn from(role: Role) -> Self {
        Self {
            id: role.id(),
            name: role.name().to_owned(),
        }
    }
}

/// A numbered box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stable {
    pub id: StableId,
    pub number: String,
    pub occupied: bool,
    pub current_tenant_id: Option<UserId>,
}

/// Calendar category for appointments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventGroup {
    pub id: EventGroupId,
    pub name: String,
    /// CSS color used by the calendar.
    pub color: Option<String>,
}

/// One UI string in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub id: TranslationId,
    pub language: String,
    pub key: String,
    pub value: String,
}
