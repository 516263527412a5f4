//! Horse domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use paddock_core::{HorseId, StableId, UserId};

use super::document::Document;
use super::lookup::Stable;
use super::patch::{apply, double_option};
use super::user::{User, UserSummary};

/// A horse boarded at the stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Horse {
    pub id: HorseId,
    pub name: String,
    pub age: i32,
    pub breed: String,
    /// Height at the withers in cm.
    pub height: i32,
    pub next_vet_appointment: Option<NaiveDate>,
    pub profile_image_url: Option<String>,
    pub owner_id: Option<UserId>,
    pub stable_id: Option<StableId>,
}

/// Request body for creating a horse.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHorse {
    pub name: String,
    pub age: i32,
    pub breed: String,
    pub height: i32,
    #[serde(default)]
    pub next_vet_appointment: Option<NaiveDate>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub stable_id: Option<StableId>,
}

/// Partial update of a horse. Absent fields are left unchanged; `null`
/// clears the nullable ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HorsePatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub breed: Option<String>,
    pub height: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub next_vet_appointment: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub profile_image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub owner_id: Option<Option<UserId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub stable_id: Option<Option<StableId>>,
}

impl HorsePatch {
    /// Apply the present fields to `horse`.
    pub fn apply_to(self, horse: &mut Horse) {
        apply(&mut horse.name, self.name);
        apply(&mut horse.age, self.age);
        apply(&mut horse.breed, self.breed);
        apply(&mut horse.height, self.height);
        apply(&mut horse.next_vet_appointment, self.next_vet_appointment);
        apply(&mut horse.profile_image_url, self.profile_image_url);
        apply(&mut horse.owner_id, self.owner_id);
        apply(&mut horse.stable_id, self.stable_id);
    }
}

/// A horse with its owner, box and attached documents.
#[derive(Debug, Clone, Serialize)]
pub struct HorseWithRelations {
    #[serde(flatten)]
    pub horse: Horse,
    pub owner: Option<UserSummary>,
    pub stable: Option<Stable>,
    pub documents: Vec<Document>,
}

impl HorseWithRelations {
    /// Join horses with owners, stables and horse documents.
    ///
    /// `documents` may contain documents of any entity; only those attached
    /// to each horse are kept.
    #[must_use]
    pub fn assemble(
        horses: Vec<Horse>,
        users: &[User],
        stables: &[Stable],
        documents: &[Document],
    ) -> Vec<Self> {
        horses
            .into_iter()
            .map(|horse| {
                let owner = horse
                    .owner_id
                    .and_then(|id| users.iter().find(|user| user.id == id))
                    .map(User::summary);
                let stable = horse
                    .stable_id
                    .and_then(|id| stables.iter().find(|stable| stable.id == id))
                    .cloned();
                let documents = documents
                    .iter()
                    .filter(|doc| doc.entity == paddock_core::EntityRef::Horse(horse.id))
                    .cloned()
                    .collect();
                Self {
                    horse,
                    owner,
                    stable,
                    documents,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_horse(id: i32, owner: Option<i32>) -> Horse {
        Horse {
            id: HorseId::new(id),
            name: "Blitz".to_owned(),
            age: 9,
            breed: "Hanoverian".to_owned(),
            height: 168,
            next_vet_appointment: None,
            profile_image_url: None,
            owner_id: owner.map(UserId::new),
            stable_id: None,
        }
    }

    #[test]
    fn test_patch_sets_vet_date_only() {
        let mut horse = sample_horse(1, Some(2));
        let before = horse.clone();
        let patch: HorsePatch =
            serde_json::from_str(r#"{"next_vet_appointment": "2025-03-01"}"#).unwrap();
        patch.apply_to(&mut horse);

        assert_eq!(
            horse.next_vet_appointment,
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert_eq!(horse.name, before.name);
        assert_eq!(horse.age, before.age);
        assert_eq!(horse.owner_id, before.owner_id);
    }

    #[test]
    fn test_patch_null_clears_owner() {
        let mut horse = sample_horse(1, Some(2));
        let patch: HorsePatch = serde_json::from_str(r#"{"owner_id": null}"#).unwrap();
        patch.apply_to(&mut horse);
        assert_eq!(horse.owner_id, None);
    }

    #[test]
    fn test_new_horse_requires_schema_fields() {
        let missing: Result<NewHorse, _> = serde_json::from_str(r#"{"name": "Blitz"}"#);
        assert!(missing.is_err());

        let minimal: NewHorse = serde_json::from_str(
            r#"{"name": "Blitz", "age": 9, "breed": "Hanoverian", "height": 168}"#,
        )
        .unwrap();
        assert_eq!(minimal.owner_id, None);
    }

    #[test]
    fn test_serializes_flat_with_relations() {
        let joined = HorseWithRelations::assemble(vec![sample_horse(4, None)], &[], &[], &[]);
        let json = serde_json::to_value(&joined[0]).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["name"], "Blitz");
        assert!(json["owner"].is_null());
        assert_eq!(json["documents"], serde_json::json!([]));
    }
}
