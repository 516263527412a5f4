//! User domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use paddock_core::{Role, UserId, Username};

use super::horse::Horse;
use super::lookup::{RoleInfo, Stable};
use super::patch::{apply, double_option};

/// A user account with profile data.
///
/// The password hash is never part of this type; it is only read by the
/// login path through [`crate::db::Store::get_credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub bank_account: String,
    pub birth_date: NaiveDate,
    pub role_id: Role,
    pub profile_image_url: Option<String>,
    /// Preferred UI language code (e.g. `de`, `en`).
    pub language: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public identity used when a user is nested in another record.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Identity of a user as shown next to records they own or created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
}

/// Data needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub bank_account: String,
    pub birth_date: NaiveDate,
    /// `None` assigns `Admin` when no user exists yet and `Customer`
    /// otherwise, decided atomically with the insert.
    pub role: Option<Role>,
    pub language: String,
}

/// Partial update of a user's profile.
///
/// Login name and password are not patchable here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub bank_account: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role_id: Option<Role>,
    #[serde(default, deserialize_with = "double_option")]
    pub profile_image_url: Option<Option<String>>,
    pub language: Option<String>,
}

impl UserPatch {
    /// Whether the patch changes the user's role.
    #[must_use]
    pub fn changes_role(&self, current: Role) -> bool {
        self.role_id.is_some_and(|role| role != current)
    }

    /// Apply the present fields to `user`.
    pub fn apply_to(self, user: &mut User) {
        apply(&mut user.first_name, self.first_name);
        apply(&mut user.last_name, self.last_name);
        apply(&mut user.address, self.address);
        apply(&mut user.bank_account, self.bank_account);
        apply(&mut user.birth_date, self.birth_date);
        apply(&mut user.role_id, self.role_id);
        apply(&mut user.profile_image_url, self.profile_image_url);
        apply(&mut user.language, self.language);
    }
}

/// A user with the records shown on the user management screen.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithRelations {
    #[serde(flatten)]
    pub user: User,
    pub role: RoleInfo,
    pub horses: Vec<Horse>,
    pub stable: Option<Stable>,
}

impl UserWithRelations {
    /// Join users with their role, owned horses and occupied stable.
    #[must_use]
    pub fn assemble(users: Vec<User>, horses: &[Horse], stables: &[Stable]) -> Vec<Self> {
        users
            .into_iter()
            .map(|user| {
                let owned = horses
                    .iter()
                    .filter(|horse| horse.owner_id == Some(user.id))
                    .cloned()
                    .collect();
                let stable = stables
                    .iter()
                    .find(|stable| stable.current_tenant_id == Some(user.id))
                    .cloned();
                Self {
                    role: RoleInfo::from(user.role_id),
                    horses: owned,
                    stable,
                    user,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use paddock_core::{HorseId, StableId};

    pub(crate) fn sample_user(id: i32, username: &str, role: Role) -> User {
        User {
            id: UserId::new(id),
            username: Username::parse(username).unwrap(),
            first_name: "Anna".to_owned(),
            last_name: "Meyer".to_owned(),
            address: "Hofweg 1".to_owned(),
            bank_account: "DE00 0000".to_owned(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            role_id: role,
            profile_image_url: None,
            language: "de".to_owned(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut user = sample_user(1, "anna", Role::Customer);
        let patch: UserPatch =
            serde_json::from_str(r#"{"address": "Neuer Weg 2", "profile_image_url": "/uploads/profiles/a.png"}"#)
                .unwrap();
        assert!(!patch.changes_role(user.role_id));
        patch.apply_to(&mut user);

        assert_eq!(user.address, "Neuer Weg 2");
        assert_eq!(user.profile_image_url.as_deref(), Some("/uploads/profiles/a.png"));
        assert_eq!(user.first_name, "Anna");
        assert_eq!(user.role_id, Role::Customer);
    }

    #[test]
    fn test_patch_detects_role_change() {
        let patch: UserPatch = serde_json::from_str(r#"{"role_id": 1}"#).unwrap();
        assert!(patch.changes_role(Role::Customer));
        assert!(!patch.changes_role(Role::Admin));
    }

    #[test]
    fn test_user_serialization_has_no_password() {
        let json = serde_json::to_value(sample_user(1, "anna", Role::Staff)).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role_id"], 2);
    }

    #[test]
    fn test_assemble_relations() {
        let users = vec![
            sample_user(1, "anna", Role::Customer),
            sample_user(2, "ben", Role::Staff),
        ];
        let horses = vec![crate::models::horse::tests::sample_horse(10, Some(1))];
        let stables = vec![Stable {
            id: StableId::new(3),
            number: "B3".to_owned(),
            occupied: true,
            current_tenant_id: Some(UserId::new(1)),
        }];

        let joined = UserWithRelations::assemble(users, &horses, &stables);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].horses.len(), 1);
        assert_eq!(joined[0].horses[0].id, HorseId::new(10));
        assert_eq!(joined[0].stable.as_ref().map(|s| s.id), Some(StableId::new(3)));
        assert_eq!(joined[0].role.name, "Customer");
        assert!(joined[1].horses.is_empty());
        assert!(joined[1].stable.is_none());
    }
}
