//! User roles.
//!
//! Roles live in the `roles` lookup table and are referenced by their numeric
//! id. The ids are fixed: `1` admin, `2` staff, `3` customer.

use serde::{Deserialize, Serialize};

/// Role assigned to every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Role {
    /// Full access, including changing other users' roles.
    Admin,
    /// Stable staff.
    Staff,
    /// Horse owner renting a box.
    Customer,
}

impl Role {
    /// All roles in id order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Staff, Self::Customer];

    /// Numeric id as stored in the `roles` table.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Admin => 1,
            Self::Staff => 2,
            Self::Customer => 3,
        }
    }

    /// Display name as seeded into the `roles` table.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Staff => "Staff",
            Self::Customer => "Customer",
        }
    }

    /// Whether this role may administer other users.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl TryFrom<i32> for Role {
    type Error = String;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::Admin),
            2 => Ok(Self::Staff),
            3 => Ok(Self::Customer),
            _ => Err(format!("unknown role id: {id}")),
        }
    }
}

impl From<Role> for i32 {
    fn from(role: Role) -> Self {
        role.id()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Staff => write!(f, "staff"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ids_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::try_from(role.id()), Ok(role));
        }
        assert!(Role::try_from(0).is_err());
        assert!(Role::try_from(4).is_err());
    }

    #[test]
    fn test_role_serializes_as_numeric_id() {
        assert_eq!(serde_json::to_string(&Role::Staff).ok().as_deref(), Some("2"));
        let role: Result<Role, _> = serde_json::from_str("1");
        assert_eq!(role.ok(), Some(Role::Admin));
        let bad: Result<Role, _> = serde_json::from_str("9");
        assert!(bad.is_err());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("customer".parse::<Role>(), Ok(Role::Customer));
        assert!("owner".parse::<Role>().is_err());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Staff.is_admin());
    }
}
