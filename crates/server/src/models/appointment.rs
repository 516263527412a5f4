//! Calendar appointment types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use paddock_core::{AppointmentId, EventGroupId, HorseId, UserId};

use super::horse::Horse;
use super::lookup::EventGroup;
use super::user::{User, UserSummary};

/// A calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub horse_id: Option<HorseId>,
    pub assigned_to_id: Option<UserId>,
    pub created_by_id: UserId,
    pub event_group_id: Option<EventGroupId>,
    /// Recurrence rule as sent by the calendar client. Stored and returned
    /// verbatim.
    pub recurrence: Option<serde_json::Value>,
}

/// Request body for creating an appointment. The creator is always the
/// calling user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAppointment {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub horse_id: Option<HorseId>,
    #[serde(default)]
    pub assigned_to_id: Option<UserId>,
    #[serde(default)]
    pub event_group_id: Option<EventGroupId>,
    #[serde(default)]
    pub recurrence: Option<serde_json::Value>,
}

/// An appointment with the records the calendar displays next to it.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentWithRelations {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub horse: Option<Horse>,
    pub assigned_to: Option<UserSummary>,
    pub created_by: Option<UserSummary>,
    pub event_group: Option<EventGroup>,
}

impl AppointmentWithRelations {
    /// Join appointments with their horse, assignee, creator and group.
    #[must_use]
    pub fn assemble(
        appointments: Vec<Appointment>,
        horses: &[Horse],
        users: &[User],
        groups: &[EventGroup],
    ) -> Vec<Self> {
        let summary_of = |id: Option<UserId>| {
            id.and_then(|id| users.iter().find(|user| user.id == id))
                .map(User::summary)
        };

        appointments
            .into_iter()
            .map(|appointment| Self {
                horse: appointment
                    .horse_id
                    .and_then(|id| horses.iter().find(|horse| horse.id == id))
                    .cloned(),
                assigned_to: summary_of(appointment.assigned_to_id),
                created_by: summary_of(Some(appointment.created_by_id)),
                event_group: appointment
                    .event_group_id
                    .and_then(|id| groups.iter().find(|group| group.id == id))
                    .cloned(),
                appointment,
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use paddock_core::Role;

    use super::*;
    use crate::models::horse::tests::sample_horse;
    use crate::models::user::tests::sample_user;

    #[test]
    fn test_recurrence_is_passed_through() {
        let body = r#"{
            "title": "Farrier",
            "start_time": "2025-03-01T09:00:00Z",
            "end_time": "2025-03-01T10:00:00Z",
            "recurrence": {"freq": "weekly", "by_day": ["MO"]}
        }"#;
        let new: NewAppointment = serde_json::from_str(body).unwrap();
        assert_eq!(new.recurrence.unwrap()["freq"], "weekly");
        assert_eq!(new.horse_id, None);
    }

    #[test]
    fn test_assemble_resolves_relations() {
        let appointment = Appointment {
            id: AppointmentId::new(1),
            title: "Vet".to_owned(),
            description: None,
            start_time: DateTime::<Utc>::UNIX_EPOCH,
            end_time: DateTime::<Utc>::UNIX_EPOCH,
            horse_id: Some(HorseId::new(5)),
            assigned_to_id: Some(UserId::new(2)),
            created_by_id: UserId::new(1),
            event_group_id: None,
            recurrence: None,
        };
        let users = vec![
            sample_user(1, "anna", Role::Admin),
            sample_user(2, "ben", Role::Staff),
        ];
        let horses = vec![sample_horse(5, Some(1))];

        let joined = AppointmentWithRelations::assemble(vec![appointment], &horses, &users, &[]);
        let first = &joined[0];
        assert_eq!(first.horse.as_ref().map(|h| h.id), Some(HorseId::new(5)));
        assert_eq!(
            first.assigned_to.as_ref().map(|u| u.username.as_str()),
            Some("ben")
        );
        assert_eq!(
            first.created_by.as_ref().map(|u| u.username.as_str()),
            Some("anna")
        );
        assert!(first.event_group.is_none());
    }
}
