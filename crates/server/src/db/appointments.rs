//! Appointment repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use paddock_core::{AppointmentId, EventGroupId, HorseId, UserId};

use super::{RepositoryError, map_foreign_key_violation};
use crate::models::{Appointment, NewAppointment};

const APPOINTMENT_COLUMNS: &str = "id, title, description, start_time, end_time, horse_id, \
     assigned_to_id, created_by_id, event_group_id, recurrence";

/// Internal row type for `PostgreSQL` appointment queries.
#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: AppointmentId,
    title: String,
    description: Option<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    horse_id: Option<HorseId>,
    assigned_to_id: Option<UserId>,
    created_by_id: UserId,
    event_group_id: Option<EventGroupId>,
    recurrence: Option<serde_json::Value>,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            start_time: row.start_time,
            end_time: row.end_time,
            horse_id: row.horse_id,
            assigned_to_id: row.assigned_to_id,
            created_by_id: row.created_by_id,
            event_group_id: row.event_group_id,
            recurrence: row.recurrence,
        }
    }
}

/// Repository for appointment database operations.
pub struct AppointmentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AppointmentRepository<'a> {
    /// Create a new appointment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all appointments in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Appointment>, RepositoryError> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Insert an appointment created by `created_by`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a referenced horse, user or
    /// event group does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        appointment: &NewAppointment,
        created_by: UserId,
    ) -> Result<Appointment, RepositoryError> {
        let row: AppointmentRow = sqlx::query_as(&format!(
            r"
            INSERT INTO appointments (title, description, start_time, end_time, horse_id,
                                      assigned_to_id, created_by_id, event_group_id, recurrence)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {APPOINTMENT_COLUMNS}
            "
        ))
        .bind(&appointment.title)
        .bind(&appointment.description)
        .bind(appointment.start_time)
        .bind(appointment.end_time)
        .bind(appointment.horse_id)
        .bind(appointment.assigned_to_id)
        .bind(created_by)
        .bind(appointment.event_group_id)
        .bind(&appointment.recurrence)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, "referenced record does not exist"))?;

        Ok(row.into())
    }
}
