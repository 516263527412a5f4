//! Calendar appointments.

use axum::{Json, extract::State};

use crate::error::AppError;
use crate::extract::JsonBody;
use crate::middleware::RequireAuth;
use crate::models::{Appointment, AppointmentWithRelations, NewAppointment};
use crate::state::AppState;

/// List all appointments with horse, people and event group resolved.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<AppointmentWithRelations>>, AppError> {
    let store = state.store();
    let appointments = store.list_appointments().await?;
    let horses = store.list_horses().await?;
    let users = store.list_users().await?;
    let groups = store.list_event_groups().await?;

    Ok(Json(AppointmentWithRelations::assemble(
        appointments,
        &horses,
        &users,
        &groups,
    )))
}

/// Create an appointment owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(appointment): JsonBody<NewAppointment>,
) -> Result<Json<Appointment>, AppError> {
    if appointment.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if appointment.end_time < appointment.start_time {
        return Err(AppError::Validation(
            "end_time must not be before start_time".to_string(),
        ));
    }

    let appointment = state
        .store()
        .create_appointment(appointment, user.id)
        .await?;
    tracing::info!(appointment_id = %appointment.id, created_by = %user.id, "appointment created");
    Ok(Json(appointment))
}
