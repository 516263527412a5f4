//! User management.
//!
//! Anyone logged in may list users and edit their own record. Editing
//! another user, or changing anyone's role, takes an admin.

use axum::{
    Json,
    extract::{Path, State},
};

use paddock_core::UserId;

use crate::error::AppError;
use crate::extract::JsonBody;
use crate::middleware::RequireAuth;
use crate::models::{User, UserPatch, UserWithRelations};
use crate::state::AppState;

/// List all users with role, owned horses and rented stable.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<UserWithRelations>>, AppError> {
    let store = state.store();
    let users = store.list_users().await?;
    let horses = store.list_horses().await?;
    let stables = store.list_stables().await?;

    Ok(Json(UserWithRelations::assemble(users, &horses, &stables)))
}

/// Partial update of a user record.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
    JsonBody(patch): JsonBody<UserPatch>,
) -> Result<Json<User>, AppError> {
    let store = state.store();
    let id = UserId::new(id);

    // The session copy of the role may be stale; authorize against storage.
    let caller = store
        .get_user(current.id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    let caller_is_admin = caller.role_id.is_admin();

    if id != caller.id && !caller_is_admin {
        return Err(AppError::Forbidden(
            "only admins can edit other users".to_string(),
        ));
    }

    let target = if id == caller.id {
        caller
    } else {
        store
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id} does not exist")))?
    };

    if patch.changes_role(target.role_id) && !caller_is_admin {
        return Err(AppError::Forbidden(
            "only admins can change roles".to_string(),
        ));
    }

    let updated = store.update_user(id, patch).await?;
    if updated.role_id != target.role_id {
        tracing::info!(
            user_id = %updated.id,
            changed_by = %current.id,
            role = updated.role_id.name(),
            "user role changed"
        );
    }
    Ok(Json(updated))
}
