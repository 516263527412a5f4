//! Horse records.

use axum::{
    Json,
    extract::{Path, State},
};

use paddock_core::{EntityKind, HorseId};

use crate::error::AppError;
use crate::extract::JsonBody;
use crate::middleware::RequireAuth;
use crate::models::{Horse, HorsePatch, HorseWithRelations, NewHorse};
use crate::state::AppState;

/// List all horses with owner, stable and attached documents.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<HorseWithRelations>>, AppError> {
    let store = state.store();
    let horses = store.list_horses().await?;
    let users = store.list_users().await?;
    let stables = store.list_stables().await?;
    let documents = store.list_documents_of_kind(EntityKind::Horse).await?;

    Ok(Json(HorseWithRelations::assemble(
        horses, &users, &stables, &documents,
    )))
}

pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(horse): JsonBody<NewHorse>,
) -> Result<Json<Horse>, AppError> {
    if horse.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    let horse = state.store().create_horse(horse).await?;
    tracing::info!(horse_id = %horse.id, created_by = %user.id, "horse created");
    Ok(Json(horse))
}

/// Partial update: absent fields are kept, `null` clears nullable ones.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
    JsonBody(patch): JsonBody<HorsePatch>,
) -> Result<Json<Horse>, AppError> {
    if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let horse = state.store().update_horse(HorseId::new(id), patch).await?;
    Ok(Json(horse))
}
