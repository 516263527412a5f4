//! Read-only lookup lists.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{EventGroup, RoleInfo, Stable};
use crate::state::AppState;

pub async fn stables(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Stable>>, AppError> {
    Ok(Json(state.store().list_stables().await?))
}

pub async fn roles(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<RoleInfo>>, AppError> {
    Ok(Json(state.store().list_roles().await?))
}

pub async fn event_groups(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<EventGroup>>, AppError> {
    Ok(Json(state.store().list_event_groups().await?))
}

/// UI strings for one language as a `{key: value}` object.
pub async fn translations(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(language): Path<String>,
) -> Result<Json<BTreeMap<String, String>>, AppError> {
    let translations = state.store().list_translations(&language).await?;
    Ok(Json(
        translations
            .into_iter()
            .map(|t| (t.key, t.value))
            .collect(),
    ))
}
