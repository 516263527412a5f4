//! Account routes: register, login, logout, current user.

use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user};
use crate::extract::JsonBody;
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::{AuthService, Registration};
use crate::state::AppState;

/// Body of `POST /api/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub bank_account: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub language: Option<String>,
}

/// Body of `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<Json<User>, AppError> {
    let user = AuthService::new(state.store())
        .register(Registration {
            username: request.username,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            address: request.address,
            bank_account: request.bank_account,
            birth_date: request.birth_date,
            language: request.language,
            role: None,
        })
        .await?;

    start_session(&session, &user).await?;
    Ok(Json(user))
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<User>, AppError> {
    let user = AuthService::new(state.store())
        .login(&request.username, &request.password)
        .await
        .inspect_err(|_| tracing::info!(username = %request.username, "login failed"))?;

    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(user))
}

pub async fn logout(
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<(), AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    tracing::info!(user_id = %user.id, "user logged out");
    Ok(())
}

/// The logged-in user's full record.
pub async fn current(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<User>, AppError> {
    let user = state
        .store()
        .get_user(user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(user))
}

/// New session id on every login to prevent fixation.
async fn start_session(session: &Session, user: &User) -> Result<(), AppError> {
    session.cycle_id().await?;
    set_current_user(
        session,
        &CurrentUser {
            id: user.id,
            username: user.username.clone(),
            role: user.role_id,
        },
    )
    .await?;
    Ok(())
}
