//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                                  - Liveness
//! GET   /health/ready                            - Readiness (database ping)
//! GET   /uploads/{profiles|documents}/{name}     - Uploaded files
//!
//! # Account
//! POST  /api/register                            - Create account and log in
//! POST  /api/login                               - Log in
//! POST  /api/logout                              - Log out (auth)
//! GET   /api/user                                - Current user (auth)
//!
//! # Uploads (auth, multipart)
//! POST  /api/upload/profile                      - Image under `profile`
//! POST  /api/upload/document                     - Document under `document`
//!
//! # Documents (auth)
//! GET   /api/documents/{entity_type}/{entity_id} - Documents of a user or horse
//! POST  /api/documents                           - Record an uploaded file
//! POST  /api/documents/upload                    - Upload and record in one step
//!
//! # Records (auth)
//! GET   /api/horses            POST /api/horses        PATCH /api/horses/{id}
//! GET   /api/appointments      POST /api/appointments
//! GET   /api/users             PATCH /api/users/{id}
//! GET   /api/stables  /api/roles  /api/event-groups  /api/translations/{language}
//! ```

pub mod appointments;
pub mod auth;
pub mod documents;
pub mod health;
pub mod horses;
pub mod lookups;
pub mod uploads;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::services::ServeDir;
use tower_sessions::{SessionManagerLayer, SessionStore};

use paddock_core::UploadLimits;

use crate::services::uploads::URL_PREFIX;
use crate::state::AppState;

/// Build the complete application router.
///
/// Tracing and Sentry layers are added by the binary; everything that
/// affects behaviour is here so tests drive the same router.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let upload_dir = state.config().upload_dir.clone();
    let limits = state.config().upload_limits;

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes(limits))
        .nest_service(URL_PREFIX, ServeDir::new(upload_dir))
        .layer(session_layer)
        .with_state(state)
}

/// Create the `/api` router.
pub fn api_routes(limits: UploadLimits) -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::current))
        .route(
            "/upload/profile",
            post(uploads::profile).layer(uploads::body_limit(limits)),
        )
        .route(
            "/upload/document",
            post(uploads::document).layer(uploads::body_limit(limits)),
        )
        .route("/documents", post(documents::create))
        .route(
            "/documents/upload",
            post(documents::upload_and_create).layer(uploads::body_limit(limits)),
        )
        .route("/documents/{entity_type}/{entity_id}", get(documents::list))
        .route("/horses", get(horses::list).post(horses::create))
        .route("/horses/{id}", patch(horses::update))
        .route(
            "/appointments",
            get(appointments::list).post(appointments::create),
        )
        .route("/users", get(users::list))
        .route("/users/{id}", patch(users::update))
        .route("/stables", get(lookups::stables))
        .route("/roles", get(lookups::roles))
        .route("/event-groups", get(lookups::event_groups))
        .route("/translations/{language}", get(lookups::translations))
}
