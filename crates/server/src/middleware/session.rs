//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions
//! (SameSite=Lax, http-only, 7-day inactivity expiry).

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::PaddockConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "paddock_session";

/// Session expiry time in seconds (7 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The session table is created by `paddock-cli migrate`.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &PaddockConfig,
) -> SessionManagerLayer<PostgresStore> {
    let store = PostgresStore::new(pool.clone());
    session_layer(store, config.is_secure())
}

/// Wrap any session store with the cookie settings used in production.
#[must_use]
pub fn session_layer<S: SessionStore + Clone>(store: S, secure: bool) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
