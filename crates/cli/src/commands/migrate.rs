//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! paddock-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `PADDOCK_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Schema migrations live in `crates/server/migrations/`. The session table
//! is owned by `tower-sessions-sqlx-store` and created by its own migration.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CommandError, connect};

/// Apply schema migrations and create the session table.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running schema migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
