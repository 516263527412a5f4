//! Subcommand implementations.

pub mod migrate;
pub mod user;

use paddock_server::config::PaddockConfig;
use sqlx::PgPool;

/// Load configuration and connect to the database it names.
async fn connect() -> Result<PgPool, CommandError> {
    let config = PaddockConfig::from_env()?;
    tracing::info!("Connecting to database...");
    Ok(paddock_server::db::create_pool(&config.database_url).await?)
}

/// Errors shared by all subcommands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] paddock_server::config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid role: {0}. Valid roles: admin, staff, customer")]
    InvalidRole(String),

    #[error("Invalid birth date {0}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Could not create user: {0}")]
    Auth(#[from] paddock_server::services::AuthError),
}
