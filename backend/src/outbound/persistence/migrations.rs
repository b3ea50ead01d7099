//! Embedded schema migration runner.
//!
//! Migrations are compiled into the binary and applied at startup, before
//! the async pool is built, using a plain synchronous connection on a
//! blocking thread.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying schema migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not open the migration connection.
    #[error("failed to connect for migrations: {0}")]
    Connection(#[from] diesel::ConnectionError),

    /// A migration failed to apply.
    #[error("failed to run migrations: {0}")]
    Migration(String),

    /// The blocking migration task was cancelled or panicked.
    #[error("migration task failed: {0}")]
    Task(String),
}

/// Apply all pending migrations, returning how many ran.
pub async fn run_pending_migrations(database_url: String) -> Result<usize, MigrationError> {
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Migration(err.to_string()))?;
        for version in &applied {
            info!(%version, "applied migration");
        }
        Ok(applied.len())
    })
    .await
    .map_err(|err| MigrationError::Task(err.to_string()))?
}
