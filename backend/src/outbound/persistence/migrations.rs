//! Embedded schema migrations, applied once at startup.
//!
//! Diesel's migration harness needs a synchronous connection, so the run is
//! moved onto the blocking pool.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures raised while migrating the schema.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("failed to apply migrations: {0}")]
    Apply(String),
    /// The blocking task panicked or was cancelled.
    #[error("migration task aborted: {0}")]
    Aborted(String),
}

fn apply(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply(err.to_string()))?;
    Ok(applied.len())
}

/// Apply every pending migration against `database_url`.
///
/// # Errors
///
/// Returns [`MigrationError`] when the connection or any migration fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || apply(&url))
        .await
        .map_err(|err| MigrationError::Aborted(err.to_string()))??;
    info!(applied, "database migrations complete");
    Ok(())
}
