//! Database migration command.
//!
//! Migrations live in `crates/ledger/migrations/` and are embedded into the
//! binary at compile time, so the deployed CLI needs no source checkout.
//! They are never run automatically at service startup; this command is the
//! only way schema changes are applied.

use clearbank_ledger::db;
use clearbank_ledger::{ConfigError, LedgerConfig};
use thiserror::Error;

/// Migration failures.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending ledger migrations.
///
/// # Errors
///
/// Returns `MigrationError` if configuration is missing, the database is
/// unreachable, or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let config = LedgerConfig::from_env()?;

    tracing::info!("Connecting to ledger database...");
    let pool = db::create_pool(&config).await?;

    tracing::info!("Running ledger migrations...");
    sqlx::migrate!("../ledger/migrations").run(&pool).await?;

    tracing::info!("Ledger migrations complete!");
    Ok(())
}
