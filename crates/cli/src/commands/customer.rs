//! Customer management commands.

use clearbank_ledger::db;
use clearbank_ledger::services::{Argon2Hasher, CustomerService};
use clearbank_ledger::{LedgerConfig, LedgerError};
use thiserror::Error;

/// Customer command failures.
#[derive(Debug, Error)]
pub enum CustomerCommandError {
    #[error("configuration error: {0}")]
    Config(#[from] clearbank_ledger::ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Register a new customer.
///
/// # Errors
///
/// Returns `CustomerCommandError` if configuration, the database, or the
/// registration itself fails (invalid data, duplicate email).
pub async fn create(
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), CustomerCommandError> {
    let config = LedgerConfig::from_env()?;
    let pool = db::create_pool(&config).await?;
    let hasher = Argon2Hasher;
    let service = CustomerService::new(&pool, &hasher);

    let customer = service
        .create_customer(first_name, last_name, email, password)
        .await?;

    tracing::info!(
        id = %customer.id,
        email = %customer.email,
        "Customer registered"
    );
    Ok(())
}
