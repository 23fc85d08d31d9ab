//! Account management commands.

use clearbank_ledger::db;
use clearbank_ledger::services::AccountService;
use clearbank_ledger::{LedgerConfig, LedgerError};
use thiserror::Error;

/// Account command failures.
#[derive(Debug, Error)]
pub enum AccountCommandError {
    #[error("configuration error: {0}")]
    Config(#[from] clearbank_ledger::ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Open a new account for a registered customer.
///
/// # Errors
///
/// Returns `AccountCommandError` if configuration, the database, or the
/// ledger operation fails.
pub async fn open(email: &str) -> Result<(), AccountCommandError> {
    let config = LedgerConfig::from_env()?;
    let pool = db::create_pool(&config).await?;
    let service = AccountService::new(&pool);

    let account = service.open_account(email).await?;

    tracing::info!(
        account_number = %account.account_number,
        balance = %account.balance,
        "Account opened"
    );
    Ok(())
}

/// Transfer money between two accounts.
///
/// # Errors
///
/// Returns `AccountCommandError` if configuration, the database, or the
/// ledger operation fails (unknown account, insufficient balance, malformed
/// amount).
pub async fn transfer(sender: &str, receiver: &str, amount: &str) -> Result<(), AccountCommandError> {
    let config = LedgerConfig::from_env()?;
    let pool = db::create_pool(&config).await?;
    let service = AccountService::new(&pool);

    service.transfer_money(sender, receiver, amount).await?;

    tracing::info!(sender, receiver, amount, "Transfer complete");
    Ok(())
}
