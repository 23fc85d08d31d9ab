//! Database operations for the ledger PostgreSQL instance.
//!
//! ## Tables
//!
//! - `customer` - registered customers and their password hashes
//! - `bank_account` - accounts with their balances
//! - `transfer` - append-only transfer log
//!
//! Every repository call runs on a connection borrowed from the pool for the
//! duration of that call; there is no standing connection state. The transfer
//! operation is the only multi-statement unit and runs inside a single
//! transaction.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/ledger/migrations/` and run via:
//! ```bash
//! cargo run -p clearbank-cli -- migrate
//! ```

pub mod accounts;
pub mod customers;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use accounts::{AccountRepository, TransferError};
pub use customers::CustomerRepository;

use crate::config::LedgerConfig;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email or account number).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a PostgreSQL connection pool from the ledger configuration.
///
/// Pool limits and the acquire timeout come from [`LedgerConfig`], so every
/// query is implicitly bounded: waiting on a saturated pool fails with a
/// timeout surfaced as `sqlx::Error`.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &LedgerConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(config.database_url.expose_secret())
        .await
}
