//! Ledger services - the orchestration layer.
//!
//! Services are the sole entry point for mutating operations. Every call
//! runs field validation first, then business-rule checks against the
//! repositories, and only then mutates. Typed errors surface through
//! [`crate::error::LedgerError`].

pub mod accounts;
pub mod customers;
pub mod password;

pub use accounts::AccountService;
pub use customers::CustomerService;
pub use password::{Argon2Hasher, PasswordHashError, PasswordHasher};

use clearbank_core::{AccountNumber, Email};

use crate::db::RepositoryError;
use crate::error::LedgerError;
use crate::validation::InvalidDataError;

pub(crate) fn parse_email(s: &str) -> Result<Email, LedgerError> {
    Ok(Email::parse(s).map_err(InvalidDataError::from)?)
}

pub(crate) fn parse_account_number(s: &str) -> Result<AccountNumber, LedgerError> {
    Ok(AccountNumber::parse(s).map_err(InvalidDataError::from)?)
}

/// Log a repository failure before re-raising it; storage errors are never
/// swallowed and never reach callers with their internal cause in Display.
pub(crate) fn log_repository_error(e: RepositoryError, operation: &str) -> LedgerError {
    tracing::error!(error = %e, operation, "repository operation failed");
    LedgerError::Repository(e)
}
