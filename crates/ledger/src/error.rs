//! Unified error taxonomy for ledger operations.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::validation::InvalidDataError;

/// Errors surfaced by the ledger services.
///
/// Transport layers map these onto their own vocabulary; for HTTP that is
/// `InvalidData` → 400, `CustomerNotFound`/`AccountNotFound` → 404,
/// `DuplicateEmail`/`CustomerHasAccounts` → 409, `InsufficientBalance` → 422,
/// `Repository`/`Internal` → 500. Repository and internal failures keep
/// their cause for logging but render as a generic message, so internal
/// diagnostics never reach clients.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed input, correctable by the client.
    #[error("{0}")]
    InvalidData(#[from] InvalidDataError),

    /// No customer is registered under the given email.
    #[error("no customer with email {0} was found")]
    CustomerNotFound(String),

    /// No account exists with the given account number.
    #[error("no account with number {0} was found")]
    AccountNotFound(String),

    /// Registration conflict: the email is already in use.
    #[error("email is already in use")]
    DuplicateEmail,

    /// The sender's balance does not cover the transfer.
    #[error("balance is insufficient for this transfer")]
    InsufficientBalance,

    /// The customer still owns open accounts and cannot be deleted.
    #[error("customer still has open accounts")]
    CustomerHasAccounts,

    /// Storage or I/O failure, not client-correctable.
    #[error("storage error")]
    Repository(#[from] RepositoryError),

    /// Unexpected failure in a collaborator (e.g. the password hasher).
    /// Rendered generically; the detail stays in the logs.
    #[error("internal error")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_hides_repository_cause() {
        let err = LedgerError::Repository(RepositoryError::DataCorruption(
            "row 17 has a malformed email".to_string(),
        ));
        assert_eq!(err.to_string(), "storage error");
    }

    #[test]
    fn test_repository_cause_stays_on_source_chain() {
        let err = LedgerError::Repository(RepositoryError::NotFound);
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "not found");
    }

    #[test]
    fn test_display_names_the_missing_entity() {
        let err = LedgerError::AccountNotFound("0123456789".to_string());
        assert_eq!(err.to_string(), "no account with number 0123456789 was found");
    }
}
