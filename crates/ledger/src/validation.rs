//! Field-level validation applied before every mutating operation.
//!
//! Each [`ValidationType`] maps to exactly one pure check function through an
//! exhaustive match, so a field type without a registered check is
//! unrepresentable - requesting validation for a type always runs its rule.

use thiserror::Error;

use clearbank_core::{AccountNumber, AccountNumberError, Amount, AmountError, Email, EmailError};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// The kinds of field that can be validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationType {
    /// Customer email address.
    Email,
    /// Raw (unhashed) customer password.
    Password,
    /// Customer first or last name.
    Name,
    /// Bank account number.
    AccountNumber,
    /// Money amount for a transfer.
    TransferAmount,
}

/// Malformed input, correctable by the client.
#[derive(Debug, Error)]
pub enum InvalidDataError {
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("invalid password: {0}")]
    Password(String),

    #[error("invalid name: {0}")]
    Name(String),

    #[error("invalid account number: {0}")]
    AccountNumber(#[from] AccountNumberError),

    #[error("invalid transfer amount: {0}")]
    TransferAmount(#[from] AmountError),

    #[error("cannot transfer to the same account")]
    SameAccount,
}

/// Validate a single field value.
///
/// Rules:
/// - `Email`: non-empty, standard `local@domain.tld` shape
/// - `Password`: non-empty, at least 8 characters
/// - `Name`: non-empty
/// - `AccountNumber`: exactly 10 decimal digits
/// - `TransferAmount`: positive decimal, at most 2 fractional digits, at
///   most 9,999,999.99
///
/// # Errors
///
/// Returns [`InvalidDataError`] describing the first violated rule.
pub fn validate(field: ValidationType, value: &str) -> Result<(), InvalidDataError> {
    match field {
        ValidationType::Email => {
            Email::parse(value)?;
            Ok(())
        }
        ValidationType::Password => check_password(value),
        ValidationType::Name => check_name(value),
        ValidationType::AccountNumber => {
            AccountNumber::parse(value)?;
            Ok(())
        }
        ValidationType::TransferAmount => {
            Amount::parse(value)?;
            Ok(())
        }
    }
}

fn check_password(password: &str) -> Result<(), InvalidDataError> {
    if password.is_empty() {
        return Err(InvalidDataError::Password(
            "password cannot be empty".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(InvalidDataError::Password(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), InvalidDataError> {
    if name.trim().is_empty() {
        return Err(InvalidDataError::Name("name cannot be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_rules() {
        assert!(validate(ValidationType::Email, "user@example.com").is_ok());
        assert!(validate(ValidationType::Email, "").is_err());
        assert!(validate(ValidationType::Email, "not-an-email").is_err());
        assert!(validate(ValidationType::Email, "user@domain").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate(ValidationType::Password, "longenough").is_ok());
        assert!(validate(ValidationType::Password, "12345678").is_ok());
        assert!(validate(ValidationType::Password, "").is_err());
        assert!(validate(ValidationType::Password, "short").is_err());
        assert!(validate(ValidationType::Password, "1234567").is_err());
    }

    #[test]
    fn test_name_rules() {
        assert!(validate(ValidationType::Name, "Ada").is_ok());
        assert!(validate(ValidationType::Name, "").is_err());
        assert!(validate(ValidationType::Name, "   ").is_err());
    }

    #[test]
    fn test_account_number_rules() {
        assert!(validate(ValidationType::AccountNumber, "0123456789").is_ok());
        assert!(validate(ValidationType::AccountNumber, "").is_err());
        assert!(validate(ValidationType::AccountNumber, "123").is_err());
        assert!(validate(ValidationType::AccountNumber, "123456789x").is_err());
    }

    #[test]
    fn test_transfer_amount_rules() {
        assert!(validate(ValidationType::TransferAmount, "40.00").is_ok());
        assert!(validate(ValidationType::TransferAmount, "0").is_err());
        assert!(validate(ValidationType::TransferAmount, "-1").is_err());
        assert!(validate(ValidationType::TransferAmount, "100.005").is_err());
        assert!(validate(ValidationType::TransferAmount, "10000000").is_err());
        assert!(validate(ValidationType::TransferAmount, "pennies").is_err());
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = validate(ValidationType::Password, "short").unwrap_err();
        assert!(err.to_string().contains("password"));

        let err = validate(ValidationType::TransferAmount, "0").unwrap_err();
        assert!(err.to_string().contains("amount"));
    }
}
