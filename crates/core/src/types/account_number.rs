//! Bank account number type.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`AccountNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum AccountNumberError {
    /// The input string is empty.
    #[error("account number cannot be empty")]
    Empty,
    /// The input is not exactly [`AccountNumber::LENGTH`] characters.
    #[error("account number must be exactly {expected} characters (got {got})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        got: usize,
    },
    /// The input contains a character that is not a decimal digit.
    #[error("account number must contain only decimal digits")]
    NotDigits,
}

/// A bank account number: exactly 10 decimal digits, leading zero allowed.
///
/// Account numbers are generated when an account is opened and never change.
/// Generation does not guarantee uniqueness on its own; the account store
/// checks the unique constraint on insert and regenerates on collision.
///
/// ## Examples
///
/// ```
/// use clearbank_core::AccountNumber;
///
/// assert!(AccountNumber::parse("0123456789").is_ok());
/// assert!(AccountNumber::parse("123456789").is_err());  // too short
/// assert!(AccountNumber::parse("12345678xy").is_err()); // not digits
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Length of an account number in digits.
    pub const LENGTH: usize = 10;

    /// Parse an `AccountNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not exactly 10 characters, or
    /// contains non-digit characters.
    pub fn parse(s: &str) -> Result<Self, AccountNumberError> {
        if s.is_empty() {
            return Err(AccountNumberError::Empty);
        }

        if s.len() != Self::LENGTH {
            return Err(AccountNumberError::WrongLength {
                expected: Self::LENGTH,
                got: s.chars().count(),
            });
        }

        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(AccountNumberError::NotDigits);
        }

        Ok(Self(s.to_owned()))
    }

    /// Generate a random account number: 10 independently uniform decimal
    /// digits.
    ///
    /// The result carries no uniqueness guarantee; callers persisting it must
    /// check the store's unique constraint and retry on collision.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let digits = (0..Self::LENGTH)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();
        Self(digits)
    }

    /// Returns the account number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `AccountNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountNumber {
    type Err = AccountNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for AccountNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for AccountNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for AccountNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for AccountNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(AccountNumber::parse("1234567890").is_ok());
        assert!(AccountNumber::parse("0000000000").is_ok());
        assert!(AccountNumber::parse("0987654321").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            AccountNumber::parse(""),
            Err(AccountNumberError::Empty)
        ));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            AccountNumber::parse("123456789"),
            Err(AccountNumberError::WrongLength {
                expected: 10,
                got: 9
            })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            AccountNumber::parse("12345678901"),
            Err(AccountNumberError::WrongLength {
                expected: 10,
                got: 11
            })
        ));
    }

    #[test]
    fn test_parse_not_digits() {
        assert!(matches!(
            AccountNumber::parse("12345678ab"),
            Err(AccountNumberError::NotDigits)
        ));
        assert!(matches!(
            AccountNumber::parse("1234 67890"),
            Err(AccountNumberError::NotDigits)
        ));
    }

    #[test]
    fn test_generate_shape() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let number = AccountNumber::generate(&mut rng);
            assert_eq!(number.as_str().len(), AccountNumber::LENGTH);
            assert!(number.as_str().chars().all(|c| c.is_ascii_digit()));
            // Generated numbers always round-trip through parse.
            assert!(AccountNumber::parse(number.as_str()).is_ok());
        }
    }

    #[test]
    fn test_display() {
        let number = AccountNumber::parse("0123456789").unwrap();
        assert_eq!(format!("{number}"), "0123456789");
    }

    #[test]
    fn test_from_str() {
        let number: AccountNumber = "1234567890".parse().unwrap();
        assert_eq!(number.as_str(), "1234567890");
    }

    #[test]
    fn test_serde_roundtrip() {
        let number = AccountNumber::parse("1234567890").unwrap();
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"1234567890\"");

        let parsed: AccountNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, number);
    }
}
