//! Transfer amount type using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Amount`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum AmountError {
    /// The input is not a decimal number.
    #[error("amount is not a valid decimal number")]
    NotANumber,
    /// The amount is zero or negative.
    #[error("amount must be greater than zero")]
    NotPositive,
    /// The amount has more than 2 fractional digits.
    #[error("amount cannot have more than 2 decimal places")]
    TooPrecise,
    /// The amount exceeds the maximum transferable value.
    #[error("amount exceeds the maximum of {max}")]
    TooLarge {
        /// Maximum transferable amount.
        max: Decimal,
    },
}

/// A money amount for a transfer.
///
/// Amounts are strictly positive, carry at most 2 fractional digits, and are
/// capped at 9,999,999.99. Internally a [`rust_decimal::Decimal`], so
/// arithmetic is exact.
///
/// ## Examples
///
/// ```
/// use clearbank_core::Amount;
///
/// assert!(Amount::parse("40.00").is_ok());
/// assert!(Amount::parse("0").is_err());       // must be positive
/// assert!(Amount::parse("100.005").is_err()); // too many decimal places
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Maximum transferable amount: 9,999,999.99.
    #[must_use]
    pub fn max() -> Decimal {
        Decimal::new(999_999_999, 2)
    }

    /// Parse an `Amount` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not parse as a decimal, is zero or
    /// negative, has more than 2 fractional digits, or exceeds
    /// [`Amount::max`].
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let value = Decimal::from_str(s.trim()).map_err(|_| AmountError::NotANumber)?;

        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }

        if value.scale() > 2 {
            return Err(AmountError::TooPrecise);
        }

        if value > Self::max() {
            return Err(AmountError::TooLarge { max: Self::max() });
        }

        Ok(Self(value))
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Amount::parse("1").is_ok());
        assert!(Amount::parse("0.01").is_ok());
        assert!(Amount::parse("40.00").is_ok());
        assert!(Amount::parse("9999999.99").is_ok());
        assert!(Amount::parse(" 12.50 ").is_ok());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(Amount::parse("abc"), Err(AmountError::NotANumber)));
        assert!(matches!(Amount::parse(""), Err(AmountError::NotANumber)));
        assert!(matches!(
            Amount::parse("12,50"),
            Err(AmountError::NotANumber)
        ));
    }

    #[test]
    fn test_parse_zero() {
        assert!(matches!(Amount::parse("0"), Err(AmountError::NotPositive)));
        assert!(matches!(
            Amount::parse("0.00"),
            Err(AmountError::NotPositive)
        ));
    }

    #[test]
    fn test_parse_negative() {
        assert!(matches!(
            Amount::parse("-5.00"),
            Err(AmountError::NotPositive)
        ));
    }

    #[test]
    fn test_parse_too_precise() {
        assert!(matches!(
            Amount::parse("100.005"),
            Err(AmountError::TooPrecise)
        ));
        assert!(matches!(
            Amount::parse("0.001"),
            Err(AmountError::TooPrecise)
        ));
    }

    #[test]
    fn test_parse_too_large() {
        assert!(matches!(
            Amount::parse("10000000.00"),
            Err(AmountError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_max_is_inclusive() {
        let amount = Amount::parse("9999999.99").unwrap();
        assert_eq!(amount.as_decimal(), Amount::max());
    }

    #[test]
    fn test_as_decimal() {
        let amount = Amount::parse("40.00").unwrap();
        assert_eq!(amount.as_decimal(), Decimal::new(4000, 2));
    }

    #[test]
    fn test_display() {
        let amount = Amount::parse("40.00").unwrap();
        assert_eq!(format!("{amount}"), "40.00");
    }

    #[test]
    fn test_serde_roundtrip() {
        let amount = Amount::parse("12.34").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        let parsed: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, amount);
    }
}
