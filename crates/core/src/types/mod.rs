//! Core types for Clearbank.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod account_number;
pub mod amount;
pub mod email;
pub mod id;

pub use account_number::{AccountNumber, AccountNumberError};
pub use amount::{Amount, AmountError};
pub use email::{Email, EmailError};
pub use id::*;
