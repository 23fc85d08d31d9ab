//! Bank account domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use clearbank_core::{AccountId, AccountNumber, CustomerId, TransferId};

/// A bank account (domain type).
#[derive(Debug, Clone)]
pub struct Account {
    /// Store-assigned surrogate key.
    pub id: AccountId,
    /// Public 10-digit account number. Immutable, globally unique.
    pub account_number: AccountNumber,
    /// Owning customer. Set once at creation, never reassigned.
    pub customer_id: CustomerId,
    /// Current balance. Never negative; mutated only through transfers.
    pub balance: Decimal,
    /// When the account was opened. Immutable.
    pub created_at: DateTime<Utc>,
}

/// An append-only transfer log row. Never mutated or deleted.
#[derive(Debug, Clone)]
pub struct TransferRecord {
    /// Store-assigned surrogate key.
    pub id: TransferId,
    /// Account the money left.
    pub sender_account_number: AccountNumber,
    /// Account the money arrived at.
    pub receiver_account_number: AccountNumber,
    /// Transferred amount.
    pub amount: Decimal,
    /// When the transfer committed.
    pub created_at: DateTime<Utc>,
}
