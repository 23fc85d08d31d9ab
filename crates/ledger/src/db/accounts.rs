//! Bank account repository, including the atomic transfer operation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use clearbank_core::{AccountId, AccountNumber, Amount, CustomerId, TransferId};

use super::RepositoryError;
use crate::models::{Account, TransferRecord};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for PostgreSQL bank account queries.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i64,
    account_number: String,
    customer_id: i64,
    balance: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let account_number = AccountNumber::parse(&row.account_number).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid account number in database: {e}"))
        })?;

        Ok(Self {
            id: AccountId::new(row.id),
            account_number,
            customer_id: CustomerId::new(row.customer_id),
            balance: row.balance,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for PostgreSQL transfer log queries.
#[derive(Debug, sqlx::FromRow)]
struct TransferRow {
    id: i64,
    sender_account_number: String,
    receiver_account_number: String,
    amount: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransferRow> for TransferRecord {
    type Error = RepositoryError;

    fn try_from(row: TransferRow) -> Result<Self, Self::Error> {
        let parse = |s: &str| {
            AccountNumber::parse(s).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid account number in database: {e}"))
            })
        };

        Ok(Self {
            id: TransferId::new(row.id),
            sender_account_number: parse(&row.sender_account_number)?,
            receiver_account_number: parse(&row.receiver_account_number)?,
            amount: row.amount,
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, account_number, customer_id, balance, created_at";

// =============================================================================
// Transfer Errors
// =============================================================================

/// Failures of the atomic transfer unit.
///
/// The unit rolls back fully on every variant; no partial mutation survives.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The sender row vanished between the caller's checks and the debit.
    #[error("sender account no longer exists")]
    SenderMissing,

    /// The receiver row vanished between the caller's checks and the credit.
    #[error("receiver account no longer exists")]
    ReceiverMissing,

    /// The conditional debit found the balance too low. Under concurrency
    /// this is the losing side of a race the caller's pre-check could not
    /// see.
    #[error("sender balance is insufficient")]
    InsufficientBalance,

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for bank account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the account number already
    /// exists (the caller's signal to regenerate and retry).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        account_number: &AccountNumber,
    ) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "INSERT INTO bank_account (account_number, customer_id) \
             VALUES ($1, $2) \
             RETURNING id, account_number, customer_id, balance, created_at",
        )
        .bind(account_number)
        .bind(customer_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("account number already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Get an account by its account number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_account_number(
        &self,
        account_number: &AccountNumber,
    ) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM bank_account WHERE account_number = $1"
        ))
        .bind(account_number)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List all accounts owned by a customer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM bank_account WHERE customer_id = $1 ORDER BY id"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Count the accounts owned by a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bank_account WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// List all accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list_all(&self) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM bank_account ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Move `amount` from `sender` to `receiver` and append the transfer log
    /// row, all inside one transaction.
    ///
    /// The debit is a conditional atomic update
    /// (`... AND balance >= amount`, checked via affected-row count), so a
    /// balance can never go negative even when concurrent transfers race
    /// past their callers' pre-checks: the losing side's debit affects zero
    /// rows and the whole unit rolls back.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InsufficientBalance`] if the sender exists
    /// but the balance does not cover the amount,
    /// [`TransferError::SenderMissing`] / [`TransferError::ReceiverMissing`]
    /// if either row is gone, and [`TransferError::Database`] for sqlx
    /// failures. Nothing is persisted on any error path.
    pub async fn transfer(
        &self,
        sender: &AccountNumber,
        receiver: &AccountNumber,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let mut tx = self.pool.begin().await?;

        let debited = sqlx::query(
            "UPDATE bank_account SET balance = balance - $1 \
             WHERE account_number = $2 AND balance >= $1",
        )
        .bind(amount.as_decimal())
        .bind(sender)
        .execute(&mut *tx)
        .await?;

        if debited.rows_affected() == 0 {
            // Zero rows means the sender vanished or the balance guard
            // failed; look at the row inside the same transaction to tell
            // which.
            let sender_rows = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM bank_account WHERE account_number = $1",
            )
            .bind(sender)
            .fetch_one(&mut *tx)
            .await?;

            tx.rollback().await?;
            return Err(if sender_rows == 0 {
                TransferError::SenderMissing
            } else {
                TransferError::InsufficientBalance
            });
        }

        let credited = sqlx::query(
            "UPDATE bank_account SET balance = balance + $1 WHERE account_number = $2",
        )
        .bind(amount.as_decimal())
        .bind(receiver)
        .execute(&mut *tx)
        .await?;

        if credited.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(TransferError::ReceiverMissing);
        }

        sqlx::query(
            "INSERT INTO transfer (sender_account_number, receiver_account_number, amount) \
             VALUES ($1, $2, $3)",
        )
        .bind(sender)
        .bind(receiver)
        .bind(amount.as_decimal())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            sender = %sender,
            receiver = %receiver,
            amount = %amount,
            "transfer committed"
        );
        Ok(())
    }

    /// List the transfer log rows touching an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn transfers_for_account(
        &self,
        account_number: &AccountNumber,
    ) -> Result<Vec<TransferRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, TransferRow>(
            "SELECT id, sender_account_number, receiver_account_number, amount, created_at \
             FROM transfer \
             WHERE sender_account_number = $1 OR receiver_account_number = $1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(account_number)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
