//! Account service: opening accounts and transferring money.

use sqlx::PgPool;

use clearbank_core::{AccountNumber, Amount};

use crate::db::{AccountRepository, CustomerRepository, RepositoryError, TransferError};
use crate::error::LedgerError;
use crate::models::{Account, TransferRecord};
use crate::services::{log_repository_error, parse_account_number, parse_email};
use crate::validation::{InvalidDataError, ValidationType, validate};

/// How many fresh account numbers to try before giving up on a collision
/// streak.
const MAX_GENERATION_ATTEMPTS: u32 = 5;

/// Account-facing half of the ledger service.
///
/// `transfer_money` is the only operation that moves money, and its
/// business-rule sequence (validate, existence checks, same-account
/// rejection, balance check, atomic store transfer) is fixed: the atomic
/// debit inside the store is what actually guarantees the balance invariant,
/// while the earlier checks exist to give callers precise errors.
pub struct AccountService<'a> {
    accounts: AccountRepository<'a>,
    customers: CustomerRepository<'a>,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
            customers: CustomerRepository::new(pool),
        }
    }

    /// Open a new account for a registered customer, starting at balance 0.
    ///
    /// Account numbers are random, so the insert can collide with an
    /// existing number; on a unique-constraint conflict a fresh number is
    /// generated, up to 5 times.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidData` if the email is malformed.
    /// Returns `LedgerError::CustomerNotFound` if no customer owns the email.
    /// Returns `LedgerError::Repository` if the store fails or the collision
    /// retries are exhausted.
    pub async fn open_account(&self, customer_email: &str) -> Result<Account, LedgerError> {
        validate(ValidationType::Email, customer_email)?;
        let email = parse_email(customer_email)?;

        let customer = self
            .customers
            .get_by_email(&email)
            .await
            .map_err(|e| log_repository_error(e, "open account"))?
            .ok_or_else(|| LedgerError::CustomerNotFound(email.to_string()))?;

        let mut attempts = 0;
        loop {
            let number = AccountNumber::generate(&mut rand::rng());
            match self.accounts.create(customer.id, &number).await {
                Ok(account) => {
                    tracing::info!(
                        account_number = %account.account_number,
                        customer = %email,
                        "account opened"
                    );
                    return Ok(account);
                }
                Err(RepositoryError::Conflict(_)) => {
                    attempts += 1;
                    tracing::warn!(
                        account_number = %number,
                        attempts,
                        "account number collision, regenerating"
                    );
                    if attempts >= MAX_GENERATION_ATTEMPTS {
                        return Err(log_repository_error(
                            RepositoryError::Conflict(format!(
                                "could not find a free account number in \
                                 {MAX_GENERATION_ATTEMPTS} attempts"
                            )),
                            "open account",
                        ));
                    }
                }
                Err(other) => return Err(log_repository_error(other, "open account")),
            }
        }
    }

    /// Look up an account by its number.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidData` if the number is malformed.
    /// Returns `LedgerError::AccountNotFound` if absent.
    /// Returns `LedgerError::Repository` if the store fails.
    pub async fn get_account(&self, account_number: &str) -> Result<Account, LedgerError> {
        validate(ValidationType::AccountNumber, account_number)?;
        let number = parse_account_number(account_number)?;

        self.accounts
            .get_by_account_number(&number)
            .await
            .map_err(|e| log_repository_error(e, "get account"))?
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))
    }

    /// List every account in the ledger.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Repository` if the store fails.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        self.accounts
            .list_all()
            .await
            .map_err(|e| log_repository_error(e, "list accounts"))
    }

    /// List the accounts owned by a customer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidData` if the email is malformed.
    /// Returns `LedgerError::CustomerNotFound` if no customer owns the email.
    /// Returns `LedgerError::Repository` if the store fails.
    pub async fn accounts_for_customer(
        &self,
        customer_email: &str,
    ) -> Result<Vec<Account>, LedgerError> {
        validate(ValidationType::Email, customer_email)?;
        let email = parse_email(customer_email)?;

        let customer = self
            .customers
            .get_by_email(&email)
            .await
            .map_err(|e| log_repository_error(e, "list customer accounts"))?
            .ok_or_else(|| LedgerError::CustomerNotFound(email.to_string()))?;

        self.accounts
            .list_by_customer(customer.id)
            .await
            .map_err(|e| log_repository_error(e, "list customer accounts"))
    }

    /// Transfer money between two accounts.
    ///
    /// The business-rule sequence is fixed: validate all three fields,
    /// check both accounts exist, reject a self-transfer, check the sender's
    /// balance, and only then run the atomic store transfer. The store-level
    /// debit re-checks the balance atomically, so a concurrent transfer that
    /// slips past the pre-check here still cannot overdraw - it surfaces as
    /// `InsufficientBalance` with no mutation.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidData` if a field is malformed or sender
    /// and receiver are the same account.
    /// Returns `LedgerError::AccountNotFound` if either account is unknown.
    /// Returns `LedgerError::InsufficientBalance` if the sender cannot cover
    /// the amount.
    /// Returns `LedgerError::Repository` if the store fails; the atomic unit
    /// rolls back fully.
    pub async fn transfer_money(
        &self,
        sender_number: &str,
        receiver_number: &str,
        amount: &str,
    ) -> Result<(), LedgerError> {
        validate(ValidationType::AccountNumber, sender_number)?;
        validate(ValidationType::AccountNumber, receiver_number)?;
        validate(ValidationType::TransferAmount, amount)?;
        let sender = parse_account_number(sender_number)?;
        let receiver = parse_account_number(receiver_number)?;
        let amount = Amount::parse(amount).map_err(InvalidDataError::from)?;

        let sender_account = self
            .accounts
            .get_by_account_number(&sender)
            .await
            .map_err(|e| log_repository_error(e, "transfer"))?
            .ok_or_else(|| {
                tracing::warn!(account_number = %sender, "transfer rejected: sender unknown");
                LedgerError::AccountNotFound(sender.to_string())
            })?;

        if self
            .accounts
            .get_by_account_number(&receiver)
            .await
            .map_err(|e| log_repository_error(e, "transfer"))?
            .is_none()
        {
            tracing::warn!(account_number = %receiver, "transfer rejected: receiver unknown");
            return Err(LedgerError::AccountNotFound(receiver.to_string()));
        }

        if sender == receiver {
            return Err(LedgerError::InvalidData(InvalidDataError::SameAccount));
        }

        if sender_account.balance < amount.as_decimal() {
            tracing::warn!(
                account_number = %sender,
                "transfer rejected: insufficient balance"
            );
            return Err(LedgerError::InsufficientBalance);
        }

        match self.accounts.transfer(&sender, &receiver, amount).await {
            Ok(()) => Ok(()),
            Err(TransferError::InsufficientBalance) => {
                // Lost a race against another transfer from the same sender;
                // the conditional debit kept the balance non-negative.
                tracing::warn!(
                    account_number = %sender,
                    "transfer rejected at debit: insufficient balance"
                );
                Err(LedgerError::InsufficientBalance)
            }
            Err(TransferError::SenderMissing) => {
                Err(LedgerError::AccountNotFound(sender.to_string()))
            }
            Err(TransferError::ReceiverMissing) => {
                Err(LedgerError::AccountNotFound(receiver.to_string()))
            }
            Err(TransferError::Database(e)) => Err(log_repository_error(
                RepositoryError::Database(e),
                "transfer",
            )),
        }
    }

    /// List the transfer history of an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidData` if the number is malformed.
    /// Returns `LedgerError::AccountNotFound` if the account is unknown.
    /// Returns `LedgerError::Repository` if the store fails.
    pub async fn transfer_history(
        &self,
        account_number: &str,
    ) -> Result<Vec<TransferRecord>, LedgerError> {
        let account = self.get_account(account_number).await?;

        self.accounts
            .transfers_for_account(&account.account_number)
            .await
            .map_err(|e| log_repository_error(e, "transfer history"))
    }
}
