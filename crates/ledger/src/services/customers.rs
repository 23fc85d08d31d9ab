//! Customer service: registration, authentication, and record maintenance.

use sqlx::PgPool;

use crate::db::{AccountRepository, CustomerRepository, RepositoryError};
use crate::error::LedgerError;
use crate::models::{Customer, CustomerUpdate};
use crate::services::password::PasswordHasher;
use crate::services::{log_repository_error, parse_email};
use crate::validation::{ValidationType, validate};

/// Customer-facing half of the ledger service.
///
/// Every mutating operation validates its inputs first and fails fast on the
/// first violated rule; nothing is persisted for a partially valid request.
pub struct CustomerService<'a> {
    customers: CustomerRepository<'a>,
    accounts: AccountRepository<'a>,
    hasher: &'a dyn PasswordHasher,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, hasher: &'a dyn PasswordHasher) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            accounts: AccountRepository::new(pool),
            hasher,
        }
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidData` if a name, the email, or the
    /// password fails validation.
    /// Returns `LedgerError::DuplicateEmail` if the email is already
    /// registered.
    /// Returns `LedgerError::Repository` if the store fails.
    pub async fn create_customer(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        raw_password: &str,
    ) -> Result<Customer, LedgerError> {
        validate(ValidationType::Name, first_name)?;
        validate(ValidationType::Name, last_name)?;
        validate(ValidationType::Email, email)?;
        validate(ValidationType::Password, raw_password)?;
        let email = parse_email(email)?;

        let existing = self
            .customers
            .get_by_email(&email)
            .await
            .map_err(|e| log_repository_error(e, "create customer"))?;
        if existing.is_some() {
            tracing::warn!(email = %email, "registration rejected: email already in use");
            return Err(LedgerError::DuplicateEmail);
        }

        let password_hash = self
            .hasher
            .hash(raw_password)
            .map_err(|e| {
                tracing::error!(error = %e, "password hasher failed");
                LedgerError::Internal(e.to_string())
            })?;

        let customer = self
            .customers
            .create(first_name, last_name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                // The unique index is the last line of defense against a
                // concurrent registration slipping past the lookup above.
                RepositoryError::Conflict(_) => LedgerError::DuplicateEmail,
                other => log_repository_error(other, "create customer"),
            })?;

        tracing::info!(email = %customer.email, id = %customer.id, "customer registered");
        Ok(customer)
    }

    /// Check a customer's password.
    ///
    /// Returns `true` when the password matches, `false` when it does not.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidData` if the email is malformed.
    /// Returns `LedgerError::CustomerNotFound` if no customer is registered
    /// under the email.
    /// Returns `LedgerError::Repository` if the store fails, and
    /// `LedgerError::Internal` if the hasher does.
    pub async fn authenticate(&self, email: &str, raw_password: &str) -> Result<bool, LedgerError> {
        validate(ValidationType::Email, email)?;
        let email = parse_email(email)?;

        let (_, hash) = self
            .customers
            .password_hash(&email)
            .await
            .map_err(|e| log_repository_error(e, "authenticate"))?
            .ok_or_else(|| LedgerError::CustomerNotFound(email.to_string()))?;

        let matches = self
            .hasher
            .verify(raw_password, &hash)
            .map_err(|e| {
                tracing::error!(error = %e, "password hasher failed");
                LedgerError::Internal(e.to_string())
            })?;

        Ok(matches)
    }

    /// Look up a customer by email.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidData` if the email is malformed.
    /// Returns `LedgerError::CustomerNotFound` if absent.
    /// Returns `LedgerError::Repository` if the store fails.
    pub async fn get_customer(&self, email: &str) -> Result<Customer, LedgerError> {
        validate(ValidationType::Email, email)?;
        let email = parse_email(email)?;

        self.customers
            .get_by_email(&email)
            .await
            .map_err(|e| log_repository_error(e, "get customer"))?
            .ok_or_else(|| LedgerError::CustomerNotFound(email.to_string()))
    }

    /// List all registered customers.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Repository` if the store fails.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, LedgerError> {
        self.customers
            .list_all()
            .await
            .map_err(|e| log_repository_error(e, "list customers"))
    }

    /// Apply a field edit to a customer and return the canonical record,
    /// re-read under its (possibly new) email.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidData` if the target email or any supplied
    /// field fails validation (fail-fast; nothing is persisted).
    /// Returns `LedgerError::CustomerNotFound` if the target is absent.
    /// Returns `LedgerError::DuplicateEmail` if the new email is taken.
    /// Returns `LedgerError::Repository` if the store fails.
    pub async fn update_customer(
        &self,
        email: &str,
        update: &CustomerUpdate,
    ) -> Result<Customer, LedgerError> {
        validate(ValidationType::Email, email)?;
        if let Some(first_name) = &update.first_name {
            validate(ValidationType::Name, first_name)?;
        }
        if let Some(last_name) = &update.last_name {
            validate(ValidationType::Name, last_name)?;
        }
        let new_email = match update.email.as_deref() {
            Some(e) => {
                validate(ValidationType::Email, e)?;
                Some(parse_email(e)?)
            }
            None => None,
        };
        let email = parse_email(email)?;

        let existing = self
            .customers
            .get_by_email(&email)
            .await
            .map_err(|e| log_repository_error(e, "update customer"))?;
        if existing.is_none() {
            tracing::warn!(email = %email, "update rejected: customer does not exist");
            return Err(LedgerError::CustomerNotFound(email.to_string()));
        }

        self.customers
            .update(
                &email,
                update.first_name.as_deref(),
                update.last_name.as_deref(),
                new_email.as_ref(),
            )
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => LedgerError::CustomerNotFound(email.to_string()),
                RepositoryError::Conflict(_) => LedgerError::DuplicateEmail,
                other => log_repository_error(other, "update customer"),
            })?;

        // Return canonical state, keyed by whichever email the row now has.
        let current_email = new_email.unwrap_or(email);
        self.customers
            .get_by_email(&current_email)
            .await
            .map_err(|e| log_repository_error(e, "re-read updated customer"))?
            .ok_or_else(|| LedgerError::CustomerNotFound(current_email.to_string()))
    }

    /// Delete a customer.
    ///
    /// Deletion is blocked while the customer owns any account; accounts
    /// must be closed out first, so no account is ever orphaned.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidData` if the email is malformed.
    /// Returns `LedgerError::CustomerNotFound` if absent.
    /// Returns `LedgerError::CustomerHasAccounts` if any account remains.
    /// Returns `LedgerError::Repository` if the store fails.
    pub async fn delete_customer(&self, email: &str) -> Result<(), LedgerError> {
        validate(ValidationType::Email, email)?;
        let email = parse_email(email)?;

        let customer = self
            .customers
            .get_by_email(&email)
            .await
            .map_err(|e| log_repository_error(e, "delete customer"))?
            .ok_or_else(|| LedgerError::CustomerNotFound(email.to_string()))?;

        let open_accounts = self
            .accounts
            .count_for_customer(customer.id)
            .await
            .map_err(|e| log_repository_error(e, "delete customer"))?;
        if open_accounts > 0 {
            tracing::warn!(
                email = %email,
                open_accounts,
                "deletion rejected: customer still has open accounts"
            );
            return Err(LedgerError::CustomerHasAccounts);
        }

        self.customers.delete(&email).await.map_err(|e| match e {
            // ON DELETE RESTRICT backs up the count check above.
            RepositoryError::Conflict(_) => LedgerError::CustomerHasAccounts,
            other => log_repository_error(other, "delete customer"),
        })?;

        tracing::info!(email = %email, "customer deleted");
        Ok(())
    }
}
