//! Integration tests for the money-transfer properties.
//!
//! These tests require a running PostgreSQL database (see the crate docs)
//! and are ignored by default.

use rust_decimal::Decimal;

use clearbank_core::AccountNumber;
use clearbank_integration_tests::{TestContext, unique_email};
use clearbank_ledger::LedgerError;
use clearbank_ledger::services::AccountService;
use clearbank_ledger::validation::InvalidDataError;

const PASSWORD: &str = "a sufficiently long password";

fn dec(s: &str) -> Decimal {
    s.parse().expect("test literal")
}

/// Register a customer and open one account, returning the account number.
async fn open_funded_account(ctx: &TestContext, tag: &str, balance: &str) -> String {
    let email = unique_email(tag);
    ctx.customers()
        .create_customer("Test", "Customer", &email, PASSWORD)
        .await
        .expect("registration should succeed");
    let account = ctx
        .accounts()
        .open_account(&email)
        .await
        .expect("open account");

    assert_eq!(account.balance, Decimal::ZERO, "accounts open at zero");
    ctx.seed_balance(account.account_number.as_str(), dec(balance))
        .await;
    account.account_number.into_inner()
}

/// An account number that is valid in shape but absent from the store.
async fn unknown_account_number(ctx: &TestContext) -> String {
    loop {
        let candidate = AccountNumber::generate(&mut rand::rng());
        let missing = matches!(
            ctx.accounts().get_account(candidate.as_str()).await,
            Err(LedgerError::AccountNotFound(_))
        );
        if missing {
            return candidate.into_inner();
        }
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn opened_accounts_have_distinct_ten_digit_numbers() {
    let ctx = TestContext::new().await;
    let email = unique_email("numbers");
    ctx.customers()
        .create_customer("Test", "Customer", &email, PASSWORD)
        .await
        .expect("registration should succeed");

    let mut seen = std::collections::HashSet::new();
    for _ in 0..5 {
        let account = ctx
            .accounts()
            .open_account(&email)
            .await
            .expect("open account");
        let number = account.account_number;
        assert_eq!(number.as_str().len(), 10);
        assert!(number.as_str().chars().all(|c| c.is_ascii_digit()));
        assert!(seen.insert(number), "account numbers must be unique");
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn transfer_conserves_the_total_balance() {
    let ctx = TestContext::new().await;
    let sender = open_funded_account(&ctx, "conserve-s", "100.00").await;
    let receiver = open_funded_account(&ctx, "conserve-r", "0.00").await;

    ctx.accounts()
        .transfer_money(&sender, &receiver, "40.00")
        .await
        .expect("transfer should succeed");

    assert_eq!(ctx.balance_of(&sender).await, dec("60.00"));
    assert_eq!(ctx.balance_of(&receiver).await, dec("40.00"));

    // Exactly one log row, carrying the transferred amount.
    assert_eq!(ctx.transfer_rows_for(&sender).await, 1);
    let history = ctx
        .accounts()
        .transfer_history(&sender)
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, dec("40.00"));
    assert_eq!(history[0].sender_account_number.as_str(), sender);
    assert_eq!(history[0].receiver_account_number.as_str(), receiver);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn insufficient_balance_leaves_no_trace()
{
    let ctx = TestContext::new().await;
    let sender = open_funded_account(&ctx, "short-s", "100.00").await;
    let receiver = open_funded_account(&ctx, "short-r", "0.00").await;

    let err = ctx
        .accounts()
        .transfer_money(&sender, &receiver, "100.01")
        .await
        .expect_err("amount above the balance must be rejected");
    assert!(matches!(err, LedgerError::InsufficientBalance));

    // No partial mutation, no log row.
    assert_eq!(ctx.balance_of(&sender).await, dec("100.00"));
    assert_eq!(ctx.balance_of(&receiver).await, dec("0.00"));
    assert_eq!(ctx.transfer_rows_for(&sender).await, 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn transfer_to_the_same_account_is_rejected() {
    let ctx = TestContext::new().await;
    let sender = open_funded_account(&ctx, "self", "100.00").await;

    let err = ctx
        .accounts()
        .transfer_money(&sender, &sender, "10.00")
        .await
        .expect_err("self-transfer must be rejected");
    assert!(matches!(
        err,
        LedgerError::InvalidData(InvalidDataError::SameAccount)
    ));

    assert_eq!(ctx.balance_of(&sender).await, dec("100.00"));
    assert_eq!(ctx.transfer_rows_for(&sender).await, 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn transfer_involving_an_unknown_account_writes_no_log_row() {
    let ctx = TestContext::new().await;
    let funded = open_funded_account(&ctx, "known", "100.00").await;
    let ghost = unknown_account_number(&ctx).await;

    let err = ctx
        .accounts()
        .transfer_money(&funded, &ghost, "10.00")
        .await
        .expect_err("unknown receiver must be rejected");
    assert!(matches!(err, LedgerError::AccountNotFound(_)));

    let err = ctx
        .accounts()
        .transfer_money(&ghost, &funded, "10.00")
        .await
        .expect_err("unknown sender must be rejected");
    assert!(matches!(err, LedgerError::AccountNotFound(_)));

    assert_eq!(ctx.balance_of(&funded).await, dec("100.00"));
    assert_eq!(ctx.transfer_rows_for(&funded).await, 0);
    assert_eq!(ctx.transfer_rows_for(&ghost).await, 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn malformed_amounts_are_rejected_before_any_store_access() {
    let ctx = TestContext::new().await;
    let sender = open_funded_account(&ctx, "amounts-s", "100.00").await;
    let receiver = open_funded_account(&ctx, "amounts-r", "0.00").await;

    for bad_amount in ["0", "-5", "100.005", "10000000.00", "lots"] {
        let err = ctx
            .accounts()
            .transfer_money(&sender, &receiver, bad_amount)
            .await
            .expect_err("malformed amount must be rejected");
        assert!(
            matches!(err, LedgerError::InvalidData(_)),
            "amount {bad_amount:?} should be invalid data"
        );
    }

    assert_eq!(ctx.balance_of(&sender).await, dec("100.00"));
    assert_eq!(ctx.transfer_rows_for(&sender).await, 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn concurrent_transfers_cannot_overdraw_the_sender() {
    let ctx = TestContext::new().await;
    let sender = open_funded_account(&ctx, "race-s", "100.00").await;
    let receiver = open_funded_account(&ctx, "race-r", "0.00").await;

    // Two transfers that fit individually but not together.
    let spawn_transfer = |sender: String, receiver: String| {
        let pool = ctx.pool.clone();
        tokio::spawn(async move {
            let service = AccountService::new(&pool);
            service.transfer_money(&sender, &receiver, "60.00").await
        })
    };
    let first = spawn_transfer(sender.clone(), receiver.clone());
    let second = spawn_transfer(sender.clone(), receiver.clone());

    let results = [
        first.await.expect("task panicked"),
        second.await.expect("task panicked"),
    ];

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one of the racing transfers wins");
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, LedgerError::InsufficientBalance)),
        "the loser reports insufficient balance"
    );

    // The balance never went negative and money was conserved.
    assert_eq!(ctx.balance_of(&sender).await, dec("40.00"));
    assert_eq!(ctx.balance_of(&receiver).await, dec("60.00"));
    assert_eq!(ctx.transfer_rows_for(&sender).await, 1);
}
