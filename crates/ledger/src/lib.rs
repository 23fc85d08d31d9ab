//! Clearbank Ledger - the account ledger and money-transfer subsystem.
//!
//! This library is the only part of the system that mutates money. It owns:
//!
//! - [`validation`] - field-level checks applied before every mutating call
//! - [`db`] - repositories over the `customer`, `bank_account`, and
//!   `transfer` tables, including the atomic dual-row transfer
//! - [`services`] - the orchestration layer enforcing business invariants
//!   (sufficient balance, distinct accounts, existence, email uniqueness)
//! - [`config`] - connection configuration, constructed once at process
//!   start and passed down
//!
//! # Architecture
//!
//! Transport layers (HTTP controllers, terminal clients) sit above this crate
//! and translate user input into service calls; they are not part of this
//! library. All durable state lives in PostgreSQL - there is no shared
//! in-process ledger state, so concurrent requests serialize only at the
//! store through row-level transactional updates.
//!
//! Balance invariants do not depend on caller discipline: the transfer debit
//! is a conditional atomic update inside a single transaction, so two racing
//! transfers can never drive a balance negative.
//!
//! # Migrations
//!
//! Schema migrations live in `migrations/` and are run explicitly via
//! `clearbank-cli migrate`, never automatically at startup.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod validation;

pub use config::{ConfigError, LedgerConfig};
pub use error::LedgerError;
