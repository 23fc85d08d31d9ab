//! Clearbank Core - Shared domain types.
//!
//! This crate provides the common types used across all Clearbank components:
//! - `ledger` - Account ledger and money-transfer services
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access. Every
//! type parses its invariants at construction, so the rest of the system can
//! pass them around without re-checking:
//!
//! - [`Email`] - lowercased, structurally valid address (unique customer key)
//! - [`AccountNumber`] - exactly 10 decimal digits
//! - [`Amount`] - positive money value, at most 2 fractional digits
//! - typed IDs via [`define_id!`]
//!
//! With the `postgres` feature, each type maps transparently onto its
//! underlying SQL representation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
