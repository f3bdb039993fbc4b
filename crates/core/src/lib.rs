//! Core accounting logic for Lodgera.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here.
//!
//! # Modules
//!
//! - `coa` - Chart of accounts tree and traversal
//! - `ledger` - Double-entry posting rules and balance arithmetic
//! - `period` - Brought-down / carried-down period ledgers
//! - `reports` - Trial balance, balance sheet, income statement, cashflow
//! - `reconcile` - Bank reconciliation matching

pub mod coa;
pub mod ledger;
pub mod period;
pub mod reconcile;
pub mod reports;
