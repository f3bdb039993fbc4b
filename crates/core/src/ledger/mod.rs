//! Double-entry posting rules and balance arithmetic.
//!
//! This module implements the core ledger functionality:
//! - Journal entries (debits and credits)
//! - Transaction headers and categories
//! - Posting validation (balance, postability)
//! - Balance sign conventions

pub mod balance;
pub mod entry;
pub mod types;
pub mod validation;

pub use balance::balance_change;
pub use entry::{EntryInput, JournalEntry};
pub use types::{EntryType, Transaction, TransactionCategory, TransactionStatus};
pub use validation::{LedgerValidationError, validate_accounts, validate_entries};
