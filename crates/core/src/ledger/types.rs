//! Ledger domain types for transaction creation and validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use lodgera_shared::types::{BoardingHouseId, TransactionId};

/// Entry type: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

/// Transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Transaction is being drafted; no balance effects yet.
    Draft,
    /// Transaction has been posted to the ledger and affects balances.
    Posted,
}

impl TransactionStatus {
    /// Returns true if the transaction affects account balances.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        matches!(self, Self::Posted)
    }
}

/// Transaction category.
///
/// A closed enumeration replacing free-text type tags, so report
/// classification never falls back to substring matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    /// Manually entered journal.
    Manual,
    /// Expense posting (utilities, maintenance, supplies).
    Expense,
    /// Tenant payment (rent, deposits, penalties).
    Payment,
    /// Transfer between cash/bank accounts.
    Transfer,
    /// Accrued rent for overdue tenants.
    OverdueRent,
    /// Petty cash disbursement or replenishment.
    PettyCash,
    /// Opening balance at ledger inception.
    OpeningBalance,
    /// Reversal of a previously posted transaction.
    Reversal,
}

/// Transaction header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Boarding house scope.
    pub boarding_house_id: BoardingHouseId,
    /// Business date of the transaction.
    pub date: NaiveDate,
    /// Optional reference number (receipt, invoice, statement line).
    pub reference: Option<String>,
    /// Description.
    pub description: String,
    /// Category.
    pub category: TransactionCategory,
    /// Status.
    pub status: TransactionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_posted() {
        assert!(TransactionStatus::Posted.is_posted());
        assert!(!TransactionStatus::Draft.is_posted());
    }
}
