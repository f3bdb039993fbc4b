//! Bank reconciliation domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lodgera_shared::types::{AccountId, BoardingHouseId, ReconciliationId, ReconciliationItemId};

use crate::ledger::EntryType;

/// Reconciliation session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationStatus {
    /// Open: items are still being matched.
    Pending,
    /// Closed with zero difference and all items matched.
    Reconciled,
    /// Closed with an accepted residual difference (for example bank fees
    /// not yet booked).
    Unreconciled,
}

impl ReconciliationStatus {
    /// Returns true if the session still accepts matching.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Which stream a reconciliation item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemSource {
    /// Internal journal entry for the cash/bank account.
    Book,
    /// Imported bank statement line.
    Bank,
}

/// One book- or bank-side item inside a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationItem {
    /// Unique identifier.
    pub id: ReconciliationItemId,
    /// Item date (transaction date or statement line date).
    pub date: NaiveDate,
    /// Positive amount.
    pub amount: Decimal,
    /// Debit or credit from the cash account's perspective.
    pub entry_type: EntryType,
    /// Reference (receipt number, statement line reference).
    pub reference: Option<String>,
    /// Whether the item has been matched.
    pub is_reconciled: bool,
    /// The counterpart item on the other stream, once matched.
    pub matched_counterpart_id: Option<ReconciliationItemId>,
}

impl ReconciliationItem {
    /// Builds an unmatched item.
    #[must_use]
    pub fn unmatched(
        date: NaiveDate,
        amount: Decimal,
        entry_type: EntryType,
        reference: Option<String>,
    ) -> Self {
        Self {
            id: ReconciliationItemId::new(),
            date,
            amount,
            entry_type,
            reference,
            is_reconciled: false,
            matched_counterpart_id: None,
        }
    }
}

/// A reconciliation session for one cash/bank account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationSession {
    /// Unique identifier.
    pub id: ReconciliationId,
    /// Boarding house scope.
    pub boarding_house_id: BoardingHouseId,
    /// The cash/bank account being reconciled.
    pub account_id: AccountId,
    /// Statement date.
    pub reconciliation_date: NaiveDate,
    /// Ledger-side balance at the statement date.
    pub book_balance: Decimal,
    /// Statement-side balance.
    pub bank_balance: Decimal,
    /// Session status.
    pub status: ReconciliationStatus,
    /// Operator notes recorded at close.
    pub notes: Option<String>,
    /// Internal journal entry items.
    pub book_items: Vec<ReconciliationItem>,
    /// Imported statement line items.
    pub bank_items: Vec<ReconciliationItem>,
}

impl ReconciliationSession {
    /// The residual difference, `bank_balance - book_balance`.
    ///
    /// Always recomputed, never cached: matching items does not move
    /// balances, only a correcting posting does.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.bank_balance - self.book_balance
    }

    /// Returns true when every item on both streams is matched.
    #[must_use]
    pub fn all_items_matched(&self) -> bool {
        self.book_items.iter().all(|i| i.is_reconciled)
            && self.bank_items.iter().all(|i| i.is_reconciled)
    }
}
