//! Journal entry domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lodgera_shared::types::{AccountId, JournalEntryId, TransactionId};

use super::types::EntryType;

/// A single journal entry line within a transaction.
///
/// Each transaction consists of at least two entries that must balance
/// (debits = credits) before it can be posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier for this entry.
    pub id: JournalEntryId,
    /// The transaction this entry belongs to.
    pub transaction_id: TransactionId,
    /// The account affected by this entry.
    pub account_id: AccountId,
    /// Whether this is a debit or credit.
    pub entry_type: EntryType,
    /// Amount, always positive.
    pub amount: Decimal,
    /// Optional description for this line item.
    pub description: Option<String>,
}

impl JournalEntry {
    /// Returns the raw signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.amount,
            EntryType::Credit => -self.amount,
        }
    }
}

/// Input for a single journal entry when creating a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Whether this is a debit or credit entry.
    pub entry_type: EntryType,
    /// The amount (must be positive).
    pub amount: Decimal,
    /// Optional description for this line.
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_amount() {
        let mut entry = JournalEntry {
            id: JournalEntryId::new(),
            transaction_id: TransactionId::new(),
            account_id: AccountId::new(),
            entry_type: EntryType::Debit,
            amount: dec!(125.50),
            description: None,
        };
        assert_eq!(entry.signed_amount(), dec!(125.50));

        entry.entry_type = EntryType::Credit;
        assert_eq!(entry.signed_amount(), dec!(-125.50));
    }
}
