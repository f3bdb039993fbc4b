//! Business rule validation for posting.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;

use lodgera_shared::types::AccountId;

use super::entry::EntryInput;
use super::types::EntryType;
use crate::coa::Account;

/// Validation errors for posting operations.
#[derive(Debug, Error)]
pub enum LedgerValidationError {
    /// Transaction entries do not balance.
    #[error("Transaction is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Transaction has fewer than two entries.
    #[error("Transaction must have at least two entries")]
    EmptyEntrySet,

    /// Transaction has only one side (all debits or all credits).
    #[error("Transaction must have both debit and credit entries")]
    SingleSided,

    /// Entry amount is zero or negative.
    #[error("Entry amount must be positive")]
    InvalidAmount,

    /// Entry references an account unknown in this boarding house.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    /// Entry references a non-postable category account.
    #[error("Cannot post to category account: {0}")]
    PostingToCategoryAccount(AccountId),
}

/// Validates that a set of entry inputs forms a postable, balanced set.
///
/// # Errors
///
/// Returns an error if the entries are unbalanced, single-sided, fewer than
/// two, or carry a non-positive amount.
pub fn validate_entries(entries: &[EntryInput]) -> Result<(), LedgerValidationError> {
    if entries.len() < 2 {
        return Err(LedgerValidationError::EmptyEntrySet);
    }

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for entry in entries {
        if entry.amount <= Decimal::ZERO {
            return Err(LedgerValidationError::InvalidAmount);
        }

        match entry.entry_type {
            EntryType::Debit => {
                total_debits += entry.amount;
                has_debit = true;
            }
            EntryType::Credit => {
                total_credits += entry.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerValidationError::SingleSided);
    }

    // Exact decimal comparison, no epsilon.
    if total_debits != total_credits {
        return Err(LedgerValidationError::Unbalanced {
            debits: total_debits,
            credits: total_credits,
        });
    }

    Ok(())
}

/// Validates that every referenced account exists and accepts postings.
///
/// # Errors
///
/// Returns an error if an entry references an unknown account or a category
/// node.
pub fn validate_accounts(
    entries: &[EntryInput],
    accounts: &HashMap<AccountId, Account>,
) -> Result<(), LedgerValidationError> {
    for entry in entries {
        let account = accounts
            .get(&entry.account_id)
            .ok_or(LedgerValidationError::UnknownAccount(entry.account_id))?;

        if !account.is_postable() {
            return Err(LedgerValidationError::PostingToCategoryAccount(account.id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::AccountType;
    use rust_decimal_macros::dec;
    use lodgera_shared::types::BoardingHouseId;

    fn make_entry(entry_type: EntryType, amount: Decimal) -> EntryInput {
        EntryInput {
            account_id: AccountId::new(),
            entry_type,
            amount,
            description: None,
        }
    }

    fn make_account(is_category: bool) -> Account {
        Account {
            id: AccountId::new(),
            boarding_house_id: BoardingHouseId::new(),
            code: "1000".to_string(),
            name: "Cash".to_string(),
            account_type: AccountType::Asset,
            is_category,
            is_cash_account: false,
            parent_id: None,
        }
    }

    #[test]
    fn test_balanced_entries() {
        let entries = vec![
            make_entry(EntryType::Debit, dec!(100.00)),
            make_entry(EntryType::Credit, dec!(100.00)),
        ];
        assert!(validate_entries(&entries).is_ok());
    }

    #[test]
    fn test_unbalanced_entries() {
        let entries = vec![
            make_entry(EntryType::Debit, dec!(50.00)),
            make_entry(EntryType::Credit, dec!(40.00)),
        ];
        assert!(matches!(
            validate_entries(&entries),
            Err(LedgerValidationError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_fewer_than_two_entries() {
        assert!(matches!(
            validate_entries(&[]),
            Err(LedgerValidationError::EmptyEntrySet)
        ));
        assert!(matches!(
            validate_entries(&[make_entry(EntryType::Debit, dec!(10))]),
            Err(LedgerValidationError::EmptyEntrySet)
        ));
    }

    #[test]
    fn test_single_sided() {
        let entries = vec![
            make_entry(EntryType::Debit, dec!(100.00)),
            make_entry(EntryType::Debit, dec!(50.00)),
        ];
        assert!(matches!(
            validate_entries(&entries),
            Err(LedgerValidationError::SingleSided)
        ));
    }

    #[test]
    fn test_non_positive_amount() {
        let entries = vec![
            make_entry(EntryType::Debit, dec!(0)),
            make_entry(EntryType::Credit, dec!(0)),
        ];
        assert!(matches!(
            validate_entries(&entries),
            Err(LedgerValidationError::InvalidAmount)
        ));
    }

    #[test]
    fn test_posting_to_category_account_rejected() {
        let category = make_account(true);
        let leaf = make_account(false);

        let entries = vec![
            EntryInput {
                account_id: category.id,
                entry_type: EntryType::Debit,
                amount: dec!(10),
                description: None,
            },
            EntryInput {
                account_id: leaf.id,
                entry_type: EntryType::Credit,
                amount: dec!(10),
                description: None,
            },
        ];

        let mut accounts = HashMap::new();
        accounts.insert(category.id, category);
        accounts.insert(leaf.id, leaf);

        assert!(matches!(
            validate_accounts(&entries, &accounts),
            Err(LedgerValidationError::PostingToCategoryAccount(_))
        ));
    }

    #[test]
    fn test_unknown_account_rejected() {
        let entries = vec![
            make_entry(EntryType::Debit, dec!(10)),
            make_entry(EntryType::Credit, dec!(10)),
        ];
        let accounts = HashMap::new();
        assert!(matches!(
            validate_accounts(&entries, &accounts),
            Err(LedgerValidationError::UnknownAccount(_))
        ));
    }
}
