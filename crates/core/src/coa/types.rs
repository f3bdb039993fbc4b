//! Chart of accounts domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lodgera_shared::types::{AccountId, BoardingHouseId};

/// Account type classification.
///
/// The type determines the natural balance side:
/// - Asset/Expense accounts are debit-normal
/// - Liability/Equity/Revenue accounts are credit-normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account (cash, bank, receivables, deposits).
    Asset,
    /// Liability account (payables, tenant deposits held).
    Liability,
    /// Equity account (owner capital, retained earnings).
    Equity,
    /// Revenue account (rent, penalties, other income).
    Revenue,
    /// Expense account (utilities, maintenance, supplies).
    Expense,
}

impl AccountType {
    /// Returns true for debit-normal account types (Asset, Expense).
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    /// Restates raw debit/credit totals into the account's natural sign.
    ///
    /// - Debit-normal: balance = debits - credits
    /// - Credit-normal: balance = credits - debits
    #[must_use]
    pub fn natural_balance(self, total_debit: Decimal, total_credit: Decimal) -> Decimal {
        if self.is_debit_normal() {
            total_debit - total_credit
        } else {
            total_credit - total_debit
        }
    }
}

/// A chart of accounts entry.
///
/// Accounts form a forest via `parent_id`. Category accounts are
/// organizational nodes and never accept journal entries; leaf accounts do.
/// An account's type is fixed at creation and children may carry any type:
/// reports compute by each leaf's own type, not inherited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Boarding house this account belongs to.
    pub boarding_house_id: BoardingHouseId,
    /// Account code, unique within the boarding house.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Whether this is a non-postable organizational node.
    pub is_category: bool,
    /// Whether this leaf is a designated cash/bank account (including petty
    /// cash), used by cashflow classification and reconciliation.
    pub is_cash_account: bool,
    /// Parent account, if any.
    pub parent_id: Option<AccountId>,
}

impl Account {
    /// Returns true if journal entries may be posted to this account.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        !self.is_category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_normal_types() {
        assert!(AccountType::Asset.is_debit_normal());
        assert!(AccountType::Expense.is_debit_normal());
        assert!(!AccountType::Liability.is_debit_normal());
        assert!(!AccountType::Equity.is_debit_normal());
        assert!(!AccountType::Revenue.is_debit_normal());
    }

    #[test]
    fn test_natural_balance() {
        assert_eq!(
            AccountType::Asset.natural_balance(dec!(100), dec!(30)),
            dec!(70)
        );
        assert_eq!(
            AccountType::Revenue.natural_balance(dec!(10), dec!(100)),
            dec!(90)
        );
        assert_eq!(
            AccountType::Liability.natural_balance(dec!(50), dec!(0)),
            dec!(-50)
        );
    }
}
