//! Account balance arithmetic.
//!
//! The sign convention is: for Asset/Expense accounts a debit increases the
//! balance; for Liability/Equity/Revenue accounts a credit increases it. The
//! cached balance must always equal `sum(debits) - sum(credits)` restated
//! into the account's natural sign.

use rust_decimal::Decimal;

use super::types::EntryType;
use crate::coa::AccountType;

/// Calculates the signed balance change one entry applies to an account.
#[must_use]
pub fn balance_change(account_type: AccountType, entry_type: EntryType, amount: Decimal) -> Decimal {
    let increases = match entry_type {
        EntryType::Debit => account_type.is_debit_normal(),
        EntryType::Credit => !account_type.is_debit_normal(),
    };

    if increases { amount } else { -amount }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn account_type_strategy() -> impl Strategy<Value = AccountType> {
        prop_oneof![
            Just(AccountType::Asset),
            Just(AccountType::Liability),
            Just(AccountType::Equity),
            Just(AccountType::Revenue),
            Just(AccountType::Expense),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A debit and a credit of the same amount always cancel, whatever
        /// the account type.
        #[test]
        fn prop_debit_and_credit_cancel(
            account_type in account_type_strategy(),
            amount in amount_strategy(),
        ) {
            let debit = balance_change(account_type, EntryType::Debit, amount);
            let credit = balance_change(account_type, EntryType::Credit, amount);
            prop_assert_eq!(debit + credit, Decimal::ZERO);
        }

        /// Debit-normal accounts increase with debits; credit-normal
        /// accounts increase with credits.
        #[test]
        fn prop_natural_side_increases(
            account_type in account_type_strategy(),
            amount in amount_strategy(),
        ) {
            let natural_side = if account_type.is_debit_normal() {
                EntryType::Debit
            } else {
                EntryType::Credit
            };
            prop_assert_eq!(balance_change(account_type, natural_side, amount), amount);
        }
    }

    #[test]
    fn test_asset_balance_change() {
        assert_eq!(
            balance_change(AccountType::Asset, EntryType::Debit, dec!(100)),
            dec!(100)
        );
        assert_eq!(
            balance_change(AccountType::Asset, EntryType::Credit, dec!(50)),
            dec!(-50)
        );
    }

    #[test]
    fn test_revenue_balance_change() {
        assert_eq!(
            balance_change(AccountType::Revenue, EntryType::Credit, dec!(1000)),
            dec!(1000)
        );
        assert_eq!(
            balance_change(AccountType::Revenue, EntryType::Debit, dec!(100)),
            dec!(-100)
        );
    }
}
