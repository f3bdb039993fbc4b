//! Read-side report derivation.
//!
//! Every builder here is a pure aggregation over per-account activity. The
//! callers assemble the activity from the entry log (scoped to a boarding
//! house, posted transactions only, soft-deleted accounts excluded) and the
//! builders restate it into report shape.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::Zero;

use super::error::ReportError;
use super::types::{
    AccountActivity, BalanceSheet, IncomeStatement, ReportLine, ReportSection, TrialBalance,
    TrialBalanceRow, TrialBalanceSummary,
};
use crate::coa::AccountType;

/// One minor currency unit, absorbing rounding in the balance sheet equation.
const BALANCE_SHEET_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Builds the trial balance over the given per-account activity.
///
/// The natural balance of each leaf is projected onto the debit column for
/// debit-normal types and the credit column otherwise; a negative natural
/// balance flips to the opposite column so both columns stay non-negative.
///
/// # Errors
///
/// Returns [`ReportError::TrialBalanceMismatch`] when the column totals
/// disagree. That is a ledger integrity bug, not a caller mistake.
pub fn build_trial_balance(
    as_of_date: NaiveDate,
    activities: &[AccountActivity],
) -> Result<TrialBalance, ReportError> {
    let mut rows: Vec<TrialBalanceRow> = activities
        .iter()
        .filter(|a| a.account.is_postable())
        .map(|activity| {
            let balance = activity.natural_balance();
            let on_debit_side = activity.account.account_type.is_debit_normal()
                == !balance.is_sign_negative();
            let magnitude = balance.abs();
            let (debit_balance, credit_balance) = if on_debit_side {
                (magnitude, Decimal::ZERO)
            } else {
                (Decimal::ZERO, magnitude)
            };
            TrialBalanceRow {
                account_id: activity.account.id,
                code: activity.account.code.clone(),
                name: activity.account.name.clone(),
                account_type: activity.account.account_type,
                debit_balance,
                credit_balance,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.code.cmp(&b.code));

    let total_debits: Decimal = rows.iter().map(|r| r.debit_balance).sum();
    let total_credits: Decimal = rows.iter().map(|r| r.credit_balance).sum();

    if total_debits != total_credits {
        return Err(ReportError::TrialBalanceMismatch {
            debits: total_debits,
            credits: total_credits,
        });
    }

    Ok(TrialBalance {
        as_of_date,
        accounts: rows,
        summary: TrialBalanceSummary {
            total_debits,
            total_credits,
            difference: total_debits - total_credits,
            is_balanced: true,
        },
    })
}

fn section_for(activities: &[AccountActivity], account_type: AccountType) -> ReportSection {
    let mut lines: Vec<ReportLine> = activities
        .iter()
        .filter(|a| a.account.is_postable() && a.account.account_type == account_type)
        .map(|activity| ReportLine {
            account_id: activity.account.id,
            code: activity.account.code.clone(),
            name: activity.account.name.clone(),
            amount: activity.natural_balance(),
        })
        .collect();
    lines.sort_by(|a, b| a.code.cmp(&b.code));

    let total = lines.iter().map(|l| l.amount).sum();
    ReportSection { lines, total }
}

/// Builds the balance sheet as of a date.
///
/// `activities` must cover all leaf accounts from inception through the
/// snapshot date. Net income for the window is computed over the Revenue and
/// Expense activity and folded into equity, so the equation reads
/// `assets == liabilities + equity + net_income`.
///
/// # Errors
///
/// Returns [`ReportError::BalanceSheetUnbalanced`] when the equation is
/// violated beyond one minor currency unit.
pub fn build_balance_sheet(
    as_of_date: NaiveDate,
    activities: &[AccountActivity],
) -> Result<BalanceSheet, ReportError> {
    let assets = section_for(activities, AccountType::Asset);
    let liabilities = section_for(activities, AccountType::Liability);
    let equity = section_for(activities, AccountType::Equity);
    let revenue = section_for(activities, AccountType::Revenue);
    let expenses = section_for(activities, AccountType::Expense);

    let net_income = revenue.total - expenses.total;
    let total_equity_with_income = equity.total + net_income;
    let liabilities_and_equity = liabilities.total + total_equity_with_income;

    if (assets.total - liabilities_and_equity).abs() >= BALANCE_SHEET_EPSILON {
        return Err(ReportError::BalanceSheetUnbalanced {
            assets: assets.total,
            liabilities_and_equity,
        });
    }

    Ok(BalanceSheet {
        as_of_date,
        assets,
        liabilities,
        equity,
        net_income,
        total_equity_with_income,
    })
}

/// Builds the income statement over a date window.
///
/// `activities` must be restricted to posted entries dated within
/// `[start_date, end_date]`.
#[must_use]
pub fn build_income_statement(
    start_date: NaiveDate,
    end_date: NaiveDate,
    activities: &[AccountActivity],
) -> IncomeStatement {
    let mut revenue = section_for(activities, AccountType::Revenue);
    let mut expenses = section_for(activities, AccountType::Expense);

    // Zero-activity accounts add noise to the statement.
    revenue.lines.retain(|l| !l.amount.is_zero());
    expenses.lines.retain(|l| !l.amount.is_zero());

    let net_income = revenue.total - expenses.total;
    IncomeStatement {
        start_date,
        end_date,
        revenue,
        expenses,
        net_income,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::Account;
    use rust_decimal_macros::dec;
    use lodgera_shared::types::{AccountId, BoardingHouseId};

    fn activity(
        code: &str,
        account_type: AccountType,
        total_debit: Decimal,
        total_credit: Decimal,
    ) -> AccountActivity {
        AccountActivity {
            account: Account {
                id: AccountId::new(),
                boarding_house_id: BoardingHouseId::new(),
                code: code.to_string(),
                name: format!("Account {code}"),
                account_type,
                is_category: false,
                is_cash_account: false,
                parent_id: None,
            },
            total_debit,
            total_credit,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
    }

    #[test]
    fn test_trial_balance_single_posting() {
        // Debit cash 100.00, credit rent revenue 100.00.
        let activities = vec![
            activity("1000", AccountType::Asset, dec!(100.00), dec!(0)),
            activity("4000", AccountType::Revenue, dec!(0), dec!(100.00)),
        ];

        let report = build_trial_balance(today(), &activities).unwrap();
        assert_eq!(report.accounts[0].debit_balance, dec!(100.00));
        assert_eq!(report.accounts[0].credit_balance, dec!(0));
        assert_eq!(report.accounts[1].credit_balance, dec!(100.00));
        assert_eq!(report.summary.total_debits, dec!(100.00));
        assert_eq!(report.summary.total_credits, dec!(100.00));
        assert!(report.summary.is_balanced);
        assert_eq!(report.summary.difference, dec!(0));
    }

    #[test]
    fn test_trial_balance_negative_natural_balance_flips_column() {
        // An overdrawn asset sits on the credit column.
        let activities = vec![
            activity("1000", AccountType::Asset, dec!(50.00), dec!(80.00)),
            activity("2000", AccountType::Liability, dec!(30.00), dec!(0)),
        ];

        let report = build_trial_balance(today(), &activities).unwrap();
        let cash = &report.accounts[0];
        assert_eq!(cash.debit_balance, dec!(0));
        assert_eq!(cash.credit_balance, dec!(30.00));
        let payable = &report.accounts[1];
        assert_eq!(payable.debit_balance, dec!(30.00));
        assert_eq!(payable.credit_balance, dec!(0));
        assert!(report.summary.is_balanced);
    }

    #[test]
    fn test_trial_balance_mismatch_is_integrity_error() {
        let activities = vec![activity("1000", AccountType::Asset, dec!(100.00), dec!(0))];
        assert!(matches!(
            build_trial_balance(today(), &activities),
            Err(ReportError::TrialBalanceMismatch { .. })
        ));
    }

    #[test]
    fn test_trial_balance_excludes_category_accounts() {
        let mut category = activity("1", AccountType::Asset, dec!(0), dec!(0));
        category.account.is_category = true;
        let report = build_trial_balance(today(), &[category]).unwrap();
        assert!(report.accounts.is_empty());
    }

    #[test]
    fn test_balance_sheet_equation_with_net_income() {
        // Owner puts in 1000, earns 200 rent, pays 50 utilities.
        let activities = vec![
            activity("1000", AccountType::Asset, dec!(1200.00), dec!(50.00)),
            activity("3000", AccountType::Equity, dec!(0), dec!(1000.00)),
            activity("4000", AccountType::Revenue, dec!(0), dec!(200.00)),
            activity("5000", AccountType::Expense, dec!(50.00), dec!(0)),
        ];

        let sheet = build_balance_sheet(today(), &activities).unwrap();
        assert_eq!(sheet.assets.total, dec!(1150.00));
        assert_eq!(sheet.liabilities.total, dec!(0));
        assert_eq!(sheet.equity.total, dec!(1000.00));
        assert_eq!(sheet.net_income, dec!(150.00));
        assert_eq!(sheet.total_equity_with_income, dec!(1150.00));
    }

    #[test]
    fn test_balance_sheet_violation_beyond_epsilon() {
        let activities = vec![
            activity("1000", AccountType::Asset, dec!(100.00), dec!(0)),
            activity("3000", AccountType::Equity, dec!(0), dec!(99.98)),
        ];
        assert!(matches!(
            build_balance_sheet(today(), &activities),
            Err(ReportError::BalanceSheetUnbalanced { .. })
        ));
    }

    #[test]
    fn test_balance_sheet_tolerates_one_minor_unit_short() {
        let activities = vec![
            activity("1000", AccountType::Asset, dec!(100.00), dec!(0)),
            activity("3000", AccountType::Equity, dec!(0), dec!(99.995)),
        ];
        assert!(build_balance_sheet(today(), &activities).is_ok());
    }

    #[test]
    fn test_income_statement() {
        let activities = vec![
            activity("4000", AccountType::Revenue, dec!(0), dec!(750.00)),
            activity("4100", AccountType::Revenue, dec!(0), dec!(0)),
            activity("5000", AccountType::Expense, dec!(300.00), dec!(0)),
        ];

        let statement = build_income_statement(today(), today(), &activities);
        assert_eq!(statement.revenue.total, dec!(750.00));
        assert_eq!(statement.expenses.total, dec!(300.00));
        assert_eq!(statement.net_income, dec!(450.00));
        // Zero-activity revenue account is dropped from the lines.
        assert_eq!(statement.revenue.lines.len(), 1);
    }
}
