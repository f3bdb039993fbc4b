//! Cashflow statement derivation.
//!
//! A posted transaction enters the cashflow statement when at least one of
//! its entries hits a designated cash/bank account (petty cash included).
//! Direction comes from the cash side; the bucket comes from the
//! counter-account's type:
//!
//! - Revenue counter-account: operating
//! - Expense counter-account: operating
//! - Asset counter-account: investing
//! - Liability/Equity counter-account: financing
//!
//! A transaction whose entries all sit on cash accounts is an internal
//! transfer and is excluded entirely.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coa::AccountType;
use crate::ledger::EntryType;

/// One journal entry of a posted transaction, as seen by the classifier.
#[derive(Debug, Clone)]
pub struct CashflowEntry {
    /// Type of the account posted to.
    pub account_type: AccountType,
    /// Whether the account is a designated cash/bank account.
    pub is_cash_account: bool,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Positive amount.
    pub amount: Decimal,
}

/// A posted transaction, reduced to what cashflow classification needs.
#[derive(Debug, Clone)]
pub struct CashflowTransaction {
    /// Transaction date.
    pub date: NaiveDate,
    /// All journal entries of the transaction.
    pub entries: Vec<CashflowEntry>,
}

/// Cashflow bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashflowBucket {
    /// Revenue- or expense-backed cash movement.
    Operating,
    /// Cash movement against a non-cash asset.
    Investing,
    /// Cash movement against liabilities or equity.
    Financing,
}

impl CashflowBucket {
    fn for_counter_account(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Revenue | AccountType::Expense => Self::Operating,
            AccountType::Asset => Self::Investing,
            AccountType::Liability | AccountType::Equity => Self::Financing,
        }
    }
}

/// One classified cash movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashMovement {
    /// Movement date.
    pub date: NaiveDate,
    /// Bucket.
    pub bucket: CashflowBucket,
    /// Signed cash effect: positive for cash received, negative for cash
    /// paid out.
    pub signed_amount: Decimal,
}

/// Cashflow statement over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashflowStatement {
    /// Window start (inclusive).
    pub start_date: NaiveDate,
    /// Window end (inclusive).
    pub end_date: NaiveDate,
    /// Operating cash received.
    pub operating_inflows: Decimal,
    /// Operating cash paid out.
    pub operating_outflows: Decimal,
    /// `operating_inflows - operating_outflows`.
    pub operating_net: Decimal,
    /// Net cash spent on non-cash assets (negative when assets were sold).
    pub investing_net: Decimal,
    /// Net cash spent on liabilities/equity (negative for loans or capital
    /// received).
    pub financing_net: Decimal,
    /// `operating_net - investing_net - financing_net`.
    pub net_cashflow: Decimal,
}

/// One month of the monthly cashflow report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCashflow {
    /// Month label, `YYYY-MM`.
    pub month: String,
    /// Operating cash received.
    pub operating_inflows: Decimal,
    /// Operating cash paid out.
    pub operating_outflows: Decimal,
    /// `operating_inflows - operating_outflows`.
    pub operating_net: Decimal,
    /// Net cash spent on non-cash assets.
    pub investing_net: Decimal,
    /// Net cash spent on liabilities/equity.
    pub financing_net: Decimal,
    /// Running cash position across the report window.
    pub cumulative: Decimal,
}

/// Classifies one posted transaction into cash movements.
///
/// Returns one movement per non-cash counter-entry; a credit counter-entry
/// corresponds to cash received, a debit counter-entry to cash paid out.
/// Returns an empty list when no cash account is touched, or when every
/// entry sits on a cash account (internal transfer).
#[must_use]
pub fn classify_transaction(transaction: &CashflowTransaction) -> Vec<CashMovement> {
    let touches_cash = transaction.entries.iter().any(|e| e.is_cash_account);
    if !touches_cash {
        return Vec::new();
    }

    transaction
        .entries
        .iter()
        .filter(|e| !e.is_cash_account)
        .map(|entry| {
            let signed_amount = match entry.entry_type {
                EntryType::Credit => entry.amount,
                EntryType::Debit => -entry.amount,
            };
            CashMovement {
                date: transaction.date,
                bucket: CashflowBucket::for_counter_account(entry.account_type),
                signed_amount,
            }
        })
        .collect()
}

fn movements_in_window(
    start_date: NaiveDate,
    end_date: NaiveDate,
    transactions: &[CashflowTransaction],
) -> Vec<CashMovement> {
    transactions
        .iter()
        .filter(|t| t.date >= start_date && t.date <= end_date)
        .flat_map(classify_transaction)
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
struct BucketTotals {
    operating_inflows: Decimal,
    operating_outflows: Decimal,
    investing_net: Decimal,
    financing_net: Decimal,
}

impl BucketTotals {
    fn absorb(&mut self, movement: &CashMovement) {
        match movement.bucket {
            CashflowBucket::Operating => {
                if movement.signed_amount.is_sign_negative() {
                    self.operating_outflows -= movement.signed_amount;
                } else {
                    self.operating_inflows += movement.signed_amount;
                }
            }
            // Investing/financing are reported as net cash spent, so the
            // signed cash effect flips.
            CashflowBucket::Investing => self.investing_net -= movement.signed_amount,
            CashflowBucket::Financing => self.financing_net -= movement.signed_amount,
        }
    }

    fn operating_net(&self) -> Decimal {
        self.operating_inflows - self.operating_outflows
    }

    fn net_cashflow(&self) -> Decimal {
        self.operating_net() - self.investing_net - self.financing_net
    }
}

/// Builds the cashflow statement over a date window.
#[must_use]
pub fn build_cashflow(
    start_date: NaiveDate,
    end_date: NaiveDate,
    transactions: &[CashflowTransaction],
) -> CashflowStatement {
    let mut totals = BucketTotals::default();
    for movement in movements_in_window(start_date, end_date, transactions) {
        totals.absorb(&movement);
    }

    CashflowStatement {
        start_date,
        end_date,
        operating_inflows: totals.operating_inflows,
        operating_outflows: totals.operating_outflows,
        operating_net: totals.operating_net(),
        investing_net: totals.investing_net,
        financing_net: totals.financing_net,
        net_cashflow: totals.net_cashflow(),
    }
}

/// Builds the monthly cashflow report: per calendar month in the window,
/// the bucket totals plus a cumulative cash position
/// `cumulative[i] = cumulative[i-1] + operating_net[i] - investing[i] - financing[i]`.
///
/// Months with no activity still appear, carrying the cumulative forward.
#[must_use]
pub fn build_monthly_cashflow(
    start_date: NaiveDate,
    end_date: NaiveDate,
    transactions: &[CashflowTransaction],
) -> Vec<MonthlyCashflow> {
    use chrono::Datelike;

    let movements = movements_in_window(start_date, end_date, transactions);

    let mut months = Vec::new();
    let mut cumulative = Decimal::ZERO;
    let (mut year, mut month) = (start_date.year(), start_date.month());
    let (end_year, end_month) = (end_date.year(), end_date.month());

    while (year, month) <= (end_year, end_month) {
        let mut totals = BucketTotals::default();
        for movement in movements
            .iter()
            .filter(|m| m.date.year() == year && m.date.month() == month)
        {
            totals.absorb(movement);
        }

        cumulative += totals.net_cashflow();
        months.push(MonthlyCashflow {
            month: format!("{year:04}-{month:02}"),
            operating_inflows: totals.operating_inflows,
            operating_outflows: totals.operating_outflows,
            operating_net: totals.operating_net(),
            investing_net: totals.investing_net,
            financing_net: totals.financing_net,
            cumulative,
        });

        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn entry(
        account_type: AccountType,
        is_cash_account: bool,
        entry_type: EntryType,
        amount: Decimal,
    ) -> CashflowEntry {
        CashflowEntry {
            account_type,
            is_cash_account,
            entry_type,
            amount,
        }
    }

    fn rent_payment(day: u32, amount: Decimal) -> CashflowTransaction {
        CashflowTransaction {
            date: date(2026, 1, day),
            entries: vec![
                entry(AccountType::Asset, true, EntryType::Debit, amount),
                entry(AccountType::Revenue, false, EntryType::Credit, amount),
            ],
        }
    }

    fn utility_bill(day: u32, amount: Decimal) -> CashflowTransaction {
        CashflowTransaction {
            date: date(2026, 1, day),
            entries: vec![
                entry(AccountType::Expense, false, EntryType::Debit, amount),
                entry(AccountType::Asset, true, EntryType::Credit, amount),
            ],
        }
    }

    #[test]
    fn test_revenue_backed_inflow_is_operating() {
        let movements = classify_transaction(&rent_payment(5, dec!(800.00)));
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].bucket, CashflowBucket::Operating);
        assert_eq!(movements[0].signed_amount, dec!(800.00));
    }

    #[test]
    fn test_expense_backed_outflow_is_operating() {
        let movements = classify_transaction(&utility_bill(6, dec!(120.00)));
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].bucket, CashflowBucket::Operating);
        assert_eq!(movements[0].signed_amount, dec!(-120.00));
    }

    #[test]
    fn test_cash_to_cash_transfer_excluded() {
        let transfer = CashflowTransaction {
            date: date(2026, 1, 10),
            entries: vec![
                entry(AccountType::Asset, true, EntryType::Debit, dec!(500.00)),
                entry(AccountType::Asset, true, EntryType::Credit, dec!(500.00)),
            ],
        };
        assert!(classify_transaction(&transfer).is_empty());
    }

    #[test]
    fn test_non_cash_transaction_excluded() {
        let accrual = CashflowTransaction {
            date: date(2026, 1, 11),
            entries: vec![
                entry(AccountType::Asset, false, EntryType::Debit, dec!(75.00)),
                entry(AccountType::Revenue, false, EntryType::Credit, dec!(75.00)),
            ],
        };
        assert!(classify_transaction(&accrual).is_empty());
    }

    #[test]
    fn test_loan_received_is_financing() {
        let loan = CashflowTransaction {
            date: date(2026, 1, 12),
            entries: vec![
                entry(AccountType::Asset, true, EntryType::Debit, dec!(5000.00)),
                entry(AccountType::Liability, false, EntryType::Credit, dec!(5000.00)),
            ],
        };
        let statement = build_cashflow(date(2026, 1, 1), date(2026, 1, 31), &[loan]);
        // Cash received, so net financing spend is negative.
        assert_eq!(statement.financing_net, dec!(-5000.00));
        assert_eq!(statement.net_cashflow, dec!(5000.00));
    }

    #[test]
    fn test_equipment_purchase_is_investing() {
        let purchase = CashflowTransaction {
            date: date(2026, 1, 13),
            entries: vec![
                entry(AccountType::Asset, false, EntryType::Debit, dec!(900.00)),
                entry(AccountType::Asset, true, EntryType::Credit, dec!(900.00)),
            ],
        };
        let statement = build_cashflow(date(2026, 1, 1), date(2026, 1, 31), &[purchase]);
        assert_eq!(statement.investing_net, dec!(900.00));
        assert_eq!(statement.net_cashflow, dec!(-900.00));
    }

    #[test]
    fn test_cashflow_statement_totals() {
        let transactions = vec![
            rent_payment(3, dec!(800.00)),
            rent_payment(17, dec!(800.00)),
            utility_bill(20, dec!(250.00)),
        ];
        let statement = build_cashflow(date(2026, 1, 1), date(2026, 1, 31), &transactions);
        assert_eq!(statement.operating_inflows, dec!(1600.00));
        assert_eq!(statement.operating_outflows, dec!(250.00));
        assert_eq!(statement.operating_net, dec!(1350.00));
        assert_eq!(statement.net_cashflow, dec!(1350.00));
    }

    #[test]
    fn test_window_filter_excludes_outside_dates() {
        let transactions = vec![rent_payment(3, dec!(800.00))];
        let statement = build_cashflow(date(2026, 2, 1), date(2026, 2, 28), &transactions);
        assert_eq!(statement.operating_inflows, dec!(0));
    }

    #[test]
    fn test_monthly_cumulative_carries_across_empty_months() {
        let transactions = vec![
            rent_payment(5, dec!(1000.00)),
            CashflowTransaction {
                date: date(2026, 3, 10),
                entries: vec![
                    entry(AccountType::Expense, false, EntryType::Debit, dec!(400.00)),
                    entry(AccountType::Asset, true, EntryType::Credit, dec!(400.00)),
                ],
            },
        ];

        let months =
            build_monthly_cashflow(date(2026, 1, 1), date(2026, 3, 31), &transactions);
        assert_eq!(months.len(), 3);

        assert_eq!(months[0].month, "2026-01");
        assert_eq!(months[0].cumulative, dec!(1000.00));

        // February has no activity; the cumulative carries forward.
        assert_eq!(months[1].month, "2026-02");
        assert_eq!(months[1].operating_net, dec!(0));
        assert_eq!(months[1].cumulative, dec!(1000.00));

        assert_eq!(months[2].month, "2026-03");
        assert_eq!(months[2].cumulative, dec!(600.00));
    }

    #[test]
    fn test_monthly_spans_year_boundary() {
        let months = build_monthly_cashflow(date(2025, 11, 1), date(2026, 2, 28), &[]);
        let labels: Vec<_> = months.iter().map(|m| m.month.clone()).collect();
        assert_eq!(labels, vec!["2025-11", "2025-12", "2026-01", "2026-02"]);
    }
}
