//! Report output types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lodgera_shared::types::AccountId;

use crate::coa::{Account, AccountType};

/// Per-account activity feeding the read-side reports: the raw debit and
/// credit totals accumulated over the reporting window.
#[derive(Debug, Clone)]
pub struct AccountActivity {
    /// The account.
    pub account: Account,
    /// Sum of debit entry amounts.
    pub total_debit: Decimal,
    /// Sum of credit entry amounts.
    pub total_credit: Decimal,
}

impl AccountActivity {
    /// The activity restated into the account's natural sign.
    #[must_use]
    pub fn natural_balance(&self) -> Decimal {
        self.account
            .account_type
            .natural_balance(self.total_debit, self.total_credit)
    }
}

/// One trial balance row: the natural balance projected onto the debit or
/// credit column according to account type and sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account identifier.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit column value (zero if the balance sits on the credit side).
    pub debit_balance: Decimal,
    /// Credit column value (zero if the balance sits on the debit side).
    pub credit_balance: Decimal,
}

/// Trial balance column summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceSummary {
    /// Debit column total.
    pub total_debits: Decimal,
    /// Credit column total.
    pub total_credits: Decimal,
    /// `total_debits - total_credits`; always zero on a successful report.
    pub difference: Decimal,
    /// Whether the columns agree.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Snapshot date.
    pub as_of_date: NaiveDate,
    /// Per-account rows, ordered by code.
    pub accounts: Vec<TrialBalanceRow>,
    /// Column totals.
    pub summary: TrialBalanceSummary,
}

/// One line of a report section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLine {
    /// Account identifier.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Natural-sign amount.
    pub amount: Decimal,
}

/// A titled group of report lines with a total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    /// Lines ordered by account code.
    pub lines: Vec<ReportLine>,
    /// Section total.
    pub total: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Snapshot date.
    pub as_of_date: NaiveDate,
    /// Asset accounts.
    pub assets: ReportSection,
    /// Liability accounts.
    pub liabilities: ReportSection,
    /// Equity accounts, excluding the current period's earnings.
    pub equity: ReportSection,
    /// Net income for the reporting window, folded into equity.
    pub net_income: Decimal,
    /// `equity.total + net_income`.
    pub total_equity_with_income: Decimal,
}

/// Income statement report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Window start (inclusive).
    pub start_date: NaiveDate,
    /// Window end (inclusive).
    pub end_date: NaiveDate,
    /// Revenue accounts with activity in the window.
    pub revenue: ReportSection,
    /// Expense accounts with activity in the window.
    pub expenses: ReportSection,
    /// `revenue.total - expenses.total`.
    pub net_income: Decimal,
}
