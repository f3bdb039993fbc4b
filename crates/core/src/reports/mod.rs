//! Financial reports derived from the entry log and balance store.
//!
//! All builders are pure: they take per-account activity or reduced
//! transactions and produce report shapes. Reading the entry log (and
//! applying scope, posted-only, and soft-delete filters) is the caller's
//! job.

pub mod cashflow;
pub mod error;
pub mod service;
pub mod types;

pub use cashflow::{
    CashMovement, CashflowBucket, CashflowEntry, CashflowStatement, CashflowTransaction,
    MonthlyCashflow, build_cashflow, build_monthly_cashflow, classify_transaction,
};
pub use error::ReportError;
pub use service::{build_balance_sheet, build_income_statement, build_trial_balance};
pub use types::{
    AccountActivity, BalanceSheet, IncomeStatement, ReportLine, ReportSection, TrialBalance,
    TrialBalanceRow, TrialBalanceSummary,
};
