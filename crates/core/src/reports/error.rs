//! Report derivation errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while deriving reports.
///
/// These are integrity failures, not caller mistakes: a trial balance whose
/// columns disagree means earlier posting logic persisted an unbalanced
/// transaction. They must be surfaced to operators, never corrected silently.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Trial balance debit and credit column totals disagree.
    #[error("Trial balance mismatch: debits ({debits}) != credits ({credits})")]
    TrialBalanceMismatch {
        /// Debit column total.
        debits: Decimal,
        /// Credit column total.
        credits: Decimal,
    },

    /// Balance sheet equation violated beyond one minor currency unit.
    #[error(
        "Balance sheet unbalanced: assets ({assets}) != liabilities + equity ({liabilities_and_equity})"
    )]
    BalanceSheetUnbalanced {
        /// Total assets.
        assets: Decimal,
        /// Total liabilities plus equity (including net income).
        liabilities_and_equity: Decimal,
    },
}
