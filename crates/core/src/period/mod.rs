//! Brought-down / carried-down period ledgers.
//!
//! A period ledger opens with the balance brought down (BD) from the
//! preceding period, lists the period's journal entries with a running
//! balance, and closes with the balance carried down (CD). The BD/CD rows
//! are synthetic display lines inserted at the period boundaries; they are
//! never real journal entries and must never be double-counted in totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lodgera_shared::types::JournalEntryId;

use crate::coa::AccountType;
use crate::ledger::{EntryType, balance_change};

/// One journal entry movement inside a period window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodMovement {
    /// The journal entry this movement came from.
    pub entry_id: JournalEntryId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Positive amount.
    pub amount: Decimal,
    /// Transaction reference.
    pub reference: Option<String>,
    /// Line description.
    pub description: String,
}

/// The kind of a displayed ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerLineKind {
    /// Synthetic opening line (balance b/d).
    BroughtDown,
    /// A real journal entry.
    Entry,
    /// Synthetic closing line (balance c/d).
    CarriedDown,
}

/// One display line of a period ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Line kind.
    pub kind: LedgerLineKind,
    /// Line date (boundary date for synthetic lines).
    pub date: NaiveDate,
    /// Description ("Balance b/d", "Balance c/d", or the entry description).
    pub description: String,
    /// Debit column (zero on synthetic lines).
    pub debit: Decimal,
    /// Credit column (zero on synthetic lines).
    pub credit: Decimal,
    /// Running balance after this line, in the account's natural sign.
    pub running_balance: Decimal,
}

/// A per-account, per-period ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodLedger {
    /// Period start (inclusive).
    pub period_start: NaiveDate,
    /// Period end (inclusive).
    pub period_end: NaiveDate,
    /// Opening balance, equal to the preceding period's carried-down balance
    /// (zero at the account's inception).
    pub brought_down: Decimal,
    /// Closing balance: `brought_down` plus the net signed movement.
    pub carried_down: Decimal,
    /// Display lines including the synthetic BD/CD boundary rows.
    pub lines: Vec<LedgerLine>,
}

/// Computes the carried-down balance for a set of period movements.
#[must_use]
pub fn carried_down(
    account_type: AccountType,
    brought_down: Decimal,
    movements: &[PeriodMovement],
) -> Decimal {
    movements.iter().fold(brought_down, |balance, movement| {
        balance + balance_change(account_type, movement.entry_type, movement.amount)
    })
}

/// Builds the full period ledger for an account.
///
/// Movements are ordered chronologically (stable for same-date entries) and
/// annotated with a running balance folded from `brought_down`.
#[must_use]
pub fn build_period_ledger(
    account_type: AccountType,
    period_start: NaiveDate,
    period_end: NaiveDate,
    brought_down: Decimal,
    mut movements: Vec<PeriodMovement>,
) -> PeriodLedger {
    movements.sort_by_key(|m| m.date);

    let mut lines = Vec::with_capacity(movements.len() + 2);
    lines.push(LedgerLine {
        kind: LedgerLineKind::BroughtDown,
        date: period_start,
        description: "Balance b/d".to_string(),
        debit: Decimal::ZERO,
        credit: Decimal::ZERO,
        running_balance: brought_down,
    });

    let mut running = brought_down;
    for movement in movements {
        running += balance_change(account_type, movement.entry_type, movement.amount);
        let (debit, credit) = match movement.entry_type {
            EntryType::Debit => (movement.amount, Decimal::ZERO),
            EntryType::Credit => (Decimal::ZERO, movement.amount),
        };
        lines.push(LedgerLine {
            kind: LedgerLineKind::Entry,
            date: movement.date,
            description: movement.description,
            debit,
            credit,
            running_balance: running,
        });
    }

    lines.push(LedgerLine {
        kind: LedgerLineKind::CarriedDown,
        date: period_end,
        description: "Balance c/d".to_string(),
        debit: Decimal::ZERO,
        credit: Decimal::ZERO,
        running_balance: running,
    });

    PeriodLedger {
        period_start,
        period_end,
        brought_down,
        carried_down: running,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn movement(day: u32, entry_type: EntryType, amount: Decimal) -> PeriodMovement {
        PeriodMovement {
            entry_id: JournalEntryId::new(),
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            entry_type,
            amount,
            reference: None,
            description: "rent".to_string(),
        }
    }

    fn window() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
    }

    #[test]
    fn test_carried_down_is_brought_down_plus_net_movement() {
        let movements = vec![
            movement(5, EntryType::Debit, dec!(300.00)),
            movement(12, EntryType::Credit, dec!(100.00)),
        ];
        let cd = carried_down(AccountType::Asset, dec!(300.00), &movements);
        assert_eq!(cd, dec!(500.00));
    }

    #[test]
    fn test_period_chain_continuity() {
        // Period 1 ends with CD=500.00; period 2's BD must read exactly 500.00.
        let (start, end) = window();
        let period_one = build_period_ledger(
            AccountType::Asset,
            start,
            end,
            Decimal::ZERO,
            vec![movement(10, EntryType::Debit, dec!(500.00))],
        );
        assert_eq!(period_one.carried_down, dec!(500.00));

        let period_two = build_period_ledger(
            AccountType::Asset,
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
            period_one.carried_down,
            vec![],
        );
        assert_eq!(period_two.brought_down, dec!(500.00));
        assert_eq!(period_two.carried_down, dec!(500.00));
    }

    #[test]
    fn test_running_balance_folds_from_brought_down() {
        let (start, end) = window();
        let ledger = build_period_ledger(
            AccountType::Asset,
            start,
            end,
            dec!(100.00),
            vec![
                movement(3, EntryType::Debit, dec!(50.00)),
                movement(7, EntryType::Credit, dec!(20.00)),
            ],
        );

        let balances: Vec<_> = ledger.lines.iter().map(|l| l.running_balance).collect();
        assert_eq!(
            balances,
            vec![dec!(100.00), dec!(150.00), dec!(130.00), dec!(130.00)]
        );
    }

    #[test]
    fn test_synthetic_lines_never_counted_in_totals() {
        let (start, end) = window();
        let ledger = build_period_ledger(
            AccountType::Asset,
            start,
            end,
            dec!(999.00),
            vec![movement(4, EntryType::Debit, dec!(10.00))],
        );

        let total_debits: Decimal = ledger.lines.iter().map(|l| l.debit).sum();
        let total_credits: Decimal = ledger.lines.iter().map(|l| l.credit).sum();
        assert_eq!(total_debits, dec!(10.00));
        assert_eq!(total_credits, Decimal::ZERO);

        assert_eq!(ledger.lines.first().unwrap().kind, LedgerLineKind::BroughtDown);
        assert_eq!(ledger.lines.last().unwrap().kind, LedgerLineKind::CarriedDown);
    }

    #[test]
    fn test_lines_sorted_chronologically() {
        let (start, end) = window();
        let ledger = build_period_ledger(
            AccountType::Expense,
            start,
            end,
            Decimal::ZERO,
            vec![
                movement(20, EntryType::Debit, dec!(5.00)),
                movement(2, EntryType::Debit, dec!(1.00)),
            ],
        );

        let dates: Vec<_> = ledger
            .lines
            .iter()
            .filter(|l| l.kind == LedgerLineKind::Entry)
            .map(|l| l.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2026-01-02", "2026-01-20"]);
    }
}
