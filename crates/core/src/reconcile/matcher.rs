//! Matching book items against bank statement lines.

use rust_decimal::Decimal;
use thiserror::Error;

use lodgera_shared::types::ReconciliationItemId;

use super::types::{ReconciliationSession, ReconciliationStatus};

/// Errors raised by matching and closing operations.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// An item supplied to a manual match is already matched.
    #[error("Item is already reconciled: {0}")]
    AlreadyReconciled(ReconciliationItemId),

    /// An item id does not belong to the session.
    #[error("Unknown reconciliation item: {0}")]
    UnknownItem(ReconciliationItemId),

    /// A manual match needs at least one item on each stream.
    #[error("Manual match requires at least one book item and one bank item")]
    EmptyMatch,

    /// The session is no longer open for matching.
    #[error("Reconciliation session is closed")]
    SessionClosed,
}

/// Automatically matches unmatched book items against unmatched bank items.
///
/// A bank item qualifies when its amount and entry type equal the book
/// item's and its date lies within `tolerance_days` of the book item's date.
/// Ties are broken by closest date, then by the first bank item scanned, so
/// repeated invocations over the same data pick identical pairs.
///
/// Returns the number of matches made.
///
/// # Errors
///
/// Returns [`ReconcileError::SessionClosed`] if the session is not pending.
pub fn auto_match(
    session: &mut ReconciliationSession,
    tolerance_days: i64,
) -> Result<usize, ReconcileError> {
    if !session.status.is_open() {
        return Err(ReconcileError::SessionClosed);
    }

    let mut matches_made = 0;

    for book_index in 0..session.book_items.len() {
        if session.book_items[book_index].is_reconciled {
            continue;
        }

        let book_date = session.book_items[book_index].date;
        let book_amount = session.book_items[book_index].amount;
        let book_entry_type = session.book_items[book_index].entry_type;

        let mut best: Option<(usize, i64)> = None;
        for (bank_index, bank_item) in session.bank_items.iter().enumerate() {
            if bank_item.is_reconciled
                || bank_item.amount != book_amount
                || bank_item.entry_type != book_entry_type
            {
                continue;
            }

            let distance = (bank_item.date - book_date).num_days().abs();
            if distance > tolerance_days {
                continue;
            }

            // Strict less-than keeps the first-scanned candidate on ties.
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((bank_index, distance)),
            }
        }

        if let Some((bank_index, _)) = best {
            let bank_id = session.bank_items[bank_index].id;
            let book_id = session.book_items[book_index].id;

            let book_item = &mut session.book_items[book_index];
            book_item.is_reconciled = true;
            book_item.matched_counterpart_id = Some(bank_id);

            let bank_item = &mut session.bank_items[bank_index];
            bank_item.is_reconciled = true;
            bank_item.matched_counterpart_id = Some(book_id);

            matches_made += 1;
        }
    }

    Ok(matches_made)
}

/// Manually links book items to bank items, bypassing amount equality.
///
/// Supports many-to-one matches (one bank deposit covering several book
/// entries). Matching only flips `is_reconciled` and counterpart links;
/// balances and `difference()` are untouched.
///
/// # Errors
///
/// Fails without modifying the session if it is closed, an id is unknown,
/// either side is empty, or any supplied item is already matched.
pub fn manual_match(
    session: &mut ReconciliationSession,
    book_item_ids: &[ReconciliationItemId],
    bank_item_ids: &[ReconciliationItemId],
) -> Result<(), ReconcileError> {
    if !session.status.is_open() {
        return Err(ReconcileError::SessionClosed);
    }
    if book_item_ids.is_empty() || bank_item_ids.is_empty() {
        return Err(ReconcileError::EmptyMatch);
    }

    let book_indices = resolve_unmatched(&session.book_items, book_item_ids)?;
    let bank_indices = resolve_unmatched(&session.bank_items, bank_item_ids)?;

    // Cross-link each side to the first item of the other; a group match
    // has no single counterpart, so the first id stands in for the group.
    let first_bank_id = session.bank_items[bank_indices[0]].id;
    let first_book_id = session.book_items[book_indices[0]].id;

    for index in book_indices {
        let item = &mut session.book_items[index];
        item.is_reconciled = true;
        item.matched_counterpart_id = Some(first_bank_id);
    }
    for index in bank_indices {
        let item = &mut session.bank_items[index];
        item.is_reconciled = true;
        item.matched_counterpart_id = Some(first_book_id);
    }

    Ok(())
}

fn resolve_unmatched(
    items: &[super::types::ReconciliationItem],
    ids: &[ReconciliationItemId],
) -> Result<Vec<usize>, ReconcileError> {
    ids.iter()
        .map(|id| {
            let index = items
                .iter()
                .position(|item| item.id == *id)
                .ok_or(ReconcileError::UnknownItem(*id))?;
            if items[index].is_reconciled {
                return Err(ReconcileError::AlreadyReconciled(*id));
            }
            Ok(index)
        })
        .collect()
}

/// Closes the session.
///
/// The session becomes `Reconciled` when the difference is zero and every
/// item is matched; otherwise it becomes `Unreconciled`, recording the
/// accepted residual in `notes`.
///
/// # Errors
///
/// Returns [`ReconcileError::SessionClosed`] if already closed.
pub fn close(
    session: &mut ReconciliationSession,
    notes: Option<String>,
) -> Result<ReconciliationStatus, ReconcileError> {
    if !session.status.is_open() {
        return Err(ReconcileError::SessionClosed);
    }

    let status = if session.difference() == Decimal::ZERO && session.all_items_matched() {
        ReconciliationStatus::Reconciled
    } else {
        ReconciliationStatus::Unreconciled
    };

    session.status = status;
    session.notes = notes;
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::EntryType;
    use crate::reconcile::types::ReconciliationItem;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use lodgera_shared::types::{AccountId, BoardingHouseId, ReconciliationId};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn item(day: u32, amount: Decimal, entry_type: EntryType) -> ReconciliationItem {
        ReconciliationItem::unmatched(date(day), amount, entry_type, None)
    }

    fn session(
        book_balance: Decimal,
        bank_balance: Decimal,
        book_items: Vec<ReconciliationItem>,
        bank_items: Vec<ReconciliationItem>,
    ) -> ReconciliationSession {
        ReconciliationSession {
            id: ReconciliationId::new(),
            boarding_house_id: BoardingHouseId::new(),
            account_id: AccountId::new(),
            reconciliation_date: date(31),
            book_balance,
            bank_balance,
            status: ReconciliationStatus::Pending,
            notes: None,
            book_items,
            bank_items,
        }
    }

    #[test]
    fn test_auto_match_equal_amount_and_type_within_tolerance() {
        let mut s = session(
            dec!(100.00),
            dec!(100.00),
            vec![item(10, dec!(100.00), EntryType::Debit)],
            vec![item(12, dec!(100.00), EntryType::Debit)],
        );

        let matched = auto_match(&mut s, 3).unwrap();
        assert_eq!(matched, 1);
        assert!(s.book_items[0].is_reconciled);
        assert!(s.bank_items[0].is_reconciled);
        assert_eq!(
            s.book_items[0].matched_counterpart_id,
            Some(s.bank_items[0].id)
        );
        assert_eq!(
            s.bank_items[0].matched_counterpart_id,
            Some(s.book_items[0].id)
        );
    }

    #[test]
    fn test_auto_match_respects_tolerance_window() {
        let mut s = session(
            dec!(0),
            dec!(0),
            vec![item(10, dec!(100.00), EntryType::Debit)],
            vec![item(20, dec!(100.00), EntryType::Debit)],
        );
        assert_eq!(auto_match(&mut s, 3).unwrap(), 0);
        assert!(!s.book_items[0].is_reconciled);
    }

    #[test]
    fn test_auto_match_requires_equal_entry_type() {
        let mut s = session(
            dec!(0),
            dec!(0),
            vec![item(10, dec!(100.00), EntryType::Debit)],
            vec![item(10, dec!(100.00), EntryType::Credit)],
        );
        assert_eq!(auto_match(&mut s, 3).unwrap(), 0);
    }

    #[test]
    fn test_auto_match_prefers_closest_date_then_first_scanned() {
        let far = item(14, dec!(50.00), EntryType::Credit);
        let near_a = item(11, dec!(50.00), EntryType::Credit);
        let near_b = item(11, dec!(50.00), EntryType::Credit);
        let near_a_id = near_a.id;

        let mut s = session(
            dec!(0),
            dec!(0),
            vec![item(10, dec!(50.00), EntryType::Credit)],
            vec![far, near_a, near_b],
        );

        assert_eq!(auto_match(&mut s, 7).unwrap(), 1);
        // Closest date wins; between the two day-11 candidates, the one
        // scanned first is taken.
        assert_eq!(s.book_items[0].matched_counterpart_id, Some(near_a_id));
    }

    #[test]
    fn test_auto_match_is_deterministic_on_repeat() {
        let build = || {
            session(
                dec!(0),
                dec!(0),
                vec![
                    item(5, dec!(20.00), EntryType::Debit),
                    item(8, dec!(20.00), EntryType::Debit),
                ],
                vec![
                    item(6, dec!(20.00), EntryType::Debit),
                    item(8, dec!(20.00), EntryType::Debit),
                ],
            )
        };

        let mut first = build();
        let mut second = build();
        auto_match(&mut first, 3).unwrap();
        auto_match(&mut second, 3).unwrap();

        let pairs = |s: &ReconciliationSession| {
            s.book_items
                .iter()
                .map(|b| {
                    b.matched_counterpart_id.map(|id| {
                        s.bank_items
                            .iter()
                            .position(|x| x.id == id)
                            .unwrap()
                    })
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(&first), pairs(&second));
    }

    #[test]
    fn test_auto_match_matched_pairs_have_equal_amount_and_type() {
        let mut s = session(
            dec!(0),
            dec!(0),
            vec![
                item(3, dec!(10.00), EntryType::Debit),
                item(4, dec!(25.00), EntryType::Credit),
            ],
            vec![
                item(4, dec!(25.00), EntryType::Credit),
                item(3, dec!(10.00), EntryType::Debit),
            ],
        );
        auto_match(&mut s, 3).unwrap();

        for book in &s.book_items {
            let counterpart_id = book.matched_counterpart_id.unwrap();
            let bank = s
                .bank_items
                .iter()
                .find(|b| b.id == counterpart_id)
                .unwrap();
            assert_eq!(bank.amount, book.amount);
            assert_eq!(bank.entry_type, book.entry_type);
        }
    }

    #[test]
    fn test_manual_match_bypasses_amount_equality_many_to_one() {
        // One bank deposit covers two book entries.
        let mut s = session(
            dec!(0),
            dec!(0),
            vec![
                item(5, dec!(60.00), EntryType::Debit),
                item(5, dec!(40.00), EntryType::Debit),
            ],
            vec![item(6, dec!(100.00), EntryType::Debit)],
        );

        let book_ids: Vec<_> = s.book_items.iter().map(|i| i.id).collect();
        let bank_ids = vec![s.bank_items[0].id];
        manual_match(&mut s, &book_ids, &bank_ids).unwrap();

        assert!(s.all_items_matched());
        assert_eq!(
            s.book_items[1].matched_counterpart_id,
            Some(s.bank_items[0].id)
        );
    }

    #[test]
    fn test_manual_match_already_reconciled_rejected() {
        let mut s = session(
            dec!(0),
            dec!(0),
            vec![item(5, dec!(10.00), EntryType::Debit)],
            vec![item(5, dec!(10.00), EntryType::Debit)],
        );
        auto_match(&mut s, 3).unwrap();

        let book_ids = vec![s.book_items[0].id];
        let bank_ids = vec![s.bank_items[0].id];
        assert!(matches!(
            manual_match(&mut s, &book_ids, &bank_ids),
            Err(ReconcileError::AlreadyReconciled(_))
        ));
    }

    #[test]
    fn test_manual_match_unknown_item_rejected() {
        let mut s = session(
            dec!(0),
            dec!(0),
            vec![item(5, dec!(10.00), EntryType::Debit)],
            vec![item(5, dec!(10.00), EntryType::Debit)],
        );
        let bank_ids = vec![s.bank_items[0].id];
        assert!(matches!(
            manual_match(&mut s, &[ReconciliationItemId::new()], &bank_ids),
            Err(ReconcileError::UnknownItem(_))
        ));
    }

    #[test]
    fn test_difference_unchanged_by_manual_match() {
        // Book says 1000, bank says 950: difference is -50 and matching
        // items does not move it; only a correcting posting would.
        let mut s = session(
            dec!(1000.00),
            dec!(950.00),
            vec![item(5, dec!(50.00), EntryType::Debit)],
            vec![item(6, dec!(50.00), EntryType::Debit)],
        );
        assert_eq!(s.difference(), dec!(-50.00));

        let book_ids = vec![s.book_items[0].id];
        let bank_ids = vec![s.bank_items[0].id];
        manual_match(&mut s, &book_ids, &bank_ids).unwrap();
        assert_eq!(s.difference(), dec!(-50.00));

        let status = close(&mut s, Some("bank fee pending".to_string())).unwrap();
        assert_eq!(status, ReconciliationStatus::Unreconciled);
        assert_eq!(s.difference(), dec!(-50.00));
    }

    #[test]
    fn test_close_reconciled_when_zero_difference_and_all_matched() {
        let mut s = session(
            dec!(100.00),
            dec!(100.00),
            vec![item(5, dec!(100.00), EntryType::Debit)],
            vec![item(5, dec!(100.00), EntryType::Debit)],
        );
        auto_match(&mut s, 3).unwrap();

        let status = close(&mut s, None).unwrap();
        assert_eq!(status, ReconciliationStatus::Reconciled);
        assert_eq!(s.status, ReconciliationStatus::Reconciled);
    }

    #[test]
    fn test_close_unreconciled_when_items_remain() {
        let mut s = session(
            dec!(100.00),
            dec!(100.00),
            vec![item(5, dec!(100.00), EntryType::Debit)],
            vec![],
        );
        let status = close(&mut s, None).unwrap();
        assert_eq!(status, ReconciliationStatus::Unreconciled);
    }

    #[test]
    fn test_closed_session_rejects_further_matching() {
        let mut s = session(dec!(0), dec!(0), vec![], vec![]);
        close(&mut s, None).unwrap();

        assert!(matches!(auto_match(&mut s, 3), Err(ReconcileError::SessionClosed)));
        assert!(matches!(close(&mut s, None), Err(ReconcileError::SessionClosed)));
    }
}
