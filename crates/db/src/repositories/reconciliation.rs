//! Reconciliation repository: session persistence around the core matcher.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::info;

use lodgera_core::reconcile::{
    ItemSource, ReconcileError, ReconciliationSession, ReconciliationStatus, auto_match, close,
    manual_match,
};
use lodgera_shared::types::{
    AccountId, BoardingHouseId, ReconciliationId, ReconciliationItemId,
};

use super::account::AccountRepository;
use super::balance::{BalanceError, BalanceRepository};
use crate::entities::{
    accounts, journal_entries, reconciliation_items, reconciliation_sessions,
    sea_orm_active_enums, sea_orm_active_enums::TransactionStatus, transactions,
};

/// Error types for reconciliation operations.
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    /// Session not found.
    #[error("Reconciliation session not found: {0}")]
    SessionNotFound(ReconciliationId),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// The account is not a designated cash/bank account.
    #[error("Account is not a cash/bank account: {0}")]
    NotCashAccount(AccountId),

    /// Matching or closing failed.
    #[error(transparent)]
    Matching(#[from] ReconcileError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BalanceError> for ReconciliationError {
    fn from(value: BalanceError) -> Self {
        match value {
            BalanceError::AccountNotFound(id) => Self::AccountNotFound(id),
            BalanceError::Database(e) => Self::Database(e),
        }
    }
}

/// One imported bank statement line.
#[derive(Debug, Clone)]
pub struct BankItemInput {
    /// Statement line date.
    pub date: NaiveDate,
    /// Positive amount.
    pub amount: Decimal,
    /// Debit or credit from the cash account's perspective.
    pub entry_type: lodgera_core::ledger::EntryType,
    /// Statement line reference.
    pub reference: Option<String>,
}

/// Input for creating a reconciliation session.
#[derive(Debug, Clone)]
pub struct CreateSessionInput {
    /// Boarding house scope.
    pub boarding_house_id: BoardingHouseId,
    /// The cash/bank account being reconciled.
    pub account_id: AccountId,
    /// Statement date.
    pub reconciliation_date: NaiveDate,
    /// Statement-side closing balance.
    pub bank_balance: Decimal,
    /// Imported statement lines.
    pub bank_items: Vec<BankItemInput>,
}

/// Repository for reconciliation sessions and their items.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
    balances: BalanceRepository,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let balances = BalanceRepository::new(db.clone());
        Self { db, balances }
    }

    /// Creates a session: snapshots the book balance and the account's
    /// posted entries up to the statement date as book items, stores the
    /// imported bank items alongside.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is unknown or not a cash account.
    pub async fn create_session(
        &self,
        input: CreateSessionInput,
    ) -> Result<ReconciliationSession, ReconciliationError> {
        let account = AccountRepository::live()
            .filter(accounts::Column::Id.eq(input.account_id.into_inner()))
            .filter(
                accounts::Column::BoardingHouseId.eq(input.boarding_house_id.into_inner()),
            )
            .one(&self.db)
            .await?
            .ok_or(ReconciliationError::AccountNotFound(input.account_id))?;

        if !account.is_cash_account {
            return Err(ReconciliationError::NotCashAccount(input.account_id));
        }

        let book_balance = self
            .balances
            .get_balance_as_of(
                input.boarding_house_id,
                input.account_id,
                input.reconciliation_date,
            )
            .await?;

        let book_entries = self
            .load_book_entries(input.account_id, input.reconciliation_date)
            .await?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let session_id = ReconciliationId::new();
        let session = reconciliation_sessions::ActiveModel {
            id: Set(session_id.into_inner()),
            boarding_house_id: Set(input.boarding_house_id.into_inner()),
            account_id: Set(input.account_id.into_inner()),
            reconciliation_date: Set(input.reconciliation_date),
            book_balance: Set(book_balance),
            bank_balance: Set(input.bank_balance),
            status: Set(sea_orm_active_enums::ReconciliationStatus::Pending),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        session.insert(&txn).await?;

        let mut item_models = Vec::with_capacity(book_entries.len() + input.bank_items.len());
        for (entry_id, date, entry_type, amount, reference) in book_entries {
            item_models.push(reconciliation_items::ActiveModel {
                id: Set(ReconciliationItemId::new().into_inner()),
                reconciliation_id: Set(session_id.into_inner()),
                source: Set(sea_orm_active_enums::ItemSource::Book),
                journal_entry_id: Set(Some(entry_id)),
                item_date: Set(date),
                amount: Set(amount),
                entry_type: Set(entry_type),
                reference: Set(reference),
                is_reconciled: Set(false),
                matched_counterpart_id: Set(None),
                created_at: Set(now),
            });
        }
        for item in input.bank_items {
            item_models.push(reconciliation_items::ActiveModel {
                id: Set(ReconciliationItemId::new().into_inner()),
                reconciliation_id: Set(session_id.into_inner()),
                source: Set(sea_orm_active_enums::ItemSource::Bank),
                journal_entry_id: Set(None),
                item_date: Set(item.date),
                amount: Set(item.amount),
                entry_type: Set(item.entry_type.into()),
                reference: Set(item.reference),
                is_reconciled: Set(false),
                matched_counterpart_id: Set(None),
                created_at: Set(now),
            });
        }
        if !item_models.is_empty() {
            reconciliation_items::Entity::insert_many(item_models)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        info!(session_id = %session_id, "reconciliation session created");

        self.get_session(input.boarding_house_id, session_id).await
    }

    /// Loads a session with both item streams.
    ///
    /// # Errors
    ///
    /// Returns [`ReconciliationError::SessionNotFound`] when absent.
    pub async fn get_session(
        &self,
        boarding_house_id: BoardingHouseId,
        id: ReconciliationId,
    ) -> Result<ReconciliationSession, ReconciliationError> {
        let session = reconciliation_sessions::Entity::find()
            .filter(reconciliation_sessions::Column::Id.eq(id.into_inner()))
            .filter(
                reconciliation_sessions::Column::BoardingHouseId
                    .eq(boarding_house_id.into_inner()),
            )
            .one(&self.db)
            .await?
            .ok_or(ReconciliationError::SessionNotFound(id))?;

        let items = reconciliation_items::Entity::find()
            .filter(reconciliation_items::Column::ReconciliationId.eq(id.into_inner()))
            .order_by_asc(reconciliation_items::Column::ItemDate)
            .order_by_asc(reconciliation_items::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let (mut book_items, mut bank_items) = (Vec::new(), Vec::new());
        for item in &items {
            let domain = item.to_domain();
            match ItemSource::from(item.source) {
                ItemSource::Book => book_items.push(domain),
                ItemSource::Bank => bank_items.push(domain),
            }
        }

        Ok(ReconciliationSession {
            id,
            boarding_house_id,
            account_id: AccountId::from_uuid(session.account_id),
            reconciliation_date: session.reconciliation_date,
            book_balance: session.book_balance,
            bank_balance: session.bank_balance,
            status: session.status.into(),
            notes: session.notes,
            book_items,
            bank_items,
        })
    }

    /// Lists a boarding house's sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_sessions(
        &self,
        boarding_house_id: BoardingHouseId,
    ) -> Result<Vec<reconciliation_sessions::Model>, ReconciliationError> {
        let sessions = reconciliation_sessions::Entity::find()
            .filter(
                reconciliation_sessions::Column::BoardingHouseId
                    .eq(boarding_house_id.into_inner()),
            )
            .order_by_desc(reconciliation_sessions::Column::ReconciliationDate)
            .all(&self.db)
            .await?;

        Ok(sessions)
    }

    /// Runs automatic matching and persists the resulting links.
    ///
    /// Returns the updated session and the number of matches made.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is missing or closed.
    pub async fn auto_match(
        &self,
        boarding_house_id: BoardingHouseId,
        id: ReconciliationId,
        tolerance_days: i64,
    ) -> Result<(ReconciliationSession, usize), ReconciliationError> {
        let mut session = self.get_session(boarding_house_id, id).await?;
        let before = Self::reconciled_ids(&session);

        let matches_made = auto_match(&mut session, tolerance_days)?;
        self.persist_new_matches(&session, &before).await?;

        info!(session_id = %id, matches = matches_made, "auto-match completed");
        Ok((session, matches_made))
    }

    /// Applies a manual match and persists the resulting links.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is missing or closed, an item id is
    /// unknown, or any item is already matched.
    pub async fn manual_match(
        &self,
        boarding_house_id: BoardingHouseId,
        id: ReconciliationId,
        book_item_ids: &[ReconciliationItemId],
        bank_item_ids: &[ReconciliationItemId],
    ) -> Result<ReconciliationSession, ReconciliationError> {
        let mut session = self.get_session(boarding_house_id, id).await?;
        let before = Self::reconciled_ids(&session);

        manual_match(&mut session, book_item_ids, bank_item_ids)?;
        self.persist_new_matches(&session, &before).await?;

        info!(session_id = %id, "manual match applied");
        Ok(session)
    }

    /// Closes the session, recording the outcome and operator notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is missing or already closed.
    pub async fn close_session(
        &self,
        boarding_house_id: BoardingHouseId,
        id: ReconciliationId,
        notes: Option<String>,
    ) -> Result<ReconciliationSession, ReconciliationError> {
        let mut session = self.get_session(boarding_house_id, id).await?;
        let status = close(&mut session, notes.clone())?;

        let model = reconciliation_sessions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ReconciliationError::SessionNotFound(id))?;
        let mut active: reconciliation_sessions::ActiveModel = model.into();
        active.status = Set(sea_orm_active_enums::ReconciliationStatus::from(status));
        active.notes = Set(notes);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        info!(session_id = %id, status = ?status, "reconciliation session closed");
        Ok(session)
    }

    fn reconciled_ids(session: &ReconciliationSession) -> HashSet<ReconciliationItemId> {
        session
            .book_items
            .iter()
            .chain(&session.bank_items)
            .filter(|item| item.is_reconciled)
            .map(|item| item.id)
            .collect()
    }

    /// Persists items whose reconciled state changed since `before`.
    async fn persist_new_matches(
        &self,
        session: &ReconciliationSession,
        before: &HashSet<ReconciliationItemId>,
    ) -> Result<(), ReconciliationError> {
        let txn = self.db.begin().await?;

        for item in session.book_items.iter().chain(&session.bank_items) {
            if !item.is_reconciled || before.contains(&item.id) {
                continue;
            }

            let model = reconciliation_items::Entity::find_by_id(item.id.into_inner())
                .one(&txn)
                .await?;
            if let Some(model) = model {
                let mut active: reconciliation_items::ActiveModel = model.into();
                active.is_reconciled = Set(true);
                active.matched_counterpart_id = Set(item
                    .matched_counterpart_id
                    .map(ReconciliationItemId::into_inner));
                active.update(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok(())
    }

    /// Snapshot of posted entries for the account up to the statement date.
    #[allow(clippy::type_complexity)]
    async fn load_book_entries(
        &self,
        account_id: AccountId,
        up_to: NaiveDate,
    ) -> Result<
        Vec<(
            uuid::Uuid,
            NaiveDate,
            sea_orm_active_enums::EntryType,
            Decimal,
            Option<String>,
        )>,
        ReconciliationError,
    > {
        use sea_orm::FromQueryResult;

        #[derive(Debug, FromQueryResult)]
        struct BookRow {
            id: uuid::Uuid,
            entry_type: sea_orm_active_enums::EntryType,
            amount: Decimal,
            txn_date: NaiveDate,
            txn_ref: Option<String>,
        }

        let rows: Vec<BookRow> = journal_entries::Entity::find()
            .filter(journal_entries::Column::AccountId.eq(account_id.into_inner()))
            .join(
                JoinType::InnerJoin,
                journal_entries::Relation::Transactions.def(),
            )
            .filter(transactions::Column::Status.eq(TransactionStatus::Posted))
            .filter(transactions::Column::DeletedAt.is_null())
            .filter(transactions::Column::TransactionDate.lte(up_to))
            .column_as(transactions::Column::TransactionDate, "txn_date")
            .column_as(transactions::Column::ReferenceNumber, "txn_ref")
            .order_by_asc(transactions::Column::TransactionDate)
            .into_model::<BookRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.id, row.txn_date, row.entry_type, row.amount, row.txn_ref))
            .collect())
    }
}
