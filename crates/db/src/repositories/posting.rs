//! Transaction posting: validated, atomic journal entry persistence.
//!
//! Posting inserts the transaction header, its journal entries, and the
//! cached balance updates inside one database transaction. The balance rows
//! carry a version column; an update that matches zero rows means another
//! posting got there first, the whole unit rolls back, and the caller may
//! retry.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use lodgera_core::coa::Account;
use lodgera_core::ledger::{
    EntryInput, LedgerValidationError, TransactionCategory, TransactionStatus, balance_change,
    validate_accounts, validate_entries,
};
use lodgera_shared::types::{AccountId, BoardingHouseId, JournalEntryId, TransactionId};

use super::account::AccountRepository;
use crate::entities::{account_balances, accounts, journal_entries, sea_orm_active_enums, transactions};

/// Error types for posting operations.
#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    /// Entry set failed business rule validation.
    #[error(transparent)]
    Validation(#[from] LedgerValidationError),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Operation requires a posted transaction.
    #[error("Transaction is not posted: {0}")]
    NotPosted(TransactionId),

    /// Operation requires a draft transaction.
    #[error("Transaction is already posted: {0}")]
    AlreadyPosted(TransactionId),

    /// Concurrent posting touched the same account balance. The whole
    /// posting operation is safe to retry.
    #[error("Concurrent balance update on account {0}, retry the posting")]
    ConcurrencyConflict(AccountId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct PostTransactionInput {
    /// Boarding house scope.
    pub boarding_house_id: BoardingHouseId,
    /// Business date.
    pub date: NaiveDate,
    /// Reference number.
    pub reference: Option<String>,
    /// Description.
    pub description: String,
    /// Category.
    pub category: TransactionCategory,
    /// Initial status: draft entries are persisted without balance effects.
    pub status: TransactionStatus,
    /// The entry set.
    pub entries: Vec<EntryInput>,
}

/// Input for revising a posted transaction.
#[derive(Debug, Clone)]
pub struct ReviseTransactionInput {
    /// New business date.
    pub date: NaiveDate,
    /// New reference number.
    pub reference: Option<String>,
    /// New description.
    pub description: String,
    /// New category.
    pub category: TransactionCategory,
    /// Replacement entry set.
    pub entries: Vec<EntryInput>,
}

/// Repository handling the ledger write path.
#[derive(Debug, Clone)]
pub struct PostingRepository {
    db: DatabaseConnection,
}

impl PostingRepository {
    /// Creates a new posting repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and persists a transaction.
    ///
    /// For `Posted` status the journal entries and the cached balance
    /// updates land in one atomic unit; failure mid-way leaves no partial
    /// entries and no partial balance update.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unbalanced, single-sided, empty, or
    /// category-account entry sets, or [`PostingError::ConcurrencyConflict`]
    /// under balance contention.
    pub async fn post_transaction(
        &self,
        input: PostTransactionInput,
    ) -> Result<transactions::Model, PostingError> {
        validate_entries(&input.entries)?;
        let accounts = self
            .load_accounts(input.boarding_house_id, &input.entries)
            .await?;
        validate_accounts(&input.entries, &accounts)?;

        let txn = self.db.begin().await?;

        let transaction_id = TransactionId::new();
        let now = Utc::now().into();
        let model = transactions::ActiveModel {
            id: Set(transaction_id.into_inner()),
            boarding_house_id: Set(input.boarding_house_id.into_inner()),
            transaction_date: Set(input.date),
            reference_number: Set(input.reference),
            description: Set(input.description),
            category: Set(input.category.into()),
            status: Set(input.status.into()),
            reverses_transaction_id: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = model.insert(&txn).await?;

        Self::insert_entries(&txn, transaction_id, &input.entries).await?;

        if input.status.is_posted() {
            let deltas = Self::balance_deltas(&input.entries, &accounts);
            self.apply_deltas(&txn, &deltas).await?;
        }

        txn.commit().await?;
        info!(
            transaction_id = %transaction_id,
            entries = input.entries.len(),
            posted = input.status.is_posted(),
            "transaction persisted"
        );
        Ok(model)
    }

    /// Posts a draft transaction, applying its balance effects.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is missing or already posted.
    pub async fn post_draft(
        &self,
        boarding_house_id: BoardingHouseId,
        id: TransactionId,
    ) -> Result<transactions::Model, PostingError> {
        let model = self.find_transaction(boarding_house_id, id).await?;
        if model.status == sea_orm_active_enums::TransactionStatus::Posted {
            return Err(PostingError::AlreadyPosted(id));
        }

        let entries = self.load_entry_inputs(id).await?;
        validate_entries(&entries)?;
        let accounts = self.load_accounts(boarding_house_id, &entries).await?;
        validate_accounts(&entries, &accounts)?;

        let txn = self.db.begin().await?;

        let mut active: transactions::ActiveModel = model.into();
        active.status = Set(sea_orm_active_enums::TransactionStatus::Posted);
        active.updated_at = Set(Utc::now().into());
        let model = active.update(&txn).await?;

        let deltas = Self::balance_deltas(&entries, &accounts);
        self.apply_deltas(&txn, &deltas).await?;

        txn.commit().await?;
        info!(transaction_id = %id, "draft posted");
        Ok(model)
    }

    /// Revises a posted transaction: a reversal transaction negates the
    /// original's effect and a replacement transaction applies the new entry
    /// set, both in one atomic unit. The original rows stay in the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is missing or not posted, the new
    /// entry set fails validation, or balance contention occurs.
    pub async fn revise_transaction(
        &self,
        boarding_house_id: BoardingHouseId,
        id: TransactionId,
        input: ReviseTransactionInput,
    ) -> Result<transactions::Model, PostingError> {
        let original = self.find_transaction(boarding_house_id, id).await?;
        if original.status != sea_orm_active_enums::TransactionStatus::Posted {
            return Err(PostingError::NotPosted(id));
        }

        validate_entries(&input.entries)?;
        let original_entries = self.load_entry_inputs(id).await?;

        let mut all_entries = input.entries.clone();
        all_entries.extend(original_entries.iter().cloned());
        let accounts = self.load_accounts(boarding_house_id, &all_entries).await?;
        validate_accounts(&input.entries, &accounts)?;

        let reversal_entries: Vec<EntryInput> = original_entries
            .iter()
            .map(|entry| EntryInput {
                account_id: entry.account_id,
                entry_type: match entry.entry_type {
                    lodgera_core::ledger::EntryType::Debit => {
                        lodgera_core::ledger::EntryType::Credit
                    }
                    lodgera_core::ledger::EntryType::Credit => {
                        lodgera_core::ledger::EntryType::Debit
                    }
                },
                amount: entry.amount,
                description: entry.description.clone(),
            })
            .collect();

        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let reversal_id = TransactionId::new();
        let reversal = transactions::ActiveModel {
            id: Set(reversal_id.into_inner()),
            boarding_house_id: Set(boarding_house_id.into_inner()),
            transaction_date: Set(original.transaction_date),
            reference_number: Set(original.reference_number.clone()),
            description: Set(format!("Reversal of: {}", original.description)),
            category: Set(sea_orm_active_enums::TransactionCategory::Reversal),
            status: Set(sea_orm_active_enums::TransactionStatus::Posted),
            reverses_transaction_id: Set(Some(id.into_inner())),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        reversal.insert(&txn).await?;
        Self::insert_entries(&txn, reversal_id, &reversal_entries).await?;
        let reversal_deltas = Self::balance_deltas(&reversal_entries, &accounts);
        self.apply_deltas(&txn, &reversal_deltas).await?;

        let replacement_id = TransactionId::new();
        let replacement = transactions::ActiveModel {
            id: Set(replacement_id.into_inner()),
            boarding_house_id: Set(boarding_house_id.into_inner()),
            transaction_date: Set(input.date),
            reference_number: Set(input.reference),
            description: Set(input.description),
            category: Set(input.category.into()),
            status: Set(sea_orm_active_enums::TransactionStatus::Posted),
            reverses_transaction_id: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let replacement = replacement.insert(&txn).await?;
        Self::insert_entries(&txn, replacement_id, &input.entries).await?;
        let new_deltas = Self::balance_deltas(&input.entries, &accounts);
        self.apply_deltas(&txn, &new_deltas).await?;

        txn.commit().await?;
        info!(
            original = %id,
            reversal = %reversal_id,
            replacement = %replacement_id,
            "posted transaction revised"
        );
        Ok(replacement)
    }

    /// Loads a transaction together with its journal entries.
    ///
    /// # Errors
    ///
    /// Returns [`PostingError::TransactionNotFound`] when absent.
    pub async fn get_with_entries(
        &self,
        boarding_house_id: BoardingHouseId,
        id: TransactionId,
    ) -> Result<(transactions::Model, Vec<journal_entries::Model>), PostingError> {
        let model = self.find_transaction(boarding_house_id, id).await?;
        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::TransactionId.eq(id.into_inner()))
            .all(&self.db)
            .await?;
        Ok((model, entries))
    }

    /// Finds a live transaction by id within a boarding house.
    ///
    /// # Errors
    ///
    /// Returns [`PostingError::TransactionNotFound`] when absent.
    pub async fn find_transaction(
        &self,
        boarding_house_id: BoardingHouseId,
        id: TransactionId,
    ) -> Result<transactions::Model, PostingError> {
        transactions::Entity::find()
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .filter(transactions::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
            .filter(transactions::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(PostingError::TransactionNotFound(id))
    }

    async fn load_entry_inputs(
        &self,
        id: TransactionId,
    ) -> Result<Vec<EntryInput>, PostingError> {
        let rows = journal_entries::Entity::find()
            .filter(journal_entries::Column::TransactionId.eq(id.into_inner()))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| EntryInput {
                account_id: AccountId::from_uuid(row.account_id),
                entry_type: row.entry_type.into(),
                amount: row.amount,
                description: row.description,
            })
            .collect())
    }

    async fn load_accounts(
        &self,
        boarding_house_id: BoardingHouseId,
        entries: &[EntryInput],
    ) -> Result<HashMap<AccountId, Account>, PostingError> {
        let ids: Vec<Uuid> = entries
            .iter()
            .map(|e| e.account_id.into_inner())
            .collect();

        let models = AccountRepository::live()
            .filter(accounts::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
            .filter(accounts::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        Ok(models
            .iter()
            .map(|m| {
                let account = m.to_domain();
                (account.id, account)
            })
            .collect())
    }

    async fn insert_entries(
        txn: &DatabaseTransaction,
        transaction_id: TransactionId,
        entries: &[EntryInput],
    ) -> Result<(), PostingError> {
        let now = Utc::now().into();
        let models: Vec<journal_entries::ActiveModel> = entries
            .iter()
            .map(|entry| journal_entries::ActiveModel {
                id: Set(JournalEntryId::new().into_inner()),
                transaction_id: Set(transaction_id.into_inner()),
                account_id: Set(entry.account_id.into_inner()),
                entry_type: Set(entry.entry_type.into()),
                amount: Set(entry.amount),
                description: Set(entry.description.clone()),
                created_at: Set(now),
            })
            .collect();

        journal_entries::Entity::insert_many(models).exec(txn).await?;
        Ok(())
    }

    /// Sums each account's signed balance change over the entry set.
    fn balance_deltas(
        entries: &[EntryInput],
        accounts: &HashMap<AccountId, Account>,
    ) -> Vec<(AccountId, Decimal)> {
        let mut deltas: HashMap<AccountId, Decimal> = HashMap::new();
        for entry in entries {
            if let Some(account) = accounts.get(&entry.account_id) {
                let change = balance_change(account.account_type, entry.entry_type, entry.amount);
                *deltas.entry(entry.account_id).or_default() += change;
            }
        }

        // Deterministic application order keeps deadlock behavior stable.
        let mut deltas: Vec<(AccountId, Decimal)> = deltas.into_iter().collect();
        deltas.sort_by_key(|(id, _)| id.into_inner());
        deltas
    }

    async fn apply_deltas(
        &self,
        txn: &DatabaseTransaction,
        deltas: &[(AccountId, Decimal)],
    ) -> Result<(), PostingError> {
        for (account_id, delta) in deltas {
            self.apply_delta(txn, *account_id, *delta).await?;
        }
        Ok(())
    }

    /// Applies one signed delta to an account's cached balance using an
    /// optimistic version check.
    async fn apply_delta(
        &self,
        txn: &DatabaseTransaction,
        account_id: AccountId,
        delta: Decimal,
    ) -> Result<(), PostingError> {
        let current = account_balances::Entity::find_by_id(account_id.into_inner())
            .one(txn)
            .await?;

        match current {
            None => {
                let row = account_balances::ActiveModel {
                    account_id: Set(account_id.into_inner()),
                    balance: Set(delta),
                    version: Set(1),
                    updated_at: Set(Utc::now().into()),
                };
                row.insert(txn).await.map_err(|e| {
                    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                        PostingError::ConcurrencyConflict(account_id)
                    } else {
                        PostingError::Database(e)
                    }
                })?;
            }
            Some(row) => {
                let result = account_balances::Entity::update_many()
                    .col_expr(
                        account_balances::Column::Balance,
                        Expr::value(row.balance + delta),
                    )
                    .col_expr(
                        account_balances::Column::Version,
                        Expr::value(row.version + 1),
                    )
                    .col_expr(
                        account_balances::Column::UpdatedAt,
                        Expr::value(Utc::now()),
                    )
                    .filter(account_balances::Column::AccountId.eq(account_id.into_inner()))
                    .filter(account_balances::Column::Version.eq(row.version))
                    .exec(txn)
                    .await?;

                if result.rows_affected == 0 {
                    return Err(PostingError::ConcurrencyConflict(account_id));
                }
            }
        }

        Ok(())
    }
}
