//! Report repository: read-side aggregation feeding the report builders.
//!
//! Everything here reads posted entries only, scoped to one boarding house,
//! with soft-deleted accounts and transactions excluded.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use lodgera_core::reports::{AccountActivity, CashflowEntry, CashflowTransaction};
use lodgera_shared::types::{
    AccountId, BoardingHouseId, JournalEntryId, PageMeta, PageRequest, TransactionId,
};

use super::account::AccountRepository;
use crate::entities::{
    accounts, journal_entries,
    sea_orm_active_enums::{EntryType, TransactionStatus},
    transactions,
};

/// Error types for report reads.
#[derive(Debug, thiserror::Error)]
pub enum ReportQueryError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One row of a paginated account ledger listing.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AccountLedgerRow {
    /// Journal entry id.
    pub entry_id: JournalEntryId,
    /// Owning transaction.
    pub transaction_id: TransactionId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Transaction reference.
    pub reference: Option<String>,
    /// Entry or transaction description.
    pub description: String,
    /// Debit or credit.
    pub entry_type: lodgera_core::ledger::EntryType,
    /// Positive amount.
    pub amount: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct EntrySumRow {
    account_id: Uuid,
    entry_type: EntryType,
    amount: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct CashflowRow {
    transaction_id: Uuid,
    txn_date: NaiveDate,
    entry_type: EntryType,
    amount: Decimal,
    account_type: crate::entities::sea_orm_active_enums::AccountType,
    is_cash_account: bool,
}

#[derive(Debug, FromQueryResult)]
struct LedgerRow {
    id: Uuid,
    transaction_id: Uuid,
    entry_type: EntryType,
    amount: Decimal,
    description: Option<String>,
    txn_date: NaiveDate,
    txn_ref: Option<String>,
    txn_desc: String,
}

/// Repository assembling report inputs from the entry log.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads per-account debit/credit activity over an optional date window.
    ///
    /// Accounts with no activity in the window still appear with zero
    /// totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_activity(
        &self,
        boarding_house_id: BoardingHouseId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AccountActivity>, ReportQueryError> {
        let account_models = AccountRepository::live()
            .filter(accounts::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        let mut query = journal_entries::Entity::find()
            .join(
                JoinType::InnerJoin,
                journal_entries::Relation::Transactions.def(),
            )
            .filter(transactions::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
            .filter(transactions::Column::Status.eq(TransactionStatus::Posted))
            .filter(transactions::Column::DeletedAt.is_null());

        if let Some(from_date) = from {
            query = query.filter(transactions::Column::TransactionDate.gte(from_date));
        }
        if let Some(to_date) = to {
            query = query.filter(transactions::Column::TransactionDate.lte(to_date));
        }

        let rows: Vec<EntrySumRow> = query
            .select_only()
            .column(journal_entries::Column::AccountId)
            .column(journal_entries::Column::EntryType)
            .column(journal_entries::Column::Amount)
            .into_model::<EntrySumRow>()
            .all(&self.db)
            .await?;

        let mut totals: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        for row in rows {
            let entry = totals.entry(row.account_id).or_default();
            match row.entry_type {
                EntryType::Debit => entry.0 += row.amount,
                EntryType::Credit => entry.1 += row.amount,
            }
        }

        Ok(account_models
            .iter()
            .map(|model| {
                let (total_debit, total_credit) =
                    totals.get(&model.id).copied().unwrap_or_default();
                AccountActivity {
                    account: model.to_domain(),
                    total_debit,
                    total_credit,
                }
            })
            .collect())
    }

    /// Loads posted transactions in the window, reduced to the shape the
    /// cashflow classifier needs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn cashflow_transactions(
        &self,
        boarding_house_id: BoardingHouseId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CashflowTransaction>, ReportQueryError> {
        let rows: Vec<CashflowRow> = journal_entries::Entity::find()
            .join(
                JoinType::InnerJoin,
                journal_entries::Relation::Transactions.def(),
            )
            .join(
                JoinType::InnerJoin,
                journal_entries::Relation::Accounts.def(),
            )
            .filter(transactions::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
            .filter(transactions::Column::Status.eq(TransactionStatus::Posted))
            .filter(transactions::Column::DeletedAt.is_null())
            .filter(transactions::Column::TransactionDate.gte(start))
            .filter(transactions::Column::TransactionDate.lte(end))
            .filter(accounts::Column::DeletedAt.is_null())
            .select_only()
            .column(journal_entries::Column::TransactionId)
            .column(journal_entries::Column::EntryType)
            .column(journal_entries::Column::Amount)
            .column_as(transactions::Column::TransactionDate, "txn_date")
            .column(accounts::Column::AccountType)
            .column(accounts::Column::IsCashAccount)
            .into_model::<CashflowRow>()
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<Uuid, CashflowTransaction> = HashMap::new();
        for row in rows {
            let transaction = grouped
                .entry(row.transaction_id)
                .or_insert_with(|| CashflowTransaction {
                    date: row.txn_date,
                    entries: Vec::new(),
                });
            transaction.entries.push(CashflowEntry {
                account_type: row.account_type.into(),
                is_cash_account: row.is_cash_account,
                entry_type: row.entry_type.into(),
                amount: row.amount,
            });
        }

        Ok(grouped.into_values().collect())
    }

    /// Paginated ledger listing for one account: posted entries with their
    /// transaction details, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReportQueryError::AccountNotFound`] for unknown accounts.
    pub async fn account_ledger(
        &self,
        boarding_house_id: BoardingHouseId,
        account_id: AccountId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        page: PageRequest,
    ) -> Result<(Vec<AccountLedgerRow>, PageMeta), ReportQueryError> {
        let account = AccountRepository::live()
            .filter(accounts::Column::Id.eq(account_id.into_inner()))
            .filter(accounts::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
            .one(&self.db)
            .await?;
        if account.is_none() {
            return Err(ReportQueryError::AccountNotFound(account_id));
        }

        let base = || {
            let mut query = journal_entries::Entity::find()
                .filter(journal_entries::Column::AccountId.eq(account_id.into_inner()))
                .join(
                    JoinType::InnerJoin,
                    journal_entries::Relation::Transactions.def(),
                )
                .filter(transactions::Column::Status.eq(TransactionStatus::Posted))
                .filter(transactions::Column::DeletedAt.is_null());

            if let Some(from_date) = from {
                query = query.filter(transactions::Column::TransactionDate.gte(from_date));
            }
            if let Some(to_date) = to {
                query = query.filter(transactions::Column::TransactionDate.lte(to_date));
            }
            query
        };

        let total = base().count(&self.db).await?;

        let rows: Vec<LedgerRow> = base()
            .column_as(transactions::Column::TransactionDate, "txn_date")
            .column_as(transactions::Column::ReferenceNumber, "txn_ref")
            .column_as(transactions::Column::Description, "txn_desc")
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .offset(page.offset)
            .limit(page.limit)
            .into_model::<LedgerRow>()
            .all(&self.db)
            .await?;

        let rows = rows
            .into_iter()
            .map(|row| AccountLedgerRow {
                entry_id: JournalEntryId::from_uuid(row.id),
                transaction_id: TransactionId::from_uuid(row.transaction_id),
                date: row.txn_date,
                reference: row.txn_ref,
                description: row.description.unwrap_or(row.txn_desc),
                entry_type: row.entry_type.into(),
                amount: row.amount,
            })
            .collect();

        Ok((rows, PageMeta::new(page, total)))
    }
}
