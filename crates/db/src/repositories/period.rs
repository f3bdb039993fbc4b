//! Period ledger repository: lazy BD/CD computation with caching.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use lodgera_core::period::{PeriodLedger, PeriodMovement, build_period_ledger};
use lodgera_shared::types::{AccountId, BoardingHouseId, JournalEntryId};

use super::balance::{BalanceError, BalanceRepository};
use crate::entities::{
    account_periods, journal_entries, sea_orm_active_enums::TransactionStatus, transactions,
};

/// Error types for period ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum PeriodError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BalanceError> for PeriodError {
    fn from(value: BalanceError) -> Self {
        match value {
            BalanceError::AccountNotFound(id) => Self::AccountNotFound(id),
            BalanceError::Database(e) => Self::Database(e),
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct MovementRow {
    id: Uuid,
    entry_type: crate::entities::sea_orm_active_enums::EntryType,
    amount: Decimal,
    description: Option<String>,
    txn_date: NaiveDate,
    txn_ref: Option<String>,
    txn_desc: String,
}

/// Repository for per-account, per-period ledgers.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
    balances: BalanceRepository,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let balances = BalanceRepository::new(db.clone());
        Self { db, balances }
    }

    /// Builds the period ledger for an account over `[period_start,
    /// period_end]`.
    ///
    /// The brought-down balance is the balance as of the day before the
    /// period opens, which by construction equals the preceding period's
    /// carried-down balance. The BD/CD pair is cached in `account_periods`
    /// on first computation; ledger lines are always rebuilt from the entry
    /// log so late postings into the window are reflected.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::AccountNotFound`] for unknown accounts.
    pub async fn get_period(
        &self,
        boarding_house_id: BoardingHouseId,
        account_id: AccountId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<PeriodLedger, PeriodError> {
        let account_type = self.account_type(boarding_house_id, account_id).await?;

        let brought_down = match period_start.pred_opt() {
            Some(day_before) => {
                self.balances
                    .get_balance_as_of(boarding_house_id, account_id, day_before)
                    .await?
            }
            // No day exists before the period start, so nothing precedes it.
            None => Decimal::ZERO,
        };

        let movements = self
            .load_movements(account_id, period_start, period_end)
            .await?;
        let ledger = build_period_ledger(
            account_type,
            period_start,
            period_end,
            brought_down,
            movements,
        );

        self.cache_period(boarding_house_id, account_id, &ledger)
            .await?;

        Ok(ledger)
    }

    async fn account_type(
        &self,
        boarding_house_id: BoardingHouseId,
        account_id: AccountId,
    ) -> Result<lodgera_core::coa::AccountType, PeriodError> {
        use crate::entities::accounts;
        use crate::repositories::account::AccountRepository;

        let account = AccountRepository::live()
            .filter(accounts::Column::Id.eq(account_id.into_inner()))
            .filter(accounts::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(PeriodError::AccountNotFound(account_id))?;

        Ok(account.account_type.into())
    }

    async fn load_movements(
        &self,
        account_id: AccountId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Vec<PeriodMovement>, PeriodError> {
        let rows: Vec<MovementRow> = journal_entries::Entity::find()
            .filter(journal_entries::Column::AccountId.eq(account_id.into_inner()))
            .join(
                JoinType::InnerJoin,
                journal_entries::Relation::Transactions.def(),
            )
            .filter(transactions::Column::Status.eq(TransactionStatus::Posted))
            .filter(transactions::Column::DeletedAt.is_null())
            .filter(transactions::Column::TransactionDate.gte(period_start))
            .filter(transactions::Column::TransactionDate.lte(period_end))
            .column_as(transactions::Column::TransactionDate, "txn_date")
            .column_as(transactions::Column::ReferenceNumber, "txn_ref")
            .column_as(transactions::Column::Description, "txn_desc")
            .order_by_asc(transactions::Column::TransactionDate)
            .order_by_asc(journal_entries::Column::CreatedAt)
            .into_model::<MovementRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| PeriodMovement {
                entry_id: JournalEntryId::from_uuid(row.id),
                date: row.txn_date,
                entry_type: row.entry_type.into(),
                amount: row.amount,
                reference: row.txn_ref,
                description: row.description.unwrap_or(row.txn_desc),
            })
            .collect())
    }

    async fn cache_period(
        &self,
        boarding_house_id: BoardingHouseId,
        account_id: AccountId,
        ledger: &PeriodLedger,
    ) -> Result<(), PeriodError> {
        let existing = account_periods::Entity::find()
            .filter(account_periods::Column::AccountId.eq(account_id.into_inner()))
            .filter(account_periods::Column::PeriodStart.eq(ledger.period_start))
            .filter(account_periods::Column::PeriodEnd.eq(ledger.period_end))
            .one(&self.db)
            .await?;

        let now = Utc::now().into();
        match existing {
            Some(row)
                if row.balance_brought_down == ledger.brought_down
                    && row.balance_carried_down == ledger.carried_down =>
            {
                // Cache is current.
            }
            Some(row) => {
                let mut active: account_periods::ActiveModel = row.into();
                active.balance_brought_down = Set(ledger.brought_down);
                active.balance_carried_down = Set(ledger.carried_down);
                active.updated_at = Set(now);
                active.update(&self.db).await?;
            }
            None => {
                let row = account_periods::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    boarding_house_id: Set(boarding_house_id.into_inner()),
                    account_id: Set(account_id.into_inner()),
                    period_start: Set(ledger.period_start),
                    period_end: Set(ledger.period_end),
                    balance_brought_down: Set(ledger.brought_down),
                    balance_carried_down: Set(ledger.carried_down),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                row.insert(&self.db).await?;
            }
        }

        Ok(())
    }
}
