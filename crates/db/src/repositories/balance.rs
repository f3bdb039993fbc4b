//! Balance store reads: cached current balance and as-of recomputation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QuerySelect,
    RelationTrait,
};

use lodgera_core::ledger::balance_change;
use lodgera_shared::types::{AccountId, BoardingHouseId};

use super::account::AccountRepository;
use crate::entities::{
    accounts, journal_entries, sea_orm_active_enums::TransactionStatus, transactions,
};

/// Error types for balance reads.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for balance store reads.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the cached current balance in O(1). Zero for accounts with no
    /// postings yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_current_balance(
        &self,
        account_id: AccountId,
    ) -> Result<Decimal, BalanceError> {
        let row = crate::entities::account_balances::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await?;

        Ok(row.map_or(Decimal::ZERO, |r| r.balance))
    }

    /// Recomputes the balance from the entry log, summing posted journal
    /// entries dated up to and including `as_of`. Ignores the cache and
    /// restates into the account's natural sign, exactly like the cache
    /// does.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::AccountNotFound`] for unknown or soft-deleted
    /// accounts.
    pub async fn get_balance_as_of(
        &self,
        boarding_house_id: BoardingHouseId,
        account_id: AccountId,
        as_of: NaiveDate,
    ) -> Result<Decimal, BalanceError> {
        let account = AccountRepository::live()
            .filter(accounts::Column::Id.eq(account_id.into_inner()))
            .filter(accounts::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(BalanceError::AccountNotFound(account_id))?;
        let account_type: lodgera_core::coa::AccountType = account.account_type.into();

        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::AccountId.eq(account_id.into_inner()))
            .join(
                JoinType::InnerJoin,
                journal_entries::Relation::Transactions.def(),
            )
            .filter(transactions::Column::Status.eq(TransactionStatus::Posted))
            .filter(transactions::Column::DeletedAt.is_null())
            .filter(transactions::Column::TransactionDate.lte(as_of))
            .select_only()
            .column(journal_entries::Column::EntryType)
            .column(journal_entries::Column::Amount)
            .into_tuple::<(crate::entities::sea_orm_active_enums::EntryType, Decimal)>()
            .all(&self.db)
            .await?;

        let balance = entries
            .into_iter()
            .fold(Decimal::ZERO, |acc, (entry_type, amount)| {
                acc + balance_change(account_type, entry_type.into(), amount)
            });

        Ok(balance)
    }
}
