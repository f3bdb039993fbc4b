//! Account repository for chart of accounts database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use lodgera_core::coa::{Account, AccountNode, build_tree};
use lodgera_shared::types::{AccountId, BoardingHouseId};

use crate::entities::{
    accounts, journal_entries,
    sea_orm_active_enums::{AccountType, TransactionStatus},
    transactions,
};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum CoaError {
    /// Account code already exists in the boarding house.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account not found in the boarding house.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountId),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Cannot delete an account with undeleted children.
    #[error("Account has {0} undeleted child accounts")]
    HasChildren(u64),

    /// Cannot delete an account referenced by posted journal entries.
    #[error("Account has {0} posted journal entries")]
    HasPostedEntries(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Boarding house scope.
    pub boarding_house_id: BoardingHouseId,
    /// Account code (unique within the boarding house).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: lodgera_core::coa::AccountType,
    /// Whether this is a non-postable organizational node.
    pub is_category: bool,
    /// Whether this is a designated cash/bank account.
    pub is_cash_account: bool,
    /// Parent account, if any.
    pub parent_id: Option<AccountId>,
}

/// Input for updating an account. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: Option<String>,
    /// Cash/bank designation.
    pub is_cash_account: Option<bool>,
    /// Parent account (outer `None` = unchanged, inner `None` = detach).
    pub parent_id: Option<Option<AccountId>>,
}

/// Account repository for chart of accounts CRUD.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The single non-deleted predicate. Every account query in this crate
    /// starts here so soft-deleted rows can never leak into reports.
    pub(crate) fn live() -> Select<accounts::Entity> {
        accounts::Entity::find().filter(accounts::Column::DeletedAt.is_null())
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the code already exists in the boarding house or
    /// the parent account does not exist there.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, CoaError> {
        let existing = Self::live()
            .filter(accounts::Column::BoardingHouseId.eq(input.boarding_house_id.into_inner()))
            .filter(accounts::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(CoaError::DuplicateCode(input.code));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = Self::live()
                .filter(accounts::Column::Id.eq(parent_id.into_inner()))
                .filter(
                    accounts::Column::BoardingHouseId.eq(input.boarding_house_id.into_inner()),
                )
                .one(&self.db)
                .await?;

            if parent.is_none() {
                return Err(CoaError::ParentNotFound(parent_id));
            }
        }

        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            boarding_house_id: Set(input.boarding_house_id.into_inner()),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(AccountType::from(input.account_type)),
            is_category: Set(input.is_category),
            is_cash_account: Set(input.is_cash_account),
            parent_id: Set(input.parent_id.map(AccountId::into_inner)),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = account.insert(&self.db).await?;
        Ok(account)
    }

    /// Loads all live accounts of a boarding house, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        boarding_house_id: BoardingHouseId,
    ) -> Result<Vec<Account>, CoaError> {
        let models = Self::live()
            .filter(accounts::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        Ok(models.iter().map(accounts::Model::to_domain).collect())
    }

    /// Returns the account forest of a boarding house, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_tree(
        &self,
        boarding_house_id: BoardingHouseId,
    ) -> Result<Vec<AccountNode>, CoaError> {
        let accounts = self.list_accounts(boarding_house_id).await?;
        Ok(build_tree(accounts))
    }

    /// Finds a live account by id within a boarding house.
    ///
    /// # Errors
    ///
    /// Returns [`CoaError::NotFound`] if no live account matches.
    pub async fn find_account(
        &self,
        boarding_house_id: BoardingHouseId,
        id: AccountId,
    ) -> Result<accounts::Model, CoaError> {
        Self::live()
            .filter(accounts::Column::Id.eq(id.into_inner()))
            .filter(accounts::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(CoaError::NotFound(id))
    }

    /// Updates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist, the new code
    /// collides, or the new parent does not exist.
    pub async fn update_account(
        &self,
        boarding_house_id: BoardingHouseId,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, CoaError> {
        let account = self.find_account(boarding_house_id, id).await?;

        if let Some(new_code) = &input.code
            && *new_code != account.code
        {
            let existing = Self::live()
                .filter(accounts::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
                .filter(accounts::Column::Code.eq(new_code))
                .filter(accounts::Column::Id.ne(id.into_inner()))
                .one(&self.db)
                .await?;

            if existing.is_some() {
                return Err(CoaError::DuplicateCode(new_code.clone()));
            }
        }

        if let Some(Some(parent_id)) = &input.parent_id {
            let parent = Self::live()
                .filter(accounts::Column::Id.eq(parent_id.into_inner()))
                .filter(accounts::Column::BoardingHouseId.eq(boarding_house_id.into_inner()))
                .one(&self.db)
                .await?;

            if parent.is_none() {
                return Err(CoaError::ParentNotFound(*parent_id));
            }
        }

        let mut active: accounts::ActiveModel = account.into();
        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(is_cash_account) = input.is_cash_account {
            active.is_cash_account = Set(is_cash_account);
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(parent_id.map(AccountId::into_inner));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Soft-deletes an account.
    ///
    /// Accounts are never hard-deleted so historical entries stay complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the account has undeleted children or is
    /// referenced by posted journal entries.
    pub async fn delete_account(
        &self,
        boarding_house_id: BoardingHouseId,
        id: AccountId,
    ) -> Result<(), CoaError> {
        let account = self.find_account(boarding_house_id, id).await?;

        let child_count = Self::live()
            .filter(accounts::Column::ParentId.eq(id.into_inner()))
            .count(&self.db)
            .await?;
        if child_count > 0 {
            return Err(CoaError::HasChildren(child_count));
        }

        let posted_entry_count = self.count_posted_entries(id.into_inner()).await?;
        if posted_entry_count > 0 {
            return Err(CoaError::HasPostedEntries(posted_entry_count));
        }

        let mut active: accounts::ActiveModel = account.into();
        let now = Utc::now().into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await?;

        Ok(())
    }

    /// Counts posted journal entries referencing an account.
    async fn count_posted_entries(&self, account_id: Uuid) -> Result<u64, CoaError> {
        use sea_orm::{JoinType, QuerySelect, RelationTrait};

        let count = journal_entries::Entity::find()
            .filter(journal_entries::Column::AccountId.eq(account_id))
            .join(
                JoinType::InnerJoin,
                journal_entries::Relation::Transactions.def(),
            )
            .filter(transactions::Column::Status.eq(TransactionStatus::Posted))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}
