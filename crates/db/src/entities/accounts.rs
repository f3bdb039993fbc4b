//! `SeaORM` entity for the accounts table (chart of accounts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use lodgera_shared::types::{AccountId, BoardingHouseId};

use super::sea_orm_active_enums::AccountType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub boarding_house_id: Uuid,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub is_category: bool,
    pub is_cash_account: bool,
    pub parent_id: Option<Uuid>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    #[sea_orm(has_many = "super::journal_entries::Entity")]
    JournalEntries,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Restates the row as a core domain account.
    #[must_use]
    pub fn to_domain(&self) -> lodgera_core::coa::Account {
        lodgera_core::coa::Account {
            id: AccountId::from_uuid(self.id),
            boarding_house_id: BoardingHouseId::from_uuid(self.boarding_house_id),
            code: self.code.clone(),
            name: self.name.clone(),
            account_type: self.account_type.into(),
            is_category: self.is_category,
            is_cash_account: self.is_cash_account,
            parent_id: self.parent_id.map(AccountId::from_uuid),
        }
    }
}
