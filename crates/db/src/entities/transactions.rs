//! `SeaORM` entity for the transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use lodgera_shared::types::{BoardingHouseId, TransactionId};

use super::sea_orm_active_enums::{TransactionCategory, TransactionStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub boarding_house_id: Uuid,
    pub transaction_date: Date,
    pub reference_number: Option<String>,
    pub description: String,
    pub category: TransactionCategory,
    pub status: TransactionStatus,
    /// Set on reversal transactions: the transaction whose effect this undoes.
    pub reverses_transaction_id: Option<Uuid>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
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
    /// Restates the row as a core domain transaction.
    #[must_use]
    pub fn to_domain(&self) -> lodgera_core::ledger::Transaction {
        lodgera_core::ledger::Transaction {
            id: TransactionId::from_uuid(self.id),
            boarding_house_id: BoardingHouseId::from_uuid(self.boarding_house_id),
            date: self.transaction_date,
            reference: self.reference_number.clone(),
            description: self.description.clone(),
            category: self.category.into(),
            status: self.status.into(),
        }
    }
}
