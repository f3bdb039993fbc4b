//! `SeaORM` entity for the reconciliation_sessions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ReconciliationStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reconciliation_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub boarding_house_id: Uuid,
    pub account_id: Uuid,
    pub reconciliation_date: Date,
    pub book_balance: Decimal,
    pub bank_balance: Decimal,
    pub status: ReconciliationStatus,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(has_many = "super::reconciliation_items::Entity")]
    ReconciliationItems,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::reconciliation_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReconciliationItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
