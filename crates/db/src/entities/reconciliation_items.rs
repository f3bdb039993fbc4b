//! `SeaORM` entity for the reconciliation_items table.
//!
//! Holds both streams of a session: book items snapshotted from the cash
//! account's journal entries and bank items imported from the statement.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use lodgera_shared::types::ReconciliationItemId;

use super::sea_orm_active_enums::{EntryType, ItemSource};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reconciliation_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reconciliation_id: Uuid,
    pub source: ItemSource,
    /// For book items: the journal entry this item was snapshotted from.
    pub journal_entry_id: Option<Uuid>,
    pub item_date: Date,
    pub amount: Decimal,
    pub entry_type: EntryType,
    pub reference: Option<String>,
    pub is_reconciled: bool,
    pub matched_counterpart_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reconciliation_sessions::Entity",
        from = "Column::ReconciliationId",
        to = "super::reconciliation_sessions::Column::Id"
    )]
    ReconciliationSessions,
}

impl Related<super::reconciliation_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReconciliationSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Restates the row as a core reconciliation item.
    #[must_use]
    pub fn to_domain(&self) -> lodgera_core::reconcile::ReconciliationItem {
        lodgera_core::reconcile::ReconciliationItem {
            id: ReconciliationItemId::from_uuid(self.id),
            date: self.item_date,
            amount: self.amount,
            entry_type: self.entry_type.into(),
            reference: self.reference.clone(),
            is_reconciled: self.is_reconciled,
            matched_counterpart_id: self.matched_counterpart_id.map(ReconciliationItemId::from_uuid),
        }
    }
}
