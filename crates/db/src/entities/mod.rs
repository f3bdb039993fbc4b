//! `SeaORM` entity definitions.

pub mod account_balances;
pub mod account_periods;
pub mod accounts;
pub mod boarding_houses;
pub mod journal_entries;
pub mod reconciliation_items;
pub mod reconciliation_sessions;
pub mod sea_orm_active_enums;
pub mod transactions;
