//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account type, mirrors the `account_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<AccountType> for lodgera_core::coa::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<lodgera_core::coa::AccountType> for AccountType {
    fn from(value: lodgera_core::coa::AccountType) -> Self {
        match value {
            lodgera_core::coa::AccountType::Asset => Self::Asset,
            lodgera_core::coa::AccountType::Liability => Self::Liability,
            lodgera_core::coa::AccountType::Equity => Self::Equity,
            lodgera_core::coa::AccountType::Revenue => Self::Revenue,
            lodgera_core::coa::AccountType::Expense => Self::Expense,
        }
    }
}

/// Journal entry side, mirrors the `entry_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_type")]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[sea_orm(string_value = "debit")]
    Debit,
    #[sea_orm(string_value = "credit")]
    Credit,
}

impl From<EntryType> for lodgera_core::ledger::EntryType {
    fn from(value: EntryType) -> Self {
        match value {
            EntryType::Debit => Self::Debit,
            EntryType::Credit => Self::Credit,
        }
    }
}

impl From<lodgera_core::ledger::EntryType> for EntryType {
    fn from(value: lodgera_core::ledger::EntryType) -> Self {
        match value {
            lodgera_core::ledger::EntryType::Debit => Self::Debit,
            lodgera_core::ledger::EntryType::Credit => Self::Credit,
        }
    }
}

/// Transaction status, mirrors the `transaction_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
}

impl From<TransactionStatus> for lodgera_core::ledger::TransactionStatus {
    fn from(value: TransactionStatus) -> Self {
        match value {
            TransactionStatus::Draft => Self::Draft,
            TransactionStatus::Posted => Self::Posted,
        }
    }
}

impl From<lodgera_core::ledger::TransactionStatus> for TransactionStatus {
    fn from(value: lodgera_core::ledger::TransactionStatus) -> Self {
        match value {
            lodgera_core::ledger::TransactionStatus::Draft => Self::Draft,
            lodgera_core::ledger::TransactionStatus::Posted => Self::Posted,
        }
    }
}

/// Transaction category, mirrors the `transaction_category` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_category")]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "overdue_rent")]
    OverdueRent,
    #[sea_orm(string_value = "petty_cash")]
    PettyCash,
    #[sea_orm(string_value = "opening_balance")]
    OpeningBalance,
    #[sea_orm(string_value = "reversal")]
    Reversal,
}

impl From<TransactionCategory> for lodgera_core::ledger::TransactionCategory {
    fn from(value: TransactionCategory) -> Self {
        match value {
            TransactionCategory::Manual => Self::Manual,
            TransactionCategory::Expense => Self::Expense,
            TransactionCategory::Payment => Self::Payment,
            TransactionCategory::Transfer => Self::Transfer,
            TransactionCategory::OverdueRent => Self::OverdueRent,
            TransactionCategory::PettyCash => Self::PettyCash,
            TransactionCategory::OpeningBalance => Self::OpeningBalance,
            TransactionCategory::Reversal => Self::Reversal,
        }
    }
}

impl From<lodgera_core::ledger::TransactionCategory> for TransactionCategory {
    fn from(value: lodgera_core::ledger::TransactionCategory) -> Self {
        use lodgera_core::ledger::TransactionCategory as Core;
        match value {
            Core::Manual => Self::Manual,
            Core::Expense => Self::Expense,
            Core::Payment => Self::Payment,
            Core::Transfer => Self::Transfer,
            Core::OverdueRent => Self::OverdueRent,
            Core::PettyCash => Self::PettyCash,
            Core::OpeningBalance => Self::OpeningBalance,
            Core::Reversal => Self::Reversal,
        }
    }
}

/// Reconciliation session status, mirrors the `reconciliation_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "reconciliation_status")]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "reconciled")]
    Reconciled,
    #[sea_orm(string_value = "unreconciled")]
    Unreconciled,
}

impl From<ReconciliationStatus> for lodgera_core::reconcile::ReconciliationStatus {
    fn from(value: ReconciliationStatus) -> Self {
        match value {
            ReconciliationStatus::Pending => Self::Pending,
            ReconciliationStatus::Reconciled => Self::Reconciled,
            ReconciliationStatus::Unreconciled => Self::Unreconciled,
        }
    }
}

impl From<lodgera_core::reconcile::ReconciliationStatus> for ReconciliationStatus {
    fn from(value: lodgera_core::reconcile::ReconciliationStatus) -> Self {
        use lodgera_core::reconcile::ReconciliationStatus as Core;
        match value {
            Core::Pending => Self::Pending,
            Core::Reconciled => Self::Reconciled,
            Core::Unreconciled => Self::Unreconciled,
        }
    }
}

/// Which stream a reconciliation item came from, mirrors `item_source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "item_source")]
#[serde(rename_all = "lowercase")]
pub enum ItemSource {
    #[sea_orm(string_value = "book")]
    Book,
    #[sea_orm(string_value = "bank")]
    Bank,
}

impl From<ItemSource> for lodgera_core::reconcile::ItemSource {
    fn from(value: ItemSource) -> Self {
        match value {
            ItemSource::Book => Self::Book,
            ItemSource::Bank => Self::Bank,
        }
    }
}

impl From<lodgera_core::reconcile::ItemSource> for ItemSource {
    fn from(value: lodgera_core::reconcile::ItemSource) -> Self {
        match value {
            lodgera_core::reconcile::ItemSource::Book => Self::Book,
            lodgera_core::reconcile::ItemSource::Bank => Self::Bank,
        }
    }
}
