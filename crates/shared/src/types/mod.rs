//! Common type definitions shared across crates.

mod id;
mod pagination;

pub use id::{
    AccountId, BoardingHouseId, JournalEntryId, ReconciliationId, ReconciliationItemId,
    TransactionId,
};
pub use pagination::{PageMeta, PageRequest};
