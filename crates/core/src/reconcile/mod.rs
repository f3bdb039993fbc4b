//! Bank reconciliation: matching book entries against statement lines.

pub mod matcher;
pub mod types;

pub use matcher::{ReconcileError, auto_match, close, manual_match};
pub use types::{
    ItemSource, ReconciliationItem, ReconciliationSession, ReconciliationStatus,
};
