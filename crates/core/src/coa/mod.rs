//! Chart of accounts tree and traversal.

pub mod tree;
pub mod types;

pub use tree::{AccountNode, build_tree, flatten};
pub use types::{Account, AccountType};
