//! Account tree construction and traversal.
//!
//! Traversal is iterative over a parent-indexed map rather than recursive, so
//! arbitrarily deep charts cannot exhaust the stack.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::Account;

/// A node in the nested chart of accounts tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountNode {
    /// The account at this node.
    pub account: Account,
    /// Child accounts, ordered by code.
    pub children: Vec<AccountNode>,
}

/// Builds the chart of accounts forest from a flat account list.
///
/// Roots and siblings are ordered by code. An account whose parent is not in
/// the input (e.g. the parent was soft-deleted out of the query) is treated
/// as a root rather than dropped.
#[must_use]
pub fn build_tree(mut accounts: Vec<Account>) -> Vec<AccountNode> {
    accounts.sort_by(|a, b| a.code.cmp(&b.code));

    let index: HashMap<_, _> = accounts
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); accounts.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (i, account) in accounts.iter().enumerate() {
        match account.parent_id.and_then(|p| index.get(&p).copied()) {
            Some(parent) => children[parent].push(i),
            None => roots.push(i),
        }
    }

    // Depth-first order, parent before child.
    let mut order = Vec::with_capacity(accounts.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        order.push(i);
        for &child in children[i].iter().rev() {
            stack.push(child);
        }
    }

    // Assemble nested nodes deepest-first so each child is complete before it
    // is attached to its parent.
    let mut nodes: Vec<Option<AccountNode>> = accounts
        .into_iter()
        .map(|account| {
            Some(AccountNode {
                account,
                children: Vec::new(),
            })
        })
        .collect();

    for &i in order.iter().rev() {
        let kids: Vec<AccountNode> = children[i]
            .iter()
            .filter_map(|&c| nodes[c].take())
            .collect();
        if let Some(node) = nodes[i].as_mut() {
            node.children = kids;
        }
    }

    roots.into_iter().filter_map(|i| nodes[i].take()).collect()
}

/// Flattens a forest into a depth-first account list, parent before child.
///
/// Used wherever a flat list is needed (dropdowns, searches, reports).
#[must_use]
pub fn flatten(forest: &[AccountNode]) -> Vec<&Account> {
    let mut result = Vec::new();
    let mut stack: Vec<&AccountNode> = forest.iter().rev().collect();

    while let Some(node) = stack.pop() {
        result.push(&node.account);
        for child in node.children.iter().rev() {
            stack.push(child);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::types::AccountType;
    use lodgera_shared::types::{AccountId, BoardingHouseId};

    fn make_account(code: &str, parent: Option<AccountId>, is_category: bool) -> Account {
        Account {
            id: AccountId::new(),
            boarding_house_id: BoardingHouseId::from_uuid(uuid::Uuid::nil()),
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type: AccountType::Asset,
            is_category,
            is_cash_account: false,
            parent_id: parent,
        }
    }

    #[test]
    fn test_build_tree_orders_roots_and_children_by_code() {
        let parent = make_account("1000", None, true);
        let parent_id = parent.id;
        let child_b = make_account("1002", Some(parent_id), false);
        let child_a = make_account("1001", Some(parent_id), false);
        let other_root = make_account("2000", None, true);

        let tree = build_tree(vec![other_root, child_b, parent, child_a]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].account.code, "1000");
        assert_eq!(tree[1].account.code, "2000");
        let codes: Vec<_> = tree[0].children.iter().map(|n| n.account.code.as_str()).collect();
        assert_eq!(codes, vec!["1001", "1002"]);
    }

    #[test]
    fn test_flatten_is_depth_first_parent_before_child() {
        let root = make_account("1000", None, true);
        let mid = make_account("1100", Some(root.id), true);
        let leaf = make_account("1110", Some(mid.id), false);
        let sibling = make_account("1200", Some(root.id), false);

        let tree = build_tree(vec![leaf, sibling, root, mid]);
        let flat = flatten(&tree);

        let codes: Vec<_> = flat.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["1000", "1100", "1110", "1200"]);
    }

    #[test]
    fn test_missing_parent_becomes_root() {
        let orphan = make_account("3000", Some(AccountId::new()), false);
        let tree = build_tree(vec![orphan]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].account.code, "3000");
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut accounts = Vec::new();
        let mut parent: Option<AccountId> = None;
        for i in 0..10_000 {
            let account = make_account(&format!("{i:06}"), parent, false);
            parent = Some(account.id);
            accounts.push(account);
        }

        let tree = build_tree(accounts);
        let flat = flatten(&tree);
        assert_eq!(flat.len(), 10_000);
        assert_eq!(flat[0].code, "000000");
        assert_eq!(flat[9_999].code, "009999");
    }
}
