use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::node::Node;
use crate::{BranchingFactor, Key};

/// Walks a tree and records every broken structural invariant.
pub(crate) struct Validator {
    order: BranchingFactor,
    leaf_depth: Option<usize>,
    errors: Vec<String>,
}

impl Validator {
    pub(crate) fn new(order: BranchingFactor) -> Self {
        Self {
            order,
            leaf_depth: None,
            errors: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, error: String) {
        self.errors.push(error);
    }

    pub(crate) fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Checks the subtree rooted at `node`, whose keys must lie strictly
    /// between `lower` and `upper`. Returns the number of pairs it holds.
    pub(crate) fn check<T>(&mut self, node: &Node<T>, depth: usize, lower: Option<Key>, upper: Option<Key>) -> usize {
        let pairs = node.pairs();
        let children = node.children();
        let is_root = depth == 0;

        for (i, window) in pairs.windows(2).enumerate() {
            if window[0].key() >= window[1].key() {
                self.push(format!(
                    "Keys not sorted at depth {depth}, indices {} and {}: {} >= {}",
                    i,
                    i + 1,
                    window[0].key(),
                    window[1].key()
                ));
            }
        }

        for pair in pairs {
            let key = pair.key();
            if lower.is_some_and(|lower| key <= lower) || upper.is_some_and(|upper| key >= upper) {
                self.push(format!(
                    "Key {key} at depth {depth} outside separator range ({lower:?}, {upper:?})"
                ));
            }
        }

        let min_elements = if is_root { 1 } else { self.order.min_elements() };
        if pairs.len() < min_elements || pairs.len() > self.order.max_elements() {
            self.push(format!(
                "Node at depth {depth} holds {} pairs, expected {min_elements}..={}",
                pairs.len(),
                self.order.max_elements()
            ));
        }

        if children.is_empty() {
            match self.leaf_depth {
                None => self.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    self.push(format!("Leaf depth mismatch: expected {expected}, got {depth}"));
                }
                Some(_) => {}
            }
            return pairs.len();
        }

        if children.len() != pairs.len() + 1 {
            self.push(format!(
                "Internal node at depth {depth} has {} pairs but {} children",
                pairs.len(),
                children.len()
            ));
        }

        let min_children = if is_root { 2 } else { self.order.min_children() };
        if children.len() < min_children || children.len() > self.order.max_children() {
            self.push(format!(
                "Internal node at depth {depth} has {} children, expected {min_children}..={}",
                children.len(),
                self.order.max_children()
            ));
        }

        let mut total = pairs.len();
        for (i, child) in children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { pairs.get(i - 1).map(|pair| pair.key()) };
            let child_upper = pairs.get(i).map(|pair| pair.key()).or(upper);
            total += self.check(child, depth + 1, child_lower, child_upper);
        }
        total
    }
}
