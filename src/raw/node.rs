use alloc::boxed::Box;
use alloc::vec::Vec;
use core::mem;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::{BranchingFactor, Key};

/// Number of pairs a node stores inline before spilling to the heap.
const INLINE_PAIRS: usize = 8;

pub(crate) type Pairs<T> = SmallVec<[Pair<T>; INLINE_PAIRS]>;
// Internal nodes hold one more child than pairs.
pub(crate) type Children<T> = SmallVec<[Box<Node<T>>; INLINE_PAIRS + 1]>;

/// An element together with the key derived from it.
#[derive(Clone, Debug)]
pub(crate) struct Pair<T> {
    key: Key,
    element: T,
}

impl<T> Pair<T> {
    pub(crate) fn new(key: Key, element: T) -> Self {
        Self { key, element }
    }

    #[inline]
    pub(crate) fn key(&self) -> Key {
        self.key
    }

    #[inline]
    pub(crate) fn element(&self) -> &T {
        &self.element
    }

    pub(crate) fn into_element(self) -> T {
        self.element
    }
}

/// A B-tree node. Leaves have no children; internal nodes have exactly one
/// more child than pairs.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pairs: Pairs<T>,
    children: Children<T>,
}

/// Result of searching for a key in a node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted, which is also
    /// the index of the child whose range brackets the key.
    NotFound(usize),
}

/// What an insertion does when the key is already stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OnDuplicate {
    Reject,
    Replace,
}

/// Result of inserting into a subtree.
pub(crate) enum Insertion<T> {
    /// A new pair was added without splitting this node.
    Inserted,
    /// An existing pair was overwritten; carries the displaced element.
    Replaced(T),
    /// A new pair was added and this node split; the caller must insert
    /// `separator` and `right` next to it.
    Split {
        separator: Pair<T>,
        right: Box<Node<T>>,
    },
}

impl<T> Node<T> {
    /// Creates a leaf holding a single pair.
    pub(crate) fn leaf(pair: Pair<T>) -> Self {
        let mut pairs = Pairs::new();
        pairs.push(pair);
        Self {
            pairs,
            children: Children::new(),
        }
    }

    /// Creates an internal node with one separator and two children, used when
    /// the root splits.
    pub(crate) fn joined(left: Box<Node<T>>, separator: Pair<T>, right: Box<Node<T>>) -> Self {
        let mut node = Self::leaf(separator);
        node.children.push(left);
        node.children.push(right);
        node
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub(crate) fn pairs(&self) -> &[Pair<T>] {
        &self.pairs
    }

    #[inline]
    pub(crate) fn children(&self) -> &[Box<Node<T>>] {
        &self.children
    }

    #[inline]
    pub(crate) fn search(&self, key: Key) -> SearchResult {
        match self.pairs.binary_search_by_key(&key, Pair::key) {
            Ok(index) => SearchResult::Found(index),
            Err(index) => SearchResult::NotFound(index),
        }
    }

    /// Returns the element stored under `key` in this subtree.
    pub(crate) fn find(&self, key: Key) -> Option<&T> {
        let mut node = self;
        loop {
            match node.search(key) {
                SearchResult::Found(index) => return Some(node.pairs[index].element()),
                SearchResult::NotFound(index) => node = node.children.get(index).map(|child| &**child)?,
            }
        }
    }

    /// Appends references to this subtree's elements, in key order.
    pub(crate) fn collect_into<'a>(&'a self, out: &mut Vec<&'a T>) {
        for (index, pair) in self.pairs.iter().enumerate() {
            if let Some(child) = self.children.get(index) {
                child.collect_into(out);
            }
            out.push(pair.element());
        }
        if let Some(last) = self.children.get(self.pairs.len()) {
            last.collect_into(out);
        }
    }

    /// Moves this subtree's elements into `out`, in key order.
    pub(crate) fn drain_into(self, out: &mut Vec<T>) {
        let Node { pairs, children } = self;
        let mut children = children.into_iter();
        for pair in pairs {
            if let Some(child) = children.next() {
                Node::drain_into(*child, out);
            }
            out.push(pair.into_element());
        }
        for child in children {
            Node::drain_into(*child, out);
        }
    }

    /// Inserts `pair` into this subtree.
    ///
    /// A duplicate key is detected before anything is mutated, so a rejected
    /// insertion leaves the subtree untouched.
    pub(crate) fn insert(
        &mut self,
        pair: Pair<T>,
        on_duplicate: OnDuplicate,
        order: BranchingFactor,
    ) -> Result<Insertion<T>> {
        let index = match self.search(pair.key) {
            SearchResult::Found(index) => {
                return match on_duplicate {
                    OnDuplicate::Reject => Err(Error::AlreadyPresent { key: pair.key }),
                    OnDuplicate::Replace => {
                        let displaced = mem::replace(&mut self.pairs[index], pair);
                        Ok(Insertion::Replaced(displaced.into_element()))
                    }
                };
            }
            SearchResult::NotFound(index) => index,
        };

        if self.is_leaf() {
            self.pairs.insert(index, pair);
        } else {
            match self.children[index].insert(pair, on_duplicate, order)? {
                Insertion::Split { separator, right } => {
                    self.pairs.insert(index, separator);
                    self.children.insert(index + 1, right);
                }
                done => return Ok(done),
            }
        }

        if self.pairs.len() > order.max_elements() {
            Ok(self.split())
        } else {
            Ok(Insertion::Inserted)
        }
    }

    /// Splits this node at the midpoint. This node keeps the left half; the
    /// median pair and the right half are returned.
    fn split(&mut self) -> Insertion<T> {
        let mid = self.pairs.len() / 2;

        let right_pairs: Pairs<T> = self.pairs.drain(mid + 1..).collect();
        let separator = self.pairs.remove(mid);
        let right_children: Children<T> = if self.is_leaf() {
            Children::new()
        } else {
            self.children.drain(mid + 1..).collect()
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            separator = %separator.key(),
            left = self.pairs.len(),
            right = right_pairs.len(),
            "split node"
        );

        Insertion::Split {
            separator,
            right: Box::new(Node {
                pairs: right_pairs,
                children: right_children,
            }),
        }
    }

    /// Removes the element stored under `key` from this subtree.
    ///
    /// Children left below the minimum size are rebalanced on the way back up.
    /// This node itself may be left undersized; that is the caller's concern.
    pub(crate) fn remove(&mut self, key: Key, order: BranchingFactor) -> Option<T> {
        match self.search(key) {
            SearchResult::Found(index) if self.is_leaf() => Some(self.pairs.remove(index).into_element()),
            SearchResult::Found(index) => {
                // Replace the separator with its in-order predecessor.
                let predecessor = self.children[index].remove_max(order)?;
                let removed = mem::replace(&mut self.pairs[index], predecessor);
                self.shrink_if_undersized(index, order);
                Some(removed.into_element())
            }
            SearchResult::NotFound(_) if self.is_leaf() => None,
            SearchResult::NotFound(index) => {
                let removed = self.children[index].remove(key, order)?;
                self.shrink_if_undersized(index, order);
                Some(removed)
            }
        }
    }

    /// Removes and returns the pair with the largest key in this subtree.
    fn remove_max(&mut self, order: BranchingFactor) -> Option<Pair<T>> {
        let Some(last) = self.children.len().checked_sub(1) else {
            return self.pairs.pop();
        };
        let max = self.children[last].remove_max(order)?;
        self.shrink_if_undersized(last, order);
        Some(max)
    }

    fn shrink_if_undersized(&mut self, index: usize, order: BranchingFactor) {
        if self.children[index].pairs.len() < order.min_elements() {
            self.shrink(index, order);
        }
    }

    /// Restores the minimum size of `children[index]`.
    ///
    /// Tries, in order: stealing from the left sibling, stealing from the right
    /// sibling, merging with the left sibling, merging with the right sibling.
    fn shrink(&mut self, index: usize, order: BranchingFactor) {
        let min = order.min_elements();
        if index > 0 && self.children[index - 1].pairs.len() > min {
            self.steal_from_left(index);
        } else if index + 1 < self.children.len() && self.children[index + 1].pairs.len() > min {
            self.steal_from_right(index);
        } else if index > 0 {
            self.merge_children(index - 1);
        } else {
            self.merge_children(index);
        }
    }

    /// Rotates the left sibling's last pair through the separator into
    /// `children[index]`.
    fn steal_from_left(&mut self, index: usize) {
        let (left, right) = self.children.split_at_mut(index);
        let (donor, child) = (&mut left[index - 1], &mut right[0]);

        let Some(pair) = donor.pairs.pop() else {
            return;
        };
        let separator = mem::replace(&mut self.pairs[index - 1], pair);

        #[cfg(feature = "tracing")]
        tracing::trace!(index, separator = %self.pairs[index - 1].key(), "stole from left sibling");

        child.pairs.insert(0, separator);
        if let Some(grandchild) = donor.children.pop() {
            child.children.insert(0, grandchild);
        }
    }

    /// Rotates the right sibling's first pair through the separator into
    /// `children[index]`.
    fn steal_from_right(&mut self, index: usize) {
        let (left, right) = self.children.split_at_mut(index + 1);
        let (child, donor) = (&mut left[index], &mut right[0]);

        if donor.pairs.is_empty() {
            return;
        }
        let pair = donor.pairs.remove(0);
        let separator = mem::replace(&mut self.pairs[index], pair);

        #[cfg(feature = "tracing")]
        tracing::trace!(index, separator = %self.pairs[index].key(), "stole from right sibling");

        child.pairs.push(separator);
        if !donor.children.is_empty() {
            child.children.push(donor.children.remove(0));
        }
    }

    /// Merges `children[left_index + 1]` and the separator between them into
    /// `children[left_index]`.
    fn merge_children(&mut self, left_index: usize) {
        let right = self.children.remove(left_index + 1);
        let separator = self.pairs.remove(left_index);

        #[cfg(feature = "tracing")]
        tracing::trace!(left_index, separator = %separator.key(), "merged siblings");

        self.children[left_index].absorb(separator, *right);
    }

    fn absorb(&mut self, separator: Pair<T>, right: Node<T>) {
        let Node { pairs, children } = right;
        self.pairs.push(separator);
        self.pairs.extend(pairs);
        self.children.extend(children);
    }

    /// Detaches the only child of a root that has run out of pairs.
    ///
    /// Returns `None` when the node still has pairs or has no child at all.
    pub(crate) fn take_only_child(&mut self) -> Option<Box<Node<T>>> {
        if self.pairs.is_empty() && self.children.len() == 1 {
            self.children.pop()
        } else {
            None
        }
    }
}
