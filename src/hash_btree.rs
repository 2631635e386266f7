use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;

use rustc_hash::FxBuildHasher;

use crate::error::{Error, Result};
use crate::raw::{Insertion, Node, OnDuplicate, Pair, Validator};
use crate::{BranchingFactor, Key};

mod bulk;
mod dump;

pub use dump::Dump;

/// A B-tree of elements ordered by their hash.
///
/// Each element's [`Key`] is derived once, on insertion, by hashing the element
/// with the tree's [`BuildHasher`] `S`. Lookups and removals are by key; an
/// in-order read returns elements sorted by key.
///
/// The maximum number of children per node is fixed at construction by a
/// [`BranchingFactor`]. Nodes split when they overflow and are refilled by
/// stealing from a sibling (left first, then right) or merged with a sibling
/// (left preferred) when they underflow, so every leaf stays at the same depth.
///
/// It is a logic error for an element's hash to change while it is in the tree,
/// or for two distinct elements in the same tree to hash to the same key. The
/// second of two colliding elements is reported as
/// [`AlreadyPresent`](Error::AlreadyPresent) by [`insert`](Self::insert) and
/// overwrites the first under [`replace`](Self::replace).
///
/// # Examples
///
/// ```
/// use hash_btree::{Error, HashBTree};
///
/// let mut tree = HashBTree::with_branching_factor(4);
/// tree.insert("Alice").unwrap();
/// tree.insert("Bob").unwrap();
///
/// let alice = tree.key_of(&"Alice");
/// assert!(matches!(tree.insert("Alice"), Err(Error::AlreadyPresent { .. })));
/// assert!(tree.contains(&"Bob"));
///
/// assert_eq!(tree.remove(alice), Some("Alice"));
/// assert_eq!(tree.len(), 1);
/// assert!(tree.valid());
/// ```
#[derive(Clone)]
pub struct HashBTree<T, S = FxBuildHasher> {
    root: Option<Box<Node<T>>>,
    len: usize,
    order: BranchingFactor,
    hasher: S,
}

impl<T> HashBTree<T, FxBuildHasher> {
    /// Makes a new, empty `HashBTree` with the default branching factor.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use hash_btree::{BranchingFactor, HashBTree};
    ///
    /// let tree: HashBTree<u32> = HashBTree::new();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.branching_factor(), BranchingFactor::DEFAULT);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_order_and_hasher(BranchingFactor::DEFAULT, FxBuildHasher)
    }

    /// Makes a new, empty `HashBTree` whose nodes have at most `max_children`
    /// children.
    ///
    /// # Panics
    ///
    /// Panics if `max_children <= 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hash_btree::HashBTree;
    ///
    /// let tree: HashBTree<u32> = HashBTree::with_branching_factor(3);
    /// assert_eq!(tree.branching_factor().max_elements(), 2);
    /// ```
    #[must_use]
    pub const fn with_branching_factor(max_children: usize) -> Self {
        Self::with_order_and_hasher(BranchingFactor::new(max_children), FxBuildHasher)
    }
}

impl<T, S> HashBTree<T, S> {
    /// Makes a new, empty `HashBTree` with the default branching factor that
    /// derives keys with `hasher`.
    #[must_use]
    pub const fn with_hasher(hasher: S) -> Self {
        Self::with_order_and_hasher(BranchingFactor::DEFAULT, hasher)
    }

    /// Makes a new, empty `HashBTree` with the given branching factor that
    /// derives keys with `hasher`.
    ///
    /// # Panics
    ///
    /// Panics if `max_children <= 2`.
    #[must_use]
    pub const fn with_branching_factor_and_hasher(max_children: usize, hasher: S) -> Self {
        Self::with_order_and_hasher(BranchingFactor::new(max_children), hasher)
    }

    const fn with_order_and_hasher(order: BranchingFactor, hasher: S) -> Self {
        Self {
            root: None,
            len: 0,
            order,
            hasher,
        }
    }

    /// Returns the branching factor fixed at construction.
    #[must_use]
    pub const fn branching_factor(&self) -> BranchingFactor {
        self.order
    }

    /// Returns the hasher used to derive keys.
    #[must_use]
    pub const fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the number of elements in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of edges on a root-to-leaf path: 0 when the tree is
    /// empty or the root is a leaf.
    ///
    /// # Complexity
    ///
    /// O(height)
    ///
    /// # Examples
    ///
    /// ```
    /// use hash_btree::HashBTree;
    ///
    /// let mut tree = HashBTree::with_branching_factor(3);
    /// assert_eq!(tree.height(), 0);
    /// tree.insert(1u64).unwrap();
    /// assert_eq!(tree.height(), 0);
    /// tree.extend([2, 3]);
    /// assert_eq!(tree.height(), 1);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let Some(mut node) = self.root.as_deref() else {
            return 0;
        };
        while let Some(child) = node.children().first() {
            height += 1;
            node = &**child;
        }
        height
    }

    /// Removes every element. The nodes are dropped with the root.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(len = self.len, "cleared tree");

        self.root = None;
        self.len = 0;
    }

    /// Returns the element stored under `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use hash_btree::HashBTree;
    ///
    /// let mut tree = HashBTree::new();
    /// tree.insert('x').unwrap();
    ///
    /// assert_eq!(tree.find(tree.key_of(&'x')), Some(&'x'));
    /// assert_eq!(tree.find(tree.key_of(&'y')), None);
    /// ```
    #[must_use]
    pub fn find(&self, key: Key) -> Option<&T> {
        self.root.as_deref()?.find(key)
    }

    /// Returns `true` if an element is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Removes and returns the element stored under `key`.
    ///
    /// Removing an absent key is not an error and leaves the tree unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub fn remove(&mut self, key: Key) -> Option<T> {
        let root = self.root.as_deref_mut()?;
        let removed = root.remove(key, self.order)?;
        self.len -= 1;

        if root.pairs().is_empty() {
            // A root without pairs has at most one child left after a merge.
            let collapsed = root.take_only_child();

            #[cfg(feature = "tracing")]
            tracing::debug!(emptied = collapsed.is_none(), "collapsed root");

            self.root = collapsed;
        }

        Some(removed)
    }

    /// Returns references to every element, sorted by key.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn to_vec(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = self.root.as_deref() {
            root.collect_into(&mut out);
        }
        out
    }

    /// Consumes the tree, returning every element sorted by key.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = self.root {
            Node::drain_into(*root, &mut out);
        }
        out
    }

    /// Returns `true` if every structural invariant holds.
    ///
    /// Intended for tests and debug assertions; it walks the whole tree.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.violations().is_empty()
    }

    /// Returns a description of every broken structural invariant.
    ///
    /// Checks that keys are strictly sorted within each node and bracketed by
    /// their parent's separators, that node sizes are within the branching
    /// factor's bounds (the root only needs one element), that every leaf is at
    /// the same depth, and that [`len`](Self::len) matches the stored elements.
    #[must_use]
    pub fn violations(&self) -> Vec<String> {
        let mut validator = Validator::new(self.order);
        let count = self.root.as_deref().map_or(0, |root| validator.check(root, 0, None, None));
        if count != self.len {
            validator.push(format!("len mismatch: self.len={}, actual count={count}", self.len));
        }
        validator.into_errors()
    }

    /// Returns a [`Display`](fmt::Display)able listing of the tree's keys, one
    /// node per line, indented by depth.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::hash::{BuildHasherDefault, Hasher};
    /// use hash_btree::HashBTree;
    ///
    /// #[derive(Default)]
    /// struct Identity(u64);
    ///
    /// impl Hasher for Identity {
    ///     fn finish(&self) -> u64 { self.0 }
    ///     fn write(&mut self, _: &[u8]) { unimplemented!() }
    ///     fn write_u64(&mut self, n: u64) { self.0 = n; }
    /// }
    ///
    /// let mut tree = HashBTree::with_branching_factor_and_hasher(3, BuildHasherDefault::<Identity>::default());
    /// tree.extend([5u64, 3, 8, 1]);
    /// assert_eq!(tree.dump().to_string(), "[5]\n  [1, 3]\n  [8]\n");
    /// ```
    #[must_use]
    pub fn dump(&self) -> Dump<'_, T> {
        Dump::new(self.root.as_deref())
    }
}

impl<T: Hash, S: BuildHasher> HashBTree<T, S> {
    /// Derives the key `element` would be stored under.
    #[must_use]
    pub fn key_of(&self, element: &T) -> Key {
        Key::of(&self.hasher, element)
    }

    /// Inserts `element`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyPresent`] if an element with the same key is
    /// already stored; the tree is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, element: T) -> Result<()> {
        self.insert_with(element, OnDuplicate::Reject).map(|_| ())
    }

    /// Inserts `element`, overwriting any element stored under the same key.
    ///
    /// Returns the overwritten element, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use hash_btree::HashBTree;
    ///
    /// let mut tree = HashBTree::new();
    /// assert_eq!(tree.replace(7u8), None);
    /// assert_eq!(tree.replace(7u8), Some(7));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn replace(&mut self, element: T) -> Option<T> {
        self.insert_with(element, OnDuplicate::Replace).ok().flatten()
    }

    fn insert_with(&mut self, element: T, on_duplicate: OnDuplicate) -> Result<Option<T>> {
        let pair = Pair::new(self.key_of(&element), element);

        let Some(root) = self.root.as_deref_mut() else {
            self.root = Some(Box::new(Node::leaf(pair)));
            self.len = 1;
            return Ok(None);
        };

        match root.insert(pair, on_duplicate, self.order)? {
            Insertion::Inserted => {}
            Insertion::Replaced(displaced) => return Ok(Some(displaced)),
            Insertion::Split { separator, right } => {
                #[cfg(feature = "tracing")]
                tracing::debug!(separator = %separator.key(), "grew new root");

                if let Some(left) = self.root.take() {
                    self.root = Some(Box::new(Node::joined(left, separator, right)));
                }
            }
        }

        self.len += 1;
        Ok(None)
    }
}

impl<T: Hash + Eq, S: BuildHasher> HashBTree<T, S> {
    /// Returns `true` if the tree stores an element equal to `element`.
    ///
    /// The element is located by its key and then compared for equality.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.find(self.key_of(element)).is_some_and(|found| found == element)
    }
}

impl<T> Default for HashBTree<T, FxBuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for HashBTree<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.to_vec()).finish()
    }
}

impl<T, S> Index<Key> for HashBTree<T, S> {
    type Output = T;

    /// Returns the element stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if no element is stored under `key`.
    fn index(&self, key: Key) -> &T {
        match self.find(key) {
            Some(element) => element,
            None => panic!("{}", Error::NotPresent { key }),
        }
    }
}
