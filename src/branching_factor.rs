/// The branching factor of a [`HashBTree`](crate::HashBTree): the maximum number
/// of children a node may have.
///
/// Every node bound is derived from it:
///
/// | bound          | value                      |
/// |----------------|----------------------------|
/// | `max_children` | `n`                        |
/// | `max_elements` | `n - 1`                    |
/// | `min_children` | `ceil(n / 2)`              |
/// | `min_elements` | `min_children - 1`         |
///
/// The root is exempt from both minimums.
///
/// # Notes
///
/// For even `n`, `min_children` is `n / 2`, one below `ceil((n + 1) / 2)`, so an
/// overfull node still splits into two legal halves.
///
/// # Examples
///
/// ```
/// use hash_btree::BranchingFactor;
///
/// let order = BranchingFactor::new(5);
/// assert_eq!(order.max_elements(), 4);
/// assert_eq!(order.min_children(), 3);
/// assert_eq!(order.min_elements(), 2);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct BranchingFactor(usize);

impl BranchingFactor {
    /// The branching factor used by [`HashBTree::new`](crate::HashBTree::new).
    pub const DEFAULT: Self = Self::new(16);

    /// Creates a branching factor of `max_children`.
    ///
    /// # Panics
    ///
    /// Panics if `max_children <= 2`.
    #[inline]
    #[must_use]
    pub const fn new(max_children: usize) -> Self {
        assert!(max_children > 2, "`BranchingFactor::new()` - `max_children` must be > 2!");
        Self(max_children)
    }

    /// Maximum number of children of an internal node.
    #[inline]
    #[must_use]
    pub const fn max_children(self) -> usize {
        self.0
    }

    /// Maximum number of elements held by any node.
    #[inline]
    #[must_use]
    pub const fn max_elements(self) -> usize {
        self.0 - 1
    }

    /// Minimum number of children of a non-root internal node.
    #[inline]
    #[must_use]
    pub const fn min_children(self) -> usize {
        self.0.div_ceil(2)
    }

    /// Minimum number of elements held by a non-root node.
    #[inline]
    #[must_use]
    pub const fn min_elements(self) -> usize {
        self.min_children() - 1
    }
}

impl Default for BranchingFactor {
    fn default() -> Self {
        Self::DEFAULT
    }
}
