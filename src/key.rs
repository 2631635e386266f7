use core::fmt;
use core::hash::{BuildHasher, Hash};

/// The ordering key of an element stored in a [`HashBTree`](crate::HashBTree).
///
/// A key is derived exactly once, when the element enters the tree, by hashing
/// the element with the tree's [`BuildHasher`]. The tree is ordered by key, so
/// in-order traversal yields elements sorted by their hash rather than by the
/// elements themselves.
///
/// Keys must be injective over the elements held by one tree: two distinct
/// elements that hash to the same key cannot both be stored, the second one is
/// reported as already present.
///
/// # Examples
///
/// ```
/// use hash_btree::{HashBTree, Key};
///
/// let mut tree = HashBTree::new();
/// tree.insert("apple").unwrap();
///
/// let key: Key = tree.key_of(&"apple");
/// assert_eq!(tree[key], "apple");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Key(pub u64);

impl Key {
    /// Derives the key of `element` using `hasher`.
    #[inline]
    #[must_use]
    pub fn of<S, T>(hasher: &S, element: &T) -> Self
    where
        S: BuildHasher,
        T: ?Sized + Hash,
    {
        Key(hasher.hash_one(element))
    }

    /// Returns the raw integer value of this key.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Key(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
