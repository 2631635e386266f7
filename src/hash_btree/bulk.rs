use core::hash::{BuildHasher, Hash};

use rustc_hash::FxBuildHasher;

use super::HashBTree;

impl<T: Hash, S: BuildHasher> HashBTree<T, S> {
    /// Replaces the contents of the tree with `elements`.
    ///
    /// The tree is cleared first. Elements whose key is already present are
    /// skipped, so the first of several elements sharing a key wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use hash_btree::HashBTree;
    ///
    /// let mut tree = HashBTree::new();
    /// tree.insert(100u32).unwrap();
    ///
    /// tree.set_elements([1u32, 2, 2, 3]);
    /// assert_eq!(tree.len(), 3);
    /// assert!(!tree.contains(&100));
    /// ```
    pub fn set_elements<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        self.extend(elements);
    }
}

impl<T: Hash> FromIterator<T> for HashBTree<T, FxBuildHasher> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = HashBTree::new();
        tree.extend(iter);
        tree
    }
}

/// Inserts every element, silently skipping those whose key is already present.
impl<T: Hash, S: BuildHasher> Extend<T> for HashBTree<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            // Duplicates keep the element already stored.
            let _ = self.insert(element);
        }
    }
}

impl<T: Hash, const N: usize> From<[T; N]> for HashBTree<T, FxBuildHasher> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T, S> IntoIterator for HashBTree<T, S> {
    type Item = T;
    type IntoIter = alloc::vec::IntoIter<T>;

    /// Consumes the tree, yielding its elements sorted by key.
    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}
