//! Error types for `HashBTree` operations.

use thiserror::Error;

use crate::Key;

/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by [`HashBTree`](crate::HashBTree).
///
/// Only [`insert`](crate::HashBTree::insert) fails. Lookups and removals report
/// a missing key as `None`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// An element with the same key is already stored.
    #[error("key {key} is already present")]
    AlreadyPresent { key: Key },

    /// No element with this key is stored.
    ///
    /// Reserved; no operation returns it. Indexing a tree by a missing key
    /// panics with this message.
    #[error("key {key} is not present")]
    NotPresent { key: Key },
}
