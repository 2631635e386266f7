//! An order-bounded B-tree keyed by each element's hash.
//!
//! This crate provides [`HashBTree`], a self-balancing B-tree whose elements are
//! ordered by a [`Key`] derived once from each element's [`Hash`](core::hash::Hash)
//! implementation. The maximum number of children per node is a
//! [`BranchingFactor`] fixed when the tree is built.
//!
//! # Example
//!
//! ```
//! use hash_btree::{Error, HashBTree};
//!
//! let mut tags = HashBTree::with_branching_factor(5);
//! tags.insert("rust").unwrap();
//! tags.insert("btree").unwrap();
//!
//! // Duplicates are rejected by `insert`...
//! assert!(matches!(tags.insert("rust"), Err(Error::AlreadyPresent { .. })));
//! // ...and overwrite under `replace`.
//! assert_eq!(tags.replace("rust"), Some("rust"));
//!
//! // Lookups and removals go through the derived key.
//! let key = tags.key_of(&"btree");
//! assert_eq!(tags[key], "btree");
//! assert_eq!(tags.remove(key), Some("btree"));
//!
//! assert_eq!(tags.len(), 1);
//! assert!(tags.valid());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Deterministic shape** - Splits at the truncated midpoint; underflow is fixed by stealing
//!   from the left sibling, then the right, then merging (left preferred)
//! - **`tracing`** - Optional feature emitting structural events (splits, steals, merges,
//!   root growth and collapse) through the `tracing` crate
//!
//! # Implementation
//!
//! Nodes own their children directly (`Box`ed, no parent pointers). Every
//! node, internal or leaf, stores key/element pairs; lookups stop at the first
//! node holding the key. Insertion and removal recurse from the root and
//! resolve overflow and underflow on the way back up.

#![no_std]
#![deny(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod branching_factor;
mod error;
mod key;
mod raw;
#[cfg(test)]
mod testing;

pub mod hash_btree;

pub use branching_factor::BranchingFactor;
pub use error::{Error, Result};
pub use hash_btree::HashBTree;
pub use key::Key;
