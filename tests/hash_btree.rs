use std::collections::BTreeMap;
use std::hash::{BuildHasherDefault, Hasher};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use hash_btree::{Error, HashBTree, Key};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Hashes `u64` values to themselves so keys equal the inserted integers.
#[derive(Default)]
struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = (self.0 << 8) | u64::from(byte);
        }
    }

    fn write_u64(&mut self, value: u64) {
        self.0 = value;
    }
}

type Identity = BuildHasherDefault<IdentityHasher>;
type Tree = HashBTree<u64, Identity>;

fn tree(max_children: usize) -> Tree {
    HashBTree::with_branching_factor_and_hasher(max_children, Identity::default())
}

fn elements(tree: &Tree) -> Vec<u64> {
    tree.to_vec().into_iter().copied().collect()
}

/// Generates values in a range small enough to cause collisions.
fn value_strategy() -> impl Strategy<Value = u64> {
    0u64..2_000
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(u64),
    Replace(u64),
    Remove(u64),
    Find(u64),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        5 => value_strategy().prop_map(TreeOp::Insert),
        1 => value_strategy().prop_map(TreeOp::Replace),
        3 => value_strategy().prop_map(TreeOp::Remove),
        2 => value_strategy().prop_map(TreeOp::Find),
    ]
}

// ─── Model-based checks ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Replays a random sequence of operations on both a `HashBTree` and a
    /// `BTreeMap` keyed the same way, and asserts identical results and valid
    /// structure at every step.
    #[test]
    fn ops_match_btreemap(
        max_children in 3usize..12,
        ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE),
    ) {
        let mut tree = tree(max_children);
        let mut model: BTreeMap<u64, u64> = BTreeMap::new();

        for op in &ops {
            match *op {
                TreeOp::Insert(v) => {
                    let result = tree.insert(v);
                    if model.contains_key(&v) {
                        prop_assert_eq!(result, Err(Error::AlreadyPresent { key: Key(v) }), "insert({})", v);
                    } else {
                        prop_assert_eq!(result, Ok(()), "insert({})", v);
                        model.insert(v, v);
                    }
                }
                TreeOp::Replace(v) => {
                    prop_assert_eq!(tree.replace(v), model.insert(v, v), "replace({})", v);
                }
                TreeOp::Remove(v) => {
                    prop_assert_eq!(tree.remove(Key(v)), model.remove(&v), "remove({})", v);
                }
                TreeOp::Find(v) => {
                    prop_assert_eq!(tree.find(Key(v)), model.get(&v), "find({})", v);
                    prop_assert_eq!(tree.contains(&v), model.contains_key(&v), "contains({})", v);
                }
            }
            prop_assert_eq!(tree.len(), model.len(), "len mismatch after {:?}", op);
            let violations = tree.violations();
            prop_assert!(violations.is_empty(), "after {:?}: {:?}", op, violations);
        }

        let expected: Vec<u64> = model.into_values().collect();
        prop_assert_eq!(elements(&tree), expected);
    }

    /// In-order reads are sorted, and feeding them back through `set_elements`
    /// reproduces them.
    #[test]
    fn sorted_round_trip(
        max_children in 3usize..12,
        values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE),
    ) {
        let mut tree = tree(max_children);
        tree.extend(values.iter().copied());

        let mut expected = values.clone();
        expected.sort_unstable();
        expected.dedup();
        let read = elements(&tree);
        prop_assert_eq!(&read, &expected);

        let mut copy = self::tree(max_children);
        copy.set_elements(read.iter().copied());
        prop_assert_eq!(elements(&copy), read);
        prop_assert!(copy.valid());
    }

    /// Removing everything leaves a tree indistinguishable from a new one.
    #[test]
    fn removing_everything_empties_the_tree(
        max_children in 3usize..12,
        values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE),
        seed in any::<u64>(),
    ) {
        let mut tree = tree(max_children);
        tree.extend(values.iter().copied());

        let mut order = values.clone();
        order.sort_unstable_by_key(|v| v.wrapping_mul(seed | 1).rotate_left(17));
        for v in order {
            let _ = tree.remove(Key(v));
            prop_assert!(tree.valid());
        }

        let fresh = self::tree(max_children);
        prop_assert_eq!(tree.len(), 0);
        prop_assert_eq!(tree.height(), 0);
        prop_assert_eq!(tree.dump().to_string(), fresh.dump().to_string());
        prop_assert!(tree.to_vec().is_empty());
    }

    /// Height stays logarithmic in the element count. With `t` the minimum
    /// fan-out, a tree of height `h` holds at least `2 * t^h - 1` elements,
    /// which keeps `h <= ceil(log_t(n + 1)) + 1`.
    #[test]
    fn height_is_logarithmic(
        max_children in 3usize..12,
        values in proptest::collection::vec(any::<u64>(), 1..TEST_SIZE),
    ) {
        let mut tree = tree(max_children);
        tree.extend(values.iter().copied());

        let t = tree.branching_factor().min_children() as u128;
        let n = tree.len() as u128;
        let height = u32::try_from(tree.height()).unwrap();
        prop_assert!(2 * t.pow(height) - 1 <= n, "height {} too large for {} elements", height, n);

        let mut log = 0;
        while t.pow(log) < n + 1 {
            log += 1;
        }
        prop_assert!(height <= log + 1, "height {} exceeds ceil(log_{}({} + 1)) + 1", height, t, n);
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn insertion_and_deletion_scenario() {
    let mut tree = tree(3);

    tree.insert(5).unwrap();
    assert_eq!(tree.dump().to_string(), "[5]\n");
    assert_eq!(tree.height(), 0);
    tree.insert(3).unwrap();
    assert_eq!(tree.dump().to_string(), "[3, 5]\n");
    tree.insert(8).unwrap();
    assert_eq!(tree.dump().to_string(), "[5]\n  [3]\n  [8]\n");
    assert_eq!(tree.height(), 1);
    tree.insert(1).unwrap();
    assert_eq!(tree.dump().to_string(), "[5]\n  [1, 3]\n  [8]\n");
    assert_eq!(elements(&tree), vec![1, 3, 5, 8]);

    assert_eq!(tree.remove(Key(5)), Some(5));
    assert_eq!(tree.dump().to_string(), "[3]\n  [1]\n  [8]\n");
    assert_eq!(elements(&tree), vec![1, 3, 8]);
    assert!(tree.valid());
}

#[test]
fn ascending_inserts_build_three_levels() {
    let mut tree = tree(3);
    tree.extend(1..=7);
    assert_eq!(tree.dump().to_string(), "[4]\n  [2]\n    [1]\n    [3]\n  [6]\n    [5]\n    [7]\n");
    assert_eq!(tree.height(), 2);
    assert!(tree.valid());
}

#[test]
fn merge_cascades_to_root_collapse() {
    let mut tree = tree(3);
    tree.extend(1..=7);

    // [1] is minimal and so is every sibling, so merges cascade to the root.
    assert_eq!(tree.remove(Key(1)), Some(1));
    assert_eq!(tree.dump().to_string(), "[4, 6]\n  [2, 3]\n  [5]\n  [7]\n");
    assert_eq!(tree.height(), 1);
    assert!(tree.valid());
}

#[test]
fn duplicate_insert_leaves_tree_unchanged() {
    let mut tree = tree(4);
    tree.extend(0..100);
    let before = tree.dump().to_string();

    assert_eq!(tree.insert(42), Err(Error::AlreadyPresent { key: Key(42) }));
    assert_eq!(tree.dump().to_string(), before);
    assert_eq!(tree.len(), 100);
    assert!(tree.valid());
}

#[test]
fn removing_absent_key_is_a_no_op() {
    let mut tree = tree(4);
    tree.extend((0..100).map(|v| v * 2));
    let before = tree.dump().to_string();

    assert_eq!(tree.remove(Key(51)), None);
    assert_eq!(tree.dump().to_string(), before);
    assert_eq!(tree.len(), 100);
}

#[test]
fn default_hasher_round_trip() {
    let words = ["alpha", "beta", "gamma", "delta", "epsilon"];
    let tree: HashBTree<&str> = words.into_iter().collect();

    assert_eq!(tree.len(), words.len());
    for word in words {
        assert!(tree.contains(&word));
        assert_eq!(tree[tree.key_of(&word)], word);
    }
    assert!(!tree.contains(&"zeta"));
    assert!(tree.valid());
}

#[test]
fn debug_lists_elements_in_key_order() {
    let mut tree = tree(3);
    tree.extend([3, 1, 2]);
    assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
}

#[test]
#[should_panic(expected = "`BranchingFactor::new()` - `max_children` must be > 2!")]
fn binary_branching_factor_is_rejected() {
    let _ = tree(2);
}
