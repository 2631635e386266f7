use core::fmt;

use crate::raw::Node;

/// An indented listing of a [`HashBTree`](super::HashBTree)'s keys.
///
/// Each node is printed on its own line as a bracketed list of keys, indented
/// by two spaces per level below the root. Children follow their parent in
/// order. An empty tree prints nothing.
///
/// This `struct` is created by [`HashBTree::dump`](super::HashBTree::dump).
#[must_use = "a dump does nothing unless formatted"]
pub struct Dump<'a, T> {
    root: Option<&'a Node<T>>,
}

impl<'a, T> Dump<'a, T> {
    pub(super) fn new(root: Option<&'a Node<T>>) -> Self {
        Self { root }
    }
}

impl<T> fmt::Display for Dump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => write_node(f, root, 0),
            None => Ok(()),
        }
    }
}

impl<T> fmt::Debug for Dump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn write_node<T>(f: &mut fmt::Formatter<'_>, node: &Node<T>, depth: usize) -> fmt::Result {
    write!(f, "{:indent$}[", "", indent = depth * 2)?;
    for (i, pair) in node.pairs().iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", pair.key())?;
    }
    f.write_str("]\n")?;

    for child in node.children() {
        write_node(f, child, depth + 1)?;
    }
    Ok(())
}
