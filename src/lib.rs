//! An ordered binary search tree container.
//!
//! [`Tree`] stores unique-by-comparator values and exposes the usual
//! collection surface (insert, remove, contains, len, clear, bulk copy)
//! together with lazy pre-order, in-order, and post-order traversals.
//! The tree is not self-balancing: its shape depends on insertion order.
//!
//! The ordering is either the element type's natural order or a comparison
//! function supplied at construction; it never changes afterwards.
//!
//! ```
//! use arbre::Tree;
//!
//! let mut tree: Tree<i32> = [4, 2, 6].into_iter().collect();
//! tree.insert(5);
//! assert!(tree.contains(&5));
//! assert_eq!(tree.in_order().copied().collect::<Vec<_>>(), vec![2, 4, 5, 6]);
//!
//! assert!(tree.remove(&4));
//! assert!(!tree.remove(&4));
//! assert_eq!(tree.len(), 3);
//! ```
mod iter;
mod node;
mod tree;

pub use iter::{InOrder, PostOrder, PreOrder};

use std::{cmp::Ordering, ptr::NonNull};

pub(crate) type NodePtr<T> = Option<NonNull<Node<T>>>;

pub(crate) trait NodePtrExt {
    type Value;

    fn set_parent(&mut self, parent: NodePtr<Self::Value>);
}

impl<T> NodePtrExt for NodePtr<T> {
    type Value = T;

    #[inline(always)]
    fn set_parent(&mut self, parent: NodePtr<T>) {
        if let Some(node) = self {
            // SAFETY: callers only hold NodePtrs to nodes that are still
            // linked into a live tree.
            unsafe { node.as_mut() }.parent = parent;
        }
    }
}

/// One stored element and its structural links.
///
/// `left` and `right` are owned by convention: a node is allocated with
/// `Box::into_raw` when it enters the tree and released with `Box::from_raw`
/// exactly once when it leaves. `parent` is non-owning and is never followed
/// for lifetime purposes, only for upward navigation while splicing during
/// removal.
pub(crate) struct Node<T> {
    pub(crate) left: NodePtr<T>,
    pub(crate) right: NodePtr<T>,
    pub(crate) parent: NodePtr<T>,
    pub(crate) value: T,
}

/// An ordered binary search tree of unique-by-comparator values.
///
/// `root` transitively owns the whole node graph; `len` always equals the
/// number of nodes reachable from it. Values are never replaced in place,
/// so the ordering invariant cannot be broken through the public surface.
pub struct Tree<T> {
    root: NodePtr<T>,
    compare: Box<dyn Fn(&T, &T) -> Ordering>,
    len: usize,
}

/// Errors surfaced by [`Tree::copy_to`].
///
/// Validation happens before any element is written, so a failed call
/// leaves the destination untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The start index lies outside the destination buffer.
    #[error("start index {index} is out of range for a buffer of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// The destination cannot hold every element of the tree.
    #[error("buffer of length {len} cannot hold {count} elements starting at index {index}")]
    BufferTooSmall { len: usize, index: usize, count: usize },
}
