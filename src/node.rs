use std::ptr::NonNull;

use crate::Node;

impl<T> Node<T> {
    pub(crate) fn new(value: T) -> Self {
        Node {
            left: None,
            right: None,
            parent: None,
            value,
        }
    }

    /// Moves a fresh unlinked node to the heap and leaks it; the tree frees
    /// it exactly once via [`own_back`].
    pub(crate) fn leak(value: T) -> NonNull<Self> {
        // SAFETY: Box::into_raw never returns null.
        unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Self::new(value)))) }
    }

    /// Rightmost node of the subtree rooted at `self`, together with its
    /// parent (or `fallback` when `self` itself is rightmost). The rightmost
    /// node is the in-order predecessor used when removing a node with two
    /// children.
    pub(crate) fn rightmost(
        &self,
        fallback: NonNull<Self>,
    ) -> (NonNull<Self>, NonNull<Self>) {
        let mut current = NonNull::from(self);
        let mut parent = fallback;
        // SAFETY: every right link reachable from a live node is live.
        while let Some(right) = unsafe { current.as_ref() }.right {
            parent = current;
            current = right;
        }
        (current, parent)
    }
}

/// Reclaims ownership of a node previously leaked by [`Node::leak`].
///
/// # Safety
///
/// `node` must be fully unlinked: nothing in the tree may still point at it,
/// and it must not be released a second time.
pub(crate) unsafe fn own_back<T>(node: NonNull<Node<T>>) -> Box<Node<T>> {
    unsafe { Box::from_raw(node.as_ptr()) }
}
