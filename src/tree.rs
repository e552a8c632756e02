use std::{
    cmp::Ordering::{self, Equal, Greater, Less},
    fmt,
    ptr::NonNull,
};

use crate::{
    Error, Node, NodePtr, NodePtrExt, Tree,
    iter::{InOrder, PostOrder, PreOrder},
    node::own_back,
};

impl<T: Ord + 'static> Tree<T> {
    /// An empty tree ordered by the element type's natural order.
    pub fn new() -> Self {
        Self::with_comparator(T::cmp)
    }
}

impl<T: Ord + 'static> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + 'static> FromIterator<T> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(source: I) -> Self {
        let mut tree = Self::new();
        tree.extend(source);
        tree
    }
}

impl<T> Extend<T> for Tree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, source: I) {
        for item in source {
            self.insert(item);
        }
    }
}

impl<T> Tree<T> {
    /// An empty tree ordered by `compare`.
    ///
    /// `compare` must be a strict total order; the tree's behavior is
    /// unspecified under an asymmetric or intransitive comparison. A
    /// comparator object is passed as a closure capturing it.
    pub fn with_comparator(compare: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        Tree {
            root: None,
            compare: Box::new(compare),
            len: 0,
        }
    }

    /// A tree ordered by `compare`, seeded by inserting the elements of
    /// `source` one by one in iteration order. The resulting shape depends
    /// on that order; comparator-equal duplicates in `source` are dropped.
    pub fn with_comparator_from<I>(
        compare: impl Fn(&T, &T) -> Ordering + 'static,
        source: I,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::with_comparator(compare);
        tree.extend(source);
        tree
    }

    /// Inserts `item` unless a comparator-equal element is already present.
    /// Returns whether the tree changed; a duplicate is a silent no-op.
    pub fn insert(&mut self, item: T) -> bool {
        let Some(mut current) = self.root else {
            self.root = Some(Node::leak(item));
            self.len += 1;
            return true;
        };
        loop {
            // SAFETY: current is reachable from the root, hence live, and
            // &mut self guarantees no other reference into the tree exists.
            let node = unsafe { current.as_mut() };
            match (self.compare)(&item, &node.value) {
                Less => match node.left {
                    Some(left) => current = left,
                    None => {
                        let mut new = Node::leak(item);
                        // SAFETY: freshly allocated, nothing else points at it.
                        unsafe { new.as_mut() }.parent = Some(current);
                        node.left = Some(new);
                        self.len += 1;
                        return true;
                    }
                },
                Greater => match node.right {
                    Some(right) => current = right,
                    None => {
                        let mut new = Node::leak(item);
                        // SAFETY: freshly allocated, nothing else points at it.
                        unsafe { new.as_mut() }.parent = Some(current);
                        node.right = Some(new);
                        self.len += 1;
                        return true;
                    }
                },
                Equal => return false,
            }
        }
    }

    /// Whether a comparator-equal element is present.
    pub fn contains(&self, item: &T) -> bool {
        self.find_node(item).is_some()
    }

    fn find_node(&self, item: &T) -> NodePtr<T> {
        let mut current = self.root;
        while let Some(candidate) = current {
            // SAFETY: candidate is reachable from the root, hence live.
            let node = unsafe { candidate.as_ref() };
            match (self.compare)(item, &node.value) {
                Equal => break,
                Less => current = node.left,
                Greater => current = node.right,
            }
        }
        current
    }

    /// Removes the unique comparator-equal element, if present. Returns
    /// whether a removal occurred; an absent item is not an error.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(node) = self.find_node(item) else {
            return false;
        };
        self.unlink(node);
        // SAFETY: unlink disconnected every tree pointer to the node; this
        // is the unique release of its allocation.
        drop(unsafe { own_back(node) });
        self.len -= 1;
        true
    }

    /// Detaches `node` from the tree, leaving all remaining links valid.
    /// Does not free the node and does not touch `len`.
    fn unlink(&mut self, node_ptr: NonNull<Node<T>>) {
        // SAFETY: node_ptr came from find_node on this tree and is live.
        let (left, right, parent) = {
            let node = unsafe { node_ptr.as_ref() };
            (node.left, node.right, node.parent)
        };
        match (left, right) {
            (None, None) => self.change_child(node_ptr, None, parent),
            (child @ Some(_), None) | (None, child @ Some(_)) => {
                let mut child = child;
                child.set_parent(parent);
                self.change_child(node_ptr, child, parent);
            }
            (Some(left), Some(_)) => {
                // In-order predecessor: the rightmost node of the left
                // subtree. It has no right child, so detaching it is the
                // leaf or one-child case in miniature.
                // SAFETY: left is a live child of node_ptr.
                let (mut pred, mut pred_parent) = unsafe { left.as_ref() }.rightmost(node_ptr);
                let mut pred_left = unsafe { pred.as_ref() }.left;
                pred_left.set_parent(Some(pred_parent));
                // SAFETY: pred_parent is live; pred hangs off its left slot
                // exactly when the descent never advanced.
                unsafe {
                    if pred_parent == node_ptr {
                        pred_parent.as_mut().left = pred_left;
                    } else {
                        pred_parent.as_mut().right = pred_left;
                    }
                }

                // Splice the predecessor into the removed node's position,
                // taking over its links. Re-read them: detaching the
                // predecessor may have rewritten the left one.
                let (new_left, new_right) = {
                    let node = unsafe { node_ptr.as_ref() };
                    (node.left, node.right)
                };
                // SAFETY: pred is now unlinked, so no aliasing reference to
                // it exists; its new children are distinct live nodes.
                unsafe {
                    let spliced = pred.as_mut();
                    spliced.left = new_left;
                    spliced.right = new_right;
                    spliced.parent = parent;
                    spliced.left.set_parent(Some(pred));
                    spliced.right.set_parent(Some(pred));
                }
                self.change_child(node_ptr, Some(pred), parent);
            }
        }
    }

    fn change_child(&mut self, old: NonNull<Node<T>>, new: NodePtr<T>, parent: NodePtr<T>) {
        if let Some(mut parent) = parent {
            // SAFETY: parent is live and &mut self guarantees exclusivity.
            let parent = unsafe { parent.as_mut() };
            if parent.left == Some(old) {
                parent.left = new;
            } else {
                parent.right = new;
            }
        } else {
            self.root = new;
        }
    }

    /// Drops every node and resets the length to zero.
    pub fn clear(&mut self) {
        let mut stack: Vec<NonNull<Node<T>>> = self.root.take().into_iter().collect();
        while let Some(node) = stack.pop() {
            // SAFETY: each node is reached exactly once from its unique
            // owning link; children are saved before the release.
            let node = unsafe { own_back(node) };
            stack.extend(node.left);
            stack.extend(node.right);
        }
        self.len = 0;
    }

    /// Number of elements, maintained incrementally; O(1).
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Part of the collection contract; mutation is always allowed.
    pub const fn is_read_only(&self) -> bool {
        false
    }

    /// Clones every element into `buffer[start..]` in default enumeration
    /// order (pre-order). Bounds are validated before anything is written.
    pub fn copy_to(&self, buffer: &mut [T], start: usize) -> Result<(), Error>
    where
        T: Clone,
    {
        if start >= buffer.len() {
            return Err(Error::IndexOutOfRange {
                index: start,
                len: buffer.len(),
            });
        }
        if buffer.len() - start < self.len {
            return Err(Error::BufferTooSmall {
                len: buffer.len(),
                index: start,
                count: self.len,
            });
        }
        for (slot, value) in buffer[start..].iter_mut().zip(self.iter()) {
            *slot = value.clone();
        }
        Ok(())
    }

    /// Iterates in the default enumeration order (pre-order).
    pub fn iter(&self) -> PreOrder<'_, T> {
        self.pre_order()
    }

    /// A fresh pre-order traversal: node, left subtree, right subtree.
    pub fn pre_order(&self) -> PreOrder<'_, T> {
        PreOrder::new(self.root)
    }

    /// A fresh in-order traversal: comparator-ascending order.
    pub fn in_order(&self) -> InOrder<'_, T> {
        InOrder::new(self.root)
    }

    /// A fresh post-order traversal: left subtree, right subtree, node.
    pub fn post_order(&self) -> PostOrder<'_, T> {
        PostOrder::new(self.root)
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.in_order()).finish()
    }
}


#[cfg(test)]
mod props {
    use super::*;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use std::collections::BTreeSet;

    /// A random mutation to replay against both the tree and a model set.
    #[derive(Copy, Clone, Debug)]
    enum Op {
        Insert(i8),
        Remove(i8),
    }

    impl Arbitrary for Op {
        fn arbitrary(g: &mut Gen) -> Self {
            if bool::arbitrary(g) {
                Op::Insert(i8::arbitrary(g))
            } else {
                Op::Remove(i8::arbitrary(g))
            }
        }
    }

    #[quickcheck]
    fn in_order_is_sorted_and_deduplicated(xs: Vec<i16>) -> bool {
        let tree: Tree<i16> = xs.iter().copied().collect();
        let expected: Vec<i16> = xs.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        tree.in_order().copied().collect::<Vec<_>>() == expected
    }

    #[quickcheck]
    fn traversal_lengths_match_len(xs: Vec<i16>) -> bool {
        let tree: Tree<i16> = xs.into_iter().collect();
        tree.pre_order().count() == tree.len()
            && tree.in_order().count() == tree.len()
            && tree.post_order().count() == tree.len()
    }

    #[quickcheck]
    fn tracks_a_btreeset_model(ops: Vec<Op>) -> bool {
        let mut tree: Tree<i8> = Tree::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(n) => assert_eq!(model.insert(n), tree.insert(n)),
                Op::Remove(n) => assert_eq!(model.remove(&n), tree.remove(&n)),
            }
        }

        tree.len() == model.len()
            && model.iter().all(|n| tree.contains(n))
            && tree.in_order().copied().collect::<Vec<_>>()
                == model.into_iter().collect::<Vec<_>>()
    }

    #[quickcheck]
    fn removing_everything_empties_the_tree(xs: Vec<i8>) -> bool {
        let mut tree: Tree<i8> = xs.iter().copied().collect();
        for x in xs.iter().copied().collect::<BTreeSet<_>>() {
            if !tree.remove(&x) {
                return false;
            }
        }
        tree.is_empty() && tree.pre_order().next().is_none()
    }
}
