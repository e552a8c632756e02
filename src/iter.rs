use std::{iter::FusedIterator, marker::PhantomData, ptr::NonNull};

use crate::{Node, NodePtr, Tree};

/// Lazy pre-order traversal: a node, then its left subtree, then its right
/// subtree.
///
/// This is the tree's default enumeration order. The iterator is depth-first
/// over an explicit stack, so it holds O(height) state and never recurses.
pub struct PreOrder<'a, T> {
    stack: Vec<NonNull<Node<T>>>,
    phantom: PhantomData<&'a Node<T>>,
}

/// Lazy in-order traversal: left subtree, node, right subtree.
///
/// Over a valid tree this yields values in comparator-ascending order.
pub struct InOrder<'a, T> {
    stack: Vec<NonNull<Node<T>>>,
    descent: NodePtr<T>,
    phantom: PhantomData<&'a Node<T>>,
}

/// Lazy post-order traversal: left subtree, right subtree, node.
pub struct PostOrder<'a, T> {
    // The flag marks nodes whose children are already on the stack.
    stack: Vec<(NonNull<Node<T>>, bool)>,
    phantom: PhantomData<&'a Node<T>>,
}

impl<T> PreOrder<'_, T> {
    pub(crate) fn new(root: NodePtr<T>) -> Self {
        PreOrder {
            stack: root.into_iter().collect(),
            phantom: PhantomData,
        }
    }
}

impl<T> InOrder<'_, T> {
    pub(crate) fn new(root: NodePtr<T>) -> Self {
        InOrder {
            stack: Vec::new(),
            descent: root,
            phantom: PhantomData,
        }
    }
}

impl<T> PostOrder<'_, T> {
    pub(crate) fn new(root: NodePtr<T>) -> Self {
        PostOrder {
            stack: root.into_iter().map(|n| (n, false)).collect(),
            phantom: PhantomData,
        }
    }
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // SAFETY: every pointer on the stack came from a node of the tree
        // this iterator borrows, so it stays live for the borrow's duration.
        let node = unsafe { node.as_ref() };
        if let Some(right) = node.right {
            self.stack.push(right);
        }
        if let Some(left) = node.left {
            self.stack.push(left);
        }
        Some(&node.value)
    }
}

impl<'a, T> Iterator for InOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.descent {
            self.stack.push(node);
            // SAFETY: as for PreOrder, stack pointers outlive the iterator.
            self.descent = unsafe { node.as_ref() }.left;
        }
        let node = self.stack.pop()?;
        // SAFETY: as above.
        let node = unsafe { node.as_ref() };
        self.descent = node.right;
        Some(&node.value)
    }
}

impl<'a, T> Iterator for PostOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (ptr, expanded) = self.stack.pop()?;
            // SAFETY: as for PreOrder, stack pointers outlive the iterator.
            let node = unsafe { ptr.as_ref() };
            if expanded {
                return Some(&node.value);
            }
            self.stack.push((ptr, true));
            if let Some(right) = node.right {
                self.stack.push((right, false));
            }
            if let Some(left) = node.left {
                self.stack.push((left, false));
            }
        }
    }
}

impl<T> FusedIterator for PreOrder<'_, T> {}
impl<T> FusedIterator for InOrder<'_, T> {}
impl<T> FusedIterator for PostOrder<'_, T> {}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = PreOrder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.pre_order()
    }
}

#[cfg(test)]
mod test {
    use crate::Tree;
    use pretty_assertions::assert_eq;

    fn sample() -> Tree<i32> {
        //        4
        //      /   \
        //     2     6
        //    / \   / \
        //   1   3 5   7
        [4, 2, 1, 3, 6, 5, 7].into_iter().collect()
    }

    #[test]
    fn pre_order_visits_node_then_children() {
        let tree = sample();
        let values: Vec<i32> = tree.pre_order().copied().collect();
        assert_eq!(vec![4, 2, 1, 3, 6, 5, 7], values);
    }

    #[test]
    fn in_order_is_ascending() {
        let tree = sample();
        let values: Vec<i32> = tree.in_order().copied().collect();
        assert_eq!(vec![1, 2, 3, 4, 5, 6, 7], values);
    }

    #[test]
    fn post_order_visits_children_then_node() {
        let tree = sample();
        let values: Vec<i32> = tree.post_order().copied().collect();
        assert_eq!(vec![1, 3, 2, 5, 7, 6, 4], values);
    }

    #[test]
    fn singleton_yields_its_value_in_every_order() {
        let mut tree = Tree::new();
        tree.insert(42);
        assert_eq!(vec![&42], tree.pre_order().collect::<Vec<_>>());
        assert_eq!(vec![&42], tree.in_order().collect::<Vec<_>>());
        assert_eq!(vec![&42], tree.post_order().collect::<Vec<_>>());
    }

    #[test]
    fn empty_tree_yields_empty_sequences() {
        let tree: Tree<i32> = Tree::new();
        assert!(tree.pre_order().next().is_none());
        assert!(tree.in_order().next().is_none());
        assert!(tree.post_order().next().is_none());
    }

    #[test]
    fn iterators_are_fused() {
        let mut tree = Tree::new();
        tree.insert(1);
        let mut iter = tree.in_order();
        assert_eq!(Some(&1), iter.next());
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next());
    }

    #[test]
    fn each_factory_call_restarts_the_sequence() {
        let tree = sample();
        let first: Vec<i32> = tree.in_order().copied().collect();
        let second: Vec<i32> = tree.in_order().copied().collect();
        assert_eq!(first, second);

        // Independent iterators advance independently.
        let mut a = tree.pre_order();
        let mut b = tree.pre_order();
        assert_eq!(Some(&4), a.next());
        assert_eq!(Some(&2), a.next());
        assert_eq!(Some(&4), b.next());
    }

    #[test]
    fn default_enumeration_is_pre_order() {
        let tree = sample();
        let via_default: Vec<i32> = (&tree).into_iter().copied().collect();
        let via_pre_order: Vec<i32> = tree.pre_order().copied().collect();
        assert_eq!(via_pre_order, via_default);
        assert_eq!(via_default, tree.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn left_degenerate_tree_traverses_fully() {
        let tree: Tree<i32> = (0..200).rev().collect();
        let values: Vec<i32> = tree.in_order().copied().collect();
        assert_eq!((0..200).collect::<Vec<_>>(), values);
        assert_eq!(200, tree.post_order().count());
        assert_eq!((0..200).rev().collect::<Vec<_>>(), tree.pre_order().copied().collect::<Vec<_>>());
    }
}
