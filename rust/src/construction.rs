//! Construction and initialization logic for BTree and nodes.
//!
//! This module contains the construction and setup logic for the tree and its
//! nodes, including degree validation and default implementations.

use crate::error::{BTreeError, InitResult};
use crate::types::{BTree, Node, DEFAULT_DEGREE, MAX_PREALLOCATED_KEYS, MIN_DEGREE};

impl<K> BTree<K> {
    /// Create an empty B-tree with the specified minimum degree.
    ///
    /// # Arguments
    ///
    /// * `degree` - Minimum degree (t) of the tree (minimum 2)
    ///
    /// # Returns
    ///
    /// Returns `Ok(BTree)` if the degree is valid, `Err(BTreeError::InvalidDegree)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::BTree;
    ///
    /// let tree = BTree::<i64>::new(3).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BTree::<i64>::new(1).is_err());
    /// ```
    pub fn new(degree: usize) -> InitResult<Self> {
        if degree < MIN_DEGREE {
            return Err(BTreeError::invalid_degree(
                i64::try_from(degree).unwrap_or(i64::MAX),
                MIN_DEGREE,
            ));
        }

        Ok(Self {
            degree,
            root: Node::new(degree),
            len: 0,
        })
    }

    /// Create a B-tree with the default degree.
    ///
    /// This is equivalent to calling `new(DEFAULT_DEGREE)`.
    pub fn with_default_degree() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            root: Node::new(DEFAULT_DEGREE),
            len: 0,
        }
    }

    /// Returns the minimum degree (t) of this tree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Returns a reference to the root node.
    pub fn root(&self) -> &Node<K> {
        &self.root
    }
}

impl<K> Default for BTree<K> {
    fn default() -> Self {
        Self::with_default_degree()
    }
}

impl<K> Node<K> {
    /// Creates a new empty leaf for the given degree.
    ///
    /// Keys are pre-allocated up to the node's maximum of `2t - 1`, capped at
    /// `MAX_PREALLOCATED_KEYS` so very large degrees allocate lazily.
    pub fn new(degree: usize) -> Self {
        let capacity = degree
            .saturating_mul(2)
            .saturating_sub(1)
            .min(MAX_PREALLOCATED_KEYS);
        Self {
            degree,
            keys: Vec::with_capacity(capacity),
            children: Vec::new(),
        }
    }

    /// Creates a node from already-ordered keys and children.
    pub(crate) fn from_parts(degree: usize, keys: Vec<K>, children: Vec<Node<K>>) -> Self {
        Self {
            degree,
            keys,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_is_empty_leaf() {
        let tree = BTree::<i64>::new(2).unwrap();
        assert_eq!(tree.degree(), 2);
        assert!(tree.root().keys().is_empty());
        assert!(tree.root().is_leaf());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_degree_below_minimum_is_rejected() {
        assert_eq!(
            BTree::<i64>::new(1).unwrap_err(),
            BTreeError::invalid_degree(1, MIN_DEGREE)
        );
        assert!(BTree::<i64>::new(0).is_err());
    }

    #[test]
    fn test_default_uses_default_degree() {
        let tree = BTree::<i64>::default();
        assert_eq!(tree.degree(), DEFAULT_DEGREE);
    }

    #[test]
    fn test_node_reserves_max_keys() {
        let node = Node::<i64>::new(4);
        assert!(node.keys.capacity() >= 7);
    }

    #[test]
    fn test_huge_degree_does_not_preallocate() {
        for degree in [i64::MAX as usize, usize::MAX] {
            let node = Node::<i64>::new(degree);
            assert!(node.keys.capacity() <= MAX_PREALLOCATED_KEYS);
            assert_eq!(node.max_keys(), degree.saturating_mul(2) - 1);
        }

        let mut tree = BTree::new(usize::MAX).unwrap();
        for key in 0..100i64 {
            tree.insert(key).unwrap();
        }
        assert_eq!(tree.height(), 1);
        assert!(tree.check_invariants());
    }
}
