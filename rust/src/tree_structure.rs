//! Tree structure management operations for BTree.
//!
//! This module contains tree-level operations that describe or reset the
//! overall structure: size queries, height, node counts, extremes, clearing.

use crate::types::{BTree, Node};

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<K> BTree<K> {
    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of levels; 0 for an empty tree.
    ///
    /// All leaves share a depth, so following the leftmost spine is enough.
    pub fn height(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let mut height = 1;
        let mut node = &self.root;
        while let Some(child) = node.children.first() {
            node = child;
            height += 1;
        }
        height
    }

    /// Returns the total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        Self::node_count_recursive(&self.root)
    }

    fn node_count_recursive(node: &Node<K>) -> usize {
        1 + node
            .children
            .iter()
            .map(Self::node_count_recursive)
            .sum::<usize>()
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        Self::leaf_count_recursive(&self.root)
    }

    fn leaf_count_recursive(node: &Node<K>) -> usize {
        if node.is_leaf() {
            1
        } else {
            node.children.iter().map(Self::leaf_count_recursive).sum()
        }
    }

    /// Returns the smallest key, if any.
    pub fn first_key(&self) -> Option<&K> {
        let mut node = &self.root;
        while let Some(child) = node.children.first() {
            node = child;
        }
        node.keys.first()
    }

    /// Returns the largest key, if any.
    pub fn last_key(&self) -> Option<&K> {
        let mut node = &self.root;
        while let Some(child) = node.children.last() {
            node = child;
        }
        node.keys.last()
    }

    /// Clear all keys from the tree, keeping its degree.
    pub fn clear(&mut self) {
        self.root = Node::new(self.degree);
        self.len = 0;
    }
}
