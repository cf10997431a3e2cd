//! Traversal and iterator implementations for BTree.
//!
//! All traversals are read-only: the materialized in-order `traverse`, the
//! borrowing `KeyIterator`, and the level-order structural view.

use crate::types::{BTree, Node};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// In-order iterator over the keys of a tree.
///
/// Keeps an explicit stack of `(node, next key index)` frames instead of
/// recursing, so iteration depth does not depend on the call stack.
pub struct KeyIterator<'a, K> {
    stack: Vec<(&'a Node<K>, usize)>,
    remaining: usize,
}

// ============================================================================
// BTREE TRAVERSAL METHODS
// ============================================================================

impl<K: Clone> BTree<K> {
    /// Returns all keys in ascending order.
    ///
    /// The result is fully materialized and sized to the key count; an empty
    /// tree yields an empty vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// for key in [3, 1, 2] {
    ///     tree.insert(key).unwrap();
    /// }
    /// assert_eq!(tree.traverse(), vec![1, 2, 3]);
    /// ```
    pub fn traverse(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len);
        Self::collect_in_order(&self.root, &mut keys);
        keys
    }

    fn collect_in_order(node: &Node<K>, out: &mut Vec<K>) {
        if node.is_leaf() {
            out.extend(node.keys.iter().cloned());
            return;
        }
        for (index, key) in node.keys.iter().enumerate() {
            Self::collect_in_order(&node.children[index], out);
            out.push(key.clone());
        }
        if let Some(last) = node.children.last() {
            Self::collect_in_order(last, out);
        }
    }

    /// Level-order view of the tree structure.
    ///
    /// Element `d` holds, left to right, the keys of every node at depth `d`.
    /// An empty tree yields no levels.
    pub fn levels(&self) -> Vec<Vec<Vec<K>>> {
        let mut levels = Vec::new();
        if self.len == 0 {
            return levels;
        }

        let mut frontier = vec![&self.root];
        while !frontier.is_empty() {
            levels.push(frontier.iter().map(|node| node.keys.clone()).collect());
            frontier = frontier
                .iter()
                .flat_map(|&node| node.children.iter())
                .collect();
        }
        levels
    }
}

impl<K> BTree<K> {
    /// Returns a borrowing iterator over all keys in ascending order.
    pub fn keys(&self) -> KeyIterator<'_, K> {
        KeyIterator::new(self)
    }
}

// ============================================================================
// KEYITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K> KeyIterator<'a, K> {
    pub fn new(tree: &'a BTree<K>) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: tree.len,
        };
        iter.push_left_spine(&tree.root);
        iter
    }

    /// Push `node` and its leftmost descendants.
    fn push_left_spine(&mut self, mut node: &'a Node<K>) {
        loop {
            self.stack.push((node, 0));
            match node.children.first() {
                Some(child) => node = child,
                None => break,
            }
        }
    }
}

impl<'a, K> Iterator for KeyIterator<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            let (node, index) = *top;

            if index < node.keys.len() {
                top.1 += 1;
                if let Some(child) = node.children.get(index + 1) {
                    self.push_left_spine(child);
                }
                self.remaining -= 1;
                return Some(&node.keys[index]);
            }
            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for KeyIterator<'_, K> {}

impl<'a, K> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = KeyIterator<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}
