//! GET operations for BTree.
//!
//! This module contains the read operations for the tree: point lookup with
//! the visited path, and plain membership checks.

use crate::error::{BTreeError, KeyResult};
use crate::types::{BTree, PathStep, SearchResult};

impl<K: Ord + Clone> BTree<K> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Look up a key, recording every node visited on the way down.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    ///
    /// # Returns
    ///
    /// A `SearchResult` whose `found` flag reports membership and whose `path`
    /// lists the visited nodes from the root down.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// for key in 1..=10 {
    ///     tree.insert(key).unwrap();
    /// }
    ///
    /// let result = tree.search(&7);
    /// assert!(result.found);
    /// assert_eq!(result.path[0].depth, 0);
    /// assert!(!tree.search(&11).found);
    /// ```
    pub fn search(&self, key: &K) -> SearchResult<K> {
        let mut path = Vec::new();
        let mut node = &self.root;
        let mut depth = 0;

        loop {
            match node.find_key(key) {
                Ok(index) => {
                    path.push(PathStep {
                        depth,
                        keys: node.keys.clone(),
                        index,
                    });
                    return SearchResult { found: true, path };
                }
                Err(index) => {
                    path.push(PathStep {
                        depth,
                        keys: node.keys.clone(),
                        index,
                    });
                    if node.is_leaf() {
                        return SearchResult { found: false, path };
                    }
                    node = &node.children[index];
                    depth += 1;
                }
            }
        }
    }

    /// Check if key exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::BTree;
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// tree.insert(1).unwrap();
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&2));
    /// ```
    pub fn contains(&self, key: &K) -> bool {
        let mut node = &self.root;
        loop {
            match node.find_key(key) {
                Ok(_) => return true,
                Err(_) if node.is_leaf() => return false,
                Err(index) => node = &node.children[index],
            }
        }
    }

    /// Check that a key exists, returning `KeyNotFound` otherwise.
    pub fn require(&self, key: &K) -> KeyResult<()> {
        if self.contains(key) {
            Ok(())
        } else {
            Err(BTreeError::KeyNotFound)
        }
    }
}
