//! DELETE operations for BTree.
//!
//! This module contains the removal path: absent-key rejection, the single
//! top-down pass that tops children up to `t` keys before entering them, and
//! root collapse.

use crate::error::ModifyResult;
use crate::types::BTree;

impl<K: Ord + Clone> BTree<K> {
    /// Remove a key from the tree.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to remove
    ///
    /// # Returns
    ///
    /// `Ok(())` if the key was removed, `Err(BTreeError::KeyNotFound)` if it
    /// was absent. A rejected delete does not touch the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::{BTree, BTreeError};
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.insert(1).unwrap();
    /// tree.remove(&1).unwrap();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.remove(&1), Err(BTreeError::KeyNotFound));
    /// ```
    pub fn remove(&mut self, key: &K) -> ModifyResult<()> {
        self.require(key)?;

        self.root.remove(key);
        self.len -= 1;
        self.shrink_root();
        Ok(())
    }

    /// Remove and return the smallest key.
    pub fn pop_first(&mut self) -> Option<K> {
        let key = self.first_key()?.clone();
        self.remove(&key).ok()?;
        Some(key)
    }

    /// Remove and return the largest key.
    pub fn pop_last(&mut self) -> Option<K> {
        let key = self.last_key()?.clone();
        self.remove(&key).ok()?;
        Some(key)
    }

    /// Replace a keyless internal root by its only child.
    fn shrink_root(&mut self) {
        if self.root.keys.is_empty() && self.root.children.len() == 1 {
            if let Some(child) = self.root.children.pop() {
                self.root = child;
                tracing::trace!(degree = self.degree, "root collapsed, height decreased");
            }
        }
    }
}
