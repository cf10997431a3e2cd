//! INSERT operations for BTree.
//!
//! This module contains the insertion path: duplicate rejection, root growth,
//! and the single top-down pass that splits full nodes before entering them.

use crate::error::{BTreeError, ModifyResult};
use crate::types::{BTree, Node};

impl<K: Ord + Clone> BTree<K> {
    /// Insert a key into the tree.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    ///
    /// # Returns
    ///
    /// `Ok(())` if the key was inserted, `Err(BTreeError::DuplicateKey)` if it
    /// was already present. A rejected insert does not touch the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::{BTree, BTreeError};
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.insert(5).unwrap();
    /// assert_eq!(tree.insert(5), Err(BTreeError::DuplicateKey));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> ModifyResult<()> {
        if self.contains(&key) {
            return Err(BTreeError::DuplicateKey);
        }

        if self.root.is_full() {
            self.grow_root();
        }
        self.root.insert_non_full(key);
        self.len += 1;
        Ok(())
    }

    /// Insert every key from an iterator, stopping at the first duplicate.
    ///
    /// Keys inserted before the duplicate stay in the tree.
    pub fn insert_all<I>(&mut self, keys: I) -> ModifyResult<usize>
    where
        I: IntoIterator<Item = K>,
    {
        let mut inserted = 0;
        for key in keys {
            self.insert(key)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    /// Split a full root under a new one-key root, growing the height by one.
    fn grow_root(&mut self) {
        let old_root = std::mem::replace(&mut self.root, Node::new(self.degree));
        self.root.children.push(old_root);
        self.root.split_child(0);
        tracing::trace!(degree = self.degree, "root split, height increased");
    }
}

#[cfg(test)]
mod tests {
    use crate::error::BTreeError;
    use crate::types::BTree;

    #[test]
    fn test_insert_into_empty_tree() {
        let mut tree = BTree::new(2).unwrap();
        tree.insert(42).unwrap();
        assert_eq!(tree.root().keys(), &[42]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_full_root_splits_into_one_key_root() {
        let mut tree = BTree::new(2).unwrap();
        tree.insert_all([1, 2, 3]).unwrap();
        assert_eq!(tree.height(), 1);

        tree.insert(4).unwrap();
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.root().keys(), &[2]);
        assert_eq!(tree.root().children()[0].keys(), &[1]);
        assert_eq!(tree.root().children()[1].keys(), &[3, 4]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_duplicate_is_rejected_without_restructuring() {
        let mut tree = BTree::new(2).unwrap();
        tree.insert_all([1, 2, 3]).unwrap();
        let before = tree.snapshot();

        assert_eq!(tree.insert(2), Err(BTreeError::DuplicateKey));
        assert_eq!(tree.snapshot(), before);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_insert_all_stops_at_duplicate() {
        let mut tree = BTree::new(3).unwrap();
        assert_eq!(tree.insert_all([1, 2, 2, 3]), Err(BTreeError::DuplicateKey));
        assert_eq!(tree.traverse(), vec![1, 2]);
    }

    #[test]
    fn test_descending_inserts_keep_invariants() {
        let mut tree = BTree::new(2).unwrap();
        for key in (0..200).rev() {
            tree.insert(key).unwrap();
            assert!(tree.check_invariants(), "invariants broken after {key}");
        }
        assert_eq!(tree.traverse(), (0..200).collect::<Vec<_>>());
    }
}
