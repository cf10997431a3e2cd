//! Node implementation for BTree.
//!
//! This module contains the node-level primitives: search within a node,
//! splitting, borrowing through the parent, merging, and the recursive
//! insert/remove descents built on them. None of these preserve the tree-wide
//! balance invariant on their own; `BTree` only calls them under the
//! preconditions documented on each method.

use crate::types::Node;

// ============================================================================
// ACCESSORS AND STATUS CHECKS
// ============================================================================

impl<K> Node<K> {
    /// Keys stored in this node, in ascending order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Children of this node; empty for a leaf.
    pub fn children(&self) -> &[Node<K>] {
        &self.children
    }

    /// Returns the number of keys in this node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this node holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Maximum number of keys a node may hold (`2t - 1`).
    pub fn max_keys(&self) -> usize {
        self.degree.saturating_mul(2).saturating_sub(1)
    }

    /// Minimum number of keys a non-root node must hold (`t - 1`).
    pub fn min_keys(&self) -> usize {
        self.degree - 1
    }

    /// Returns true if this node is at capacity.
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.max_keys()
    }

    /// Returns true if a key can be taken from this node without underflow.
    pub fn can_lend(&self) -> bool {
        self.keys.len() >= self.degree
    }
}

impl<K: Ord + Clone> Node<K> {
    // ============================================================================
    // SEARCH WITHIN NODE
    // ============================================================================

    /// Binary search for `key` in this node.
    ///
    /// `Ok(i)` is the index of the matching key; `Err(i)` is the index of the
    /// first key greater than `key`, which is also the child slot to descend.
    pub fn find_key(&self, key: &K) -> Result<usize, usize> {
        self.keys.binary_search(key)
    }

    /// Largest key in the subtree rooted here.
    ///
    /// Must not be called on an empty subtree.
    pub(crate) fn subtree_max(&self) -> &K {
        let mut node = self;
        while let Some(last) = node.children.last() {
            node = last;
        }
        &node.keys[node.keys.len() - 1]
    }

    /// Smallest key in the subtree rooted here.
    ///
    /// Must not be called on an empty subtree.
    pub(crate) fn subtree_min(&self) -> &K {
        let mut node = self;
        while let Some(first) = node.children.first() {
            node = first;
        }
        &node.keys[0]
    }

    // ============================================================================
    // INSERT PRIMITIVES
    // ============================================================================

    /// Split the full child at `index`, promoting its median into this node.
    ///
    /// The child keeps the lower `t - 1` keys, a new right sibling receives the
    /// upper `t - 1` keys, and for internal children the upper `t` children.
    /// This node must not be full.
    pub(crate) fn split_child(&mut self, index: usize) {
        let t = self.degree;
        let child = &mut self.children[index];

        let right_keys = child.keys.split_off(t);
        let right_children = if child.is_leaf() {
            Vec::new()
        } else {
            child.children.split_off(t)
        };
        let Some(median) = child.keys.pop() else {
            return;
        };

        let right = Node::from_parts(t, right_keys, right_children);
        tracing::trace!(index, "split full child");

        self.keys.insert(index, median);
        self.children.insert(index + 1, right);
    }

    /// Insert `key` into the subtree rooted at this non-full node.
    ///
    /// Full children are split before the descent enters them, so the leaf
    /// that finally receives the key always has room. The key must not
    /// already be present.
    pub(crate) fn insert_non_full(&mut self, key: K) {
        let mut index = match self.find_key(&key) {
            Ok(index) | Err(index) => index,
        };

        if self.is_leaf() {
            self.keys.insert(index, key);
            return;
        }

        if self.children[index].is_full() {
            self.split_child(index);
            if self.keys[index] < key {
                index += 1;
            }
        }
        self.children[index].insert_non_full(key);
    }

    // ============================================================================
    // DELETE PRIMITIVES
    // ============================================================================

    /// Remove `key` from the subtree rooted here.
    ///
    /// The key must be present and this node must hold at least `t` keys
    /// unless it is the root.
    pub(crate) fn remove(&mut self, key: &K) {
        match self.find_key(key) {
            Ok(index) if self.is_leaf() => {
                self.keys.remove(index);
            }
            Ok(index) => self.remove_from_internal(index),
            Err(_) if self.is_leaf() => {}
            Err(index) => {
                let index = self.fill_child(index);
                self.children[index].remove(key);
            }
        }
    }

    /// Remove the key at `index` of this internal node.
    fn remove_from_internal(&mut self, index: usize) {
        if self.children[index].can_lend() {
            let predecessor = self.children[index].subtree_max().clone();
            self.children[index].remove(&predecessor);
            self.keys[index] = predecessor;
        } else if self.children[index + 1].can_lend() {
            let successor = self.children[index + 1].subtree_min().clone();
            self.children[index + 1].remove(&successor);
            self.keys[index] = successor;
        } else {
            let key = self.keys[index].clone();
            self.merge_children(index);
            self.children[index].remove(&key);
        }
    }

    /// Make sure the child at `index` holds at least `t` keys.
    ///
    /// Borrows from the left sibling, then the right sibling; if neither can
    /// spare a key the child is merged with one of them. Returns the index of
    /// the child that now covers the original child's key range.
    pub(crate) fn fill_child(&mut self, index: usize) -> usize {
        if self.children[index].can_lend() {
            return index;
        }

        if index > 0 && self.children[index - 1].can_lend() {
            self.borrow_from_prev(index);
            index
        } else if index < self.keys.len() && self.children[index + 1].can_lend() {
            self.borrow_from_next(index);
            index
        } else if index < self.keys.len() {
            self.merge_children(index);
            index
        } else {
            self.merge_children(index - 1);
            index - 1
        }
    }

    /// Rotate the left sibling's last key through the parent into child `index`.
    pub(crate) fn borrow_from_prev(&mut self, index: usize) {
        let (left, right) = self.children.split_at_mut(index);
        let sibling = &mut left[index - 1];
        let child = &mut right[0];

        let Some(lent) = sibling.keys.pop() else {
            return;
        };
        let separator = std::mem::replace(&mut self.keys[index - 1], lent);
        child.keys.insert(0, separator);
        if let Some(grandchild) = sibling.children.pop() {
            child.children.insert(0, grandchild);
        }
        tracing::trace!(index, "borrowed from left sibling");
    }

    /// Rotate the right sibling's first key through the parent into child `index`.
    pub(crate) fn borrow_from_next(&mut self, index: usize) {
        let (left, right) = self.children.split_at_mut(index + 1);
        let child = &mut left[index];
        let sibling = &mut right[0];

        if sibling.keys.is_empty() {
            return;
        }
        let lent = sibling.keys.remove(0);
        let separator = std::mem::replace(&mut self.keys[index], lent);
        child.keys.push(separator);
        if !sibling.is_leaf() {
            child.children.push(sibling.children.remove(0));
        }
        tracing::trace!(index, "borrowed from right sibling");
    }

    /// Merge child `index + 1` and separator `index` into child `index`.
    ///
    /// Both children must hold `t - 1` keys; the result holds `2t - 2`.
    pub(crate) fn merge_children(&mut self, index: usize) {
        let separator = self.keys.remove(index);
        let mut right = self.children.remove(index + 1);
        let left = &mut self.children[index];

        left.keys.push(separator);
        left.keys.append(&mut right.keys);
        left.children.append(&mut right.children);
        tracing::trace!(index, merged_len = left.keys.len(), "merged children");
    }
}
