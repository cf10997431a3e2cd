//! Validation and debugging utilities for BTree.
//!
//! This module contains the structural checker used by tests and by snapshot
//! restoration: key ordering, separator bounds, occupancy, child arity, leaf
//! depth, and the key counter.

use crate::error::{BTreeError, BTreeResult};
use crate::types::{BTree, Node, MIN_DEGREE};

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord + Clone> BTree<K> {
    /// Check if the tree maintains all B-tree invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        if self.degree < MIN_DEGREE {
            return Err(format!("degree {} is below {}", self.degree, MIN_DEGREE));
        }

        if self.root.keys.is_empty() && !self.root.children.is_empty() {
            return Err("root has children but no keys".to_string());
        }

        let mut leaf_depth = None;
        let counted = self.check_node(&self.root, None, None, 0, true, &mut leaf_depth)?;

        if counted != self.len {
            return Err(format!(
                "key counter says {} but tree holds {} keys",
                self.len, counted
            ));
        }
        Ok(())
    }

    /// Recursively check one node; returns the number of keys in its subtree.
    fn check_node(
        &self,
        node: &Node<K>,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        is_root: bool,
        leaf_depth: &mut Option<usize>,
    ) -> Result<usize, String> {
        let max_keys = self.degree.saturating_mul(2).saturating_sub(1);
        let min_keys = if is_root { 0 } else { self.degree - 1 };

        if node.degree != self.degree {
            return Err(format!(
                "node at depth {} has degree {}, tree has {}",
                depth, node.degree, self.degree
            ));
        }
        if node.keys.len() > max_keys {
            return Err(format!(
                "node at depth {} holds {} keys (max {})",
                depth,
                node.keys.len(),
                max_keys
            ));
        }
        if node.keys.len() < min_keys {
            return Err(format!(
                "node at depth {} holds {} keys (min {})",
                depth,
                node.keys.len(),
                min_keys
            ));
        }
        if node.keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(format!("keys not strictly increasing at depth {}", depth));
        }
        if let (Some(lower), Some(first)) = (lower, node.keys.first()) {
            if first <= lower {
                return Err(format!("key below separator bound at depth {}", depth));
            }
        }
        if let (Some(upper), Some(last)) = (upper, node.keys.last()) {
            if last >= upper {
                return Err(format!("key above separator bound at depth {}", depth));
            }
        }

        if node.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(format!(
                        "leaf at depth {} but other leaves at depth {}",
                        depth, expected
                    ));
                }
                Some(_) => {}
            }
            return Ok(node.keys.len());
        }

        if node.children.len() != node.keys.len() + 1 {
            return Err(format!(
                "internal node at depth {} has {} keys and {} children",
                depth,
                node.keys.len(),
                node.children.len()
            ));
        }

        let mut total = node.keys.len();
        for (index, child) in node.children.iter().enumerate() {
            let child_lower = if index == 0 {
                lower
            } else {
                Some(&node.keys[index - 1])
            };
            let child_upper = node.keys.get(index).or(upper);
            total += self.check_node(child, child_lower, child_upper, depth + 1, false, leaf_depth)?;
        }
        Ok(total)
    }

    // ============================================================================
    // DEBUGGING AND TESTING UTILITIES
    // ============================================================================

    /// Alias for check_invariants_detailed returning the crate error type.
    pub fn validate(&self) -> BTreeResult<()> {
        self.check_invariants_detailed()
            .map_err(|e| BTreeError::corrupted_snapshot("Tree invariants", &e))
    }

    /// Returns the key count of every leaf, left to right.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        Self::collect_leaf_sizes(&self.root, &mut sizes);
        sizes
    }

    fn collect_leaf_sizes(node: &Node<K>, sizes: &mut Vec<usize>) {
        if node.is_leaf() {
            sizes.push(node.keys.len());
        } else {
            for child in &node.children {
                Self::collect_leaf_sizes(child, sizes);
            }
        }
    }
}
