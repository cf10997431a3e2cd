//! Core types and data structures for the B-tree index.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the implementation.

use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minimum degree (t) for any tree.
pub const MIN_DEGREE: usize = 2;

/// Degree used when none is configured.
pub const DEFAULT_DEGREE: usize = 3;

/// Upper bound on the keys reserved up front for a new node.
pub(crate) const MAX_PREALLOCATED_KEYS: usize = 255;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Key type used by the command dispatcher.
pub type Key = i64;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// In-memory B-tree of distinct keys with a configurable minimum degree.
///
/// Every node except the root holds between `t - 1` and `2t - 1` keys, all
/// leaves sit at the same depth, and insertion splits full nodes on the way
/// down so it never has to walk back up the tree.
///
/// # Type Parameters
///
/// * `K` - Key type that must implement `Ord + Clone`
///
/// # Examples
///
/// ```
/// use btree_index::BTree;
///
/// let mut tree = BTree::new(2).unwrap();
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key).unwrap();
/// }
///
/// assert_eq!(tree.traverse(), vec![5, 6, 7, 10, 12, 17, 20, 30]);
/// assert!(tree.search(&12).found);
/// assert!(tree.insert(12).is_err());
/// ```
///
/// # Performance Characteristics
///
/// - **Insertion**: O(t log_t n)
/// - **Lookup**: O(log t · log_t n)
/// - **Deletion**: O(t log_t n)
/// - **Traversal**: O(n)
#[derive(Debug, Clone)]
pub struct BTree<K> {
    /// Minimum degree (t) of every node.
    pub(crate) degree: usize,
    /// The root node; an empty leaf when the tree holds no keys.
    pub(crate) root: Node<K>,
    /// Number of keys stored in the tree.
    pub(crate) len: usize,
}

/// A tree node. Leaf iff it has no children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K> {
    /// Minimum degree this node was created for.
    pub(crate) degree: usize,
    /// Strictly increasing keys.
    pub(crate) keys: Vec<K>,
    /// Child nodes, either empty or `keys.len() + 1` long.
    pub(crate) children: Vec<Node<K>>,
}

// ============================================================================
// SEARCH RESULTS
// ============================================================================

/// One visited node on a search path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep<K> {
    /// Depth of the visited node (root is 0).
    pub depth: usize,
    /// Keys held by the visited node.
    pub keys: Vec<K>,
    /// Index of the matching key, or of the child slot taken next.
    pub index: usize,
}

/// Result of a point lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult<K> {
    pub found: bool,
    pub path: Vec<PathStep<K>>,
}
