//! JSON rendering of tree structure and operation results.
//!
//! Two shapes are produced:
//!
//! - [`TreeSnapshot`]: the full structure, one [`NodeSnapshot`] per node, the
//!   format the calling layer stores between calls and compares in tests.
//! - [`Response`]: the `{ success, message, data, error }` envelope printed
//!   for every command.
//!
//! Both serialize deterministically: field order is fixed by the struct
//! definitions and keys are emitted in tree order, so the same tree state
//! always yields the same bytes.
//!
//! # Examples
//!
//! ```
//! use btree_index::BTree;
//!
//! let mut tree = BTree::new(2).unwrap();
//! tree.insert(1).unwrap();
//!
//! let json = tree.snapshot().to_json().unwrap();
//! assert_eq!(json, r#"{"degree":2,"tree":{"keys":[1],"leaf":true}}"#);
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{BTreeError, BTreeResult, ErrorCode, InitResult};
use crate::types::{BTree, Key, Node, PathStep, MIN_DEGREE};

// ============================================================================
// STRUCTURE SNAPSHOTS
// ============================================================================

/// Serialized form of one node. `children` is omitted for leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot<K> {
    pub keys: Vec<K>,
    pub leaf: bool,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot<K>>,
}

/// Serialized form of a whole tree.
///
/// An empty tree is rendered with the explicit empty marker
/// `{"keys":[],"leaf":true}` as its root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot<K> {
    pub degree: usize,
    pub tree: NodeSnapshot<K>,
}

impl<K> NodeSnapshot<K> {
    /// The snapshot of a tree with no keys.
    pub fn empty() -> Self {
        Self {
            keys: Vec::new(),
            leaf: true,
            children: Vec::new(),
        }
    }

    /// Returns true if this is the empty-tree marker.
    pub fn is_empty_marker(&self) -> bool {
        self.leaf && self.keys.is_empty() && self.children.is_empty()
    }
}

impl<K: Clone> NodeSnapshot<K> {
    fn from_node(node: &Node<K>) -> Self {
        Self {
            keys: node.keys.clone(),
            leaf: node.is_leaf(),
            children: node.children.iter().map(Self::from_node).collect(),
        }
    }
}

impl<K: Serialize> TreeSnapshot<K> {
    /// Compact JSON rendering.
    pub fn to_json(&self) -> BTreeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON rendering.
    pub fn to_json_pretty(&self) -> BTreeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<K: DeserializeOwned> TreeSnapshot<K> {
    /// Parse a snapshot previously produced by `to_json`/`to_json_pretty`.
    pub fn from_json(json: &str) -> BTreeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<K: Clone> BTree<K> {
    /// Capture the current structure.
    pub fn snapshot(&self) -> TreeSnapshot<K> {
        TreeSnapshot {
            degree: self.degree,
            tree: NodeSnapshot::from_node(&self.root),
        }
    }
}

impl<K: Ord + Clone> BTree<K> {
    /// Rebuild a tree from a snapshot.
    ///
    /// The rebuilt tree is checked against every structural invariant; a
    /// snapshot that does not describe a valid B-tree is rejected with
    /// `CorruptedSnapshot` instead of producing a broken tree.
    pub fn from_snapshot(snapshot: &TreeSnapshot<K>) -> InitResult<Self> {
        let Ok(signed_degree) = i64::try_from(snapshot.degree) else {
            tracing::warn!(degree = snapshot.degree, "rejected snapshot");
            return Err(BTreeError::corrupted_snapshot(
                "Degree",
                &format!("{} is out of range", snapshot.degree),
            ));
        };
        if snapshot.degree < MIN_DEGREE {
            return Err(BTreeError::invalid_degree(signed_degree, MIN_DEGREE));
        }

        let mut len = 0;
        let root = Self::node_from_snapshot(snapshot.degree, &snapshot.tree, &mut len)?;
        let tree = Self {
            degree: snapshot.degree,
            root,
            len,
        };

        if let Err(details) = tree.check_invariants_detailed() {
            tracing::warn!(%details, "rejected snapshot");
            return Err(BTreeError::corrupted_snapshot("Tree invariants", &details));
        }
        Ok(tree)
    }

    fn node_from_snapshot(
        degree: usize,
        snapshot: &NodeSnapshot<K>,
        len: &mut usize,
    ) -> InitResult<Node<K>> {
        if snapshot.leaf != snapshot.children.is_empty() {
            return Err(BTreeError::corrupted_snapshot(
                "Node",
                "leaf flag disagrees with children",
            ));
        }

        *len += snapshot.keys.len();
        let children = snapshot
            .children
            .iter()
            .map(|child| Self::node_from_snapshot(degree, child, len))
            .collect::<InitResult<Vec<_>>>()?;
        Ok(Node::from_parts(degree, snapshot.keys.clone(), children))
    }
}

impl<K: Ord + Clone> TryFrom<&TreeSnapshot<K>> for BTree<K> {
    type Error = BTreeError;

    fn try_from(snapshot: &TreeSnapshot<K>) -> Result<Self, Self::Error> {
        Self::from_snapshot(snapshot)
    }
}

// ============================================================================
// RESPONSE ENVELOPE
// ============================================================================

/// Payload of a successful response, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseData {
    /// Tree structure after `init`, `insert` or `delete`.
    Structure { snapshot: TreeSnapshot<Key> },
    /// Result of `search`.
    Search {
        key: Key,
        found: bool,
        path: Vec<PathStep<Key>>,
    },
    /// Result of `traverse`.
    Traverse { keys: Vec<Key> },
    /// Level-by-level view printed by `show`.
    Levels {
        height: usize,
        levels: Vec<Vec<Vec<Key>>>,
        snapshot: TreeSnapshot<Key>,
    },
}

/// The envelope printed for every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
}

impl Response {
    /// A successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: ResponseData) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// A failure response describing `err`.
    pub fn failure(err: &BTreeError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            data: None,
            error: Some(err.code()),
        }
    }

    /// Compact single-line JSON rendering.
    pub fn to_json(&self) -> BTreeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON rendering.
    pub fn to_json_pretty(&self) -> BTreeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&BTreeError> for Response {
    fn from(err: &BTreeError) -> Self {
        Self::failure(err)
    }
}
