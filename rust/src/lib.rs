//! B-tree index engine in Rust with a JSON command interface.
//!
//! This crate provides an in-memory B-tree of configurable minimum degree
//! supporting insertion, deletion, point lookup with search paths, and
//! in-order traversal, plus a deterministic JSON rendering of the tree
//! structure and a command dispatcher that drives it.
//!
//! # Examples
//!
//! ```
//! use btree_index::{BTree, BTreeError};
//!
//! let mut tree = BTree::new(2).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key).unwrap();
//! }
//! assert_eq!(tree.traverse(), vec![5, 6, 7, 10, 12, 17, 20, 30]);
//! assert_eq!(tree.insert(6), Err(BTreeError::DuplicateKey));
//!
//! tree.remove(&6).unwrap();
//! assert!(!tree.contains(&6));
//! assert!(tree.check_invariants());
//! ```
//!
//! Driving the engine through commands:
//!
//! ```
//! use btree_index::{Command, Dispatcher};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.execute(Command::Init { degree: 3 }).unwrap();
//! dispatcher.execute(Command::Insert { key: 42 }).unwrap();
//!
//! let response = dispatcher.respond(Command::Search { key: 42 });
//! assert!(response.success);
//! assert_eq!(response.message, "Found: 42");
//! ```

mod config;
mod construction;
mod delete_operations;
mod dispatcher;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod shared;
mod snapshot;
mod tree_structure;
mod types;
mod validation;

pub use config::{ConfigError, EngineConfig};
pub use dispatcher::{Command, Dispatcher, DispatcherState, Outcome};
pub use error::{BTreeError, BTreeResult, ErrorCode, InitResult, KeyResult, ModifyResult};
pub use iteration::KeyIterator;
pub use shared::SharedDispatcher;
pub use snapshot::{NodeSnapshot, Response, ResponseData, TreeSnapshot};
pub use types::{BTree, Key, Node, PathStep, SearchResult, DEFAULT_DEGREE, MIN_DEGREE};
