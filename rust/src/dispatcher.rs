//! Command dispatcher: the externally-facing entry point of the engine.
//!
//! The dispatcher owns at most one tree and moves between two states:
//!
//! ```text
//!   Uninitialized ──init(t)──▶ Ready(tree) ──init(t')──▶ Ready(fresh tree)
//! ```
//!
//! Only `init` is accepted while uninitialized; every other command fails
//! with [`BTreeError::NotInitialized`] and does not create a tree. Commands
//! arrive either typed ([`Command`]) or as text (`"insert 5"`), and every
//! result is a typed [`Outcome`] that converts into the JSON [`Response`]
//! envelope.

use std::fmt;
use std::str::FromStr;

use crate::error::{BTreeError, BTreeResult};
use crate::snapshot::{Response, ResponseData, TreeSnapshot};
use crate::types::{BTree, Key, SearchResult, MIN_DEGREE};

// ============================================================================
// COMMANDS
// ============================================================================

/// One of the five supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Init { degree: i64 },
    Insert { key: Key },
    Search { key: Key },
    Delete { key: Key },
    Traverse,
}

impl Command {
    /// Parse a command from its words, e.g. `["insert", "5"]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::Command;
    ///
    /// assert_eq!(Command::parse(&["search", "7"]).unwrap(), Command::Search { key: 7 });
    /// assert!(Command::parse(&["insert", "seven"]).is_err());
    /// ```
    pub fn parse<S: AsRef<str>>(words: &[S]) -> BTreeResult<Self> {
        let Some((name, args)) = words.split_first() else {
            return Err(BTreeError::InvalidArgument("empty command".to_string()));
        };
        let name = name.as_ref();

        let command = match name {
            "init" => Command::Init {
                degree: Self::single_integer(name, args, "degree")?,
            },
            "insert" => Command::Insert {
                key: Self::single_integer(name, args, "key")?,
            },
            "search" => Command::Search {
                key: Self::single_integer(name, args, "key")?,
            },
            "delete" => Command::Delete {
                key: Self::single_integer(name, args, "key")?,
            },
            "traverse" => {
                if !args.is_empty() {
                    return Err(BTreeError::invalid_argument(name, "takes no arguments"));
                }
                Command::Traverse
            }
            other => {
                return Err(BTreeError::InvalidArgument(format!(
                    "unknown command '{}'",
                    other
                )))
            }
        };
        Ok(command)
    }

    fn single_integer<S: AsRef<str>>(command: &str, args: &[S], what: &str) -> BTreeResult<i64> {
        match args {
            [value] => value.as_ref().trim().parse::<i64>().map_err(|_| {
                BTreeError::invalid_argument(
                    command,
                    &format!("expected an integer {}, got '{}'", what, value.as_ref()),
                )
            }),
            [] => Err(BTreeError::invalid_argument(
                command,
                &format!("missing {}", what),
            )),
            _ => Err(BTreeError::invalid_argument(
                command,
                &format!("expected exactly one {}", what),
            )),
        }
    }

    /// The command word.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init { .. } => "init",
            Command::Insert { .. } => "insert",
            Command::Search { .. } => "search",
            Command::Delete { .. } => "delete",
            Command::Traverse => "traverse",
        }
    }

    /// Returns true if the command never mutates the tree.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Command::Search { .. } | Command::Traverse)
    }
}

impl FromStr for Command {
    type Err = BTreeError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        Self::parse(&words)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Init { degree } => write!(f, "init {}", degree),
            Command::Insert { key } => write!(f, "insert {}", key),
            Command::Search { key } => write!(f, "search {}", key),
            Command::Delete { key } => write!(f, "delete {}", key),
            Command::Traverse => write!(f, "traverse"),
        }
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// Typed result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Initialized {
        degree: usize,
        snapshot: TreeSnapshot<Key>,
    },
    Inserted {
        key: Key,
        snapshot: TreeSnapshot<Key>,
    },
    Searched {
        key: Key,
        result: SearchResult<Key>,
    },
    Deleted {
        key: Key,
        snapshot: TreeSnapshot<Key>,
    },
    Traversed {
        keys: Vec<Key>,
    },
}

impl Outcome {
    /// Human-readable summary used as the envelope message.
    pub fn message(&self) -> String {
        match self {
            Outcome::Initialized { degree, .. } => {
                format!("B-tree initialized with minimum degree {}", degree)
            }
            Outcome::Inserted { key, .. } => format!("Inserted: {}", key),
            Outcome::Searched { key, result } if result.found => format!("Found: {}", key),
            Outcome::Searched { key, .. } => format!("Not found: {}", key),
            Outcome::Deleted { key, .. } => format!("Deleted: {}", key),
            Outcome::Traversed { keys } => {
                format!("In-order traversal completed ({} keys)", keys.len())
            }
        }
    }

    /// Convert into the JSON envelope.
    pub fn into_response(self) -> Response {
        let message = self.message();
        let data = match self {
            Outcome::Initialized { snapshot, .. }
            | Outcome::Inserted { snapshot, .. }
            | Outcome::Deleted { snapshot, .. } => ResponseData::Structure { snapshot },
            Outcome::Searched { key, result } => ResponseData::Search {
                key,
                found: result.found,
                path: result.path,
            },
            Outcome::Traversed { keys } => ResponseData::Traverse { keys },
        };
        Response::ok(message, data)
    }
}

impl From<Outcome> for Response {
    fn from(outcome: Outcome) -> Self {
        outcome.into_response()
    }
}

// ============================================================================
// DISPATCHER
// ============================================================================

/// Lifecycle state of a dispatcher.
#[derive(Debug, Clone, Default)]
pub enum DispatcherState {
    #[default]
    Uninitialized,
    Ready(BTree<Key>),
}

/// Single-tree command dispatcher.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    state: DispatcherState,
}

impl Dispatcher {
    /// Create an uninitialized dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher that is ready with the tree described by `snapshot`.
    pub fn from_snapshot(snapshot: &TreeSnapshot<Key>) -> BTreeResult<Self> {
        let mut dispatcher = Self::new();
        dispatcher.restore(snapshot)?;
        Ok(dispatcher)
    }

    /// Replace the current state with the tree described by `snapshot`.
    ///
    /// On failure the current state is kept.
    pub fn restore(&mut self, snapshot: &TreeSnapshot<Key>) -> BTreeResult<()> {
        let tree = BTree::from_snapshot(snapshot)?;
        tracing::info!(
            degree = tree.degree(),
            keys = tree.len(),
            "restored tree from snapshot"
        );
        self.state = DispatcherState::Ready(tree);
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &DispatcherState {
        &self.state
    }

    /// Returns true once `init` (or a restore) has succeeded.
    pub fn is_initialized(&self) -> bool {
        matches!(self.state, DispatcherState::Ready(_))
    }

    /// The current tree, or `NotInitialized`.
    pub fn tree(&self) -> BTreeResult<&BTree<Key>> {
        match &self.state {
            DispatcherState::Ready(tree) => Ok(tree),
            DispatcherState::Uninitialized => Err(BTreeError::NotInitialized),
        }
    }

    fn tree_mut(&mut self) -> BTreeResult<&mut BTree<Key>> {
        match &mut self.state {
            DispatcherState::Ready(tree) => Ok(tree),
            DispatcherState::Uninitialized => Err(BTreeError::NotInitialized),
        }
    }

    /// Full-structure snapshot of the current tree.
    pub fn snapshot(&self) -> BTreeResult<TreeSnapshot<Key>> {
        Ok(self.tree()?.snapshot())
    }

    // ============================================================================
    // OPERATIONS
    // ============================================================================

    /// Discard any current tree and start a fresh one of the given degree.
    ///
    /// An invalid degree leaves the current state untouched.
    pub fn init(&mut self, degree: i64) -> BTreeResult<Outcome> {
        let degree = usize::try_from(degree)
            .ok()
            .filter(|&degree| degree >= MIN_DEGREE)
            .ok_or_else(|| BTreeError::invalid_degree(degree, MIN_DEGREE))?;

        let tree = BTree::new(degree)?;
        let snapshot = tree.snapshot();
        self.state = DispatcherState::Ready(tree);
        tracing::info!(degree, "initialized tree");
        Ok(Outcome::Initialized { degree, snapshot })
    }

    pub fn insert(&mut self, key: Key) -> BTreeResult<Outcome> {
        let tree = self.tree_mut()?;
        tree.insert(key)?;
        Ok(Outcome::Inserted {
            key,
            snapshot: tree.snapshot(),
        })
    }

    pub fn search(&self, key: Key) -> BTreeResult<Outcome> {
        let result = self.tree()?.search(&key);
        Ok(Outcome::Searched { key, result })
    }

    pub fn delete(&mut self, key: Key) -> BTreeResult<Outcome> {
        let tree = self.tree_mut()?;
        tree.remove(&key)?;
        Ok(Outcome::Deleted {
            key,
            snapshot: tree.snapshot(),
        })
    }

    pub fn traverse(&self) -> BTreeResult<Outcome> {
        Ok(Outcome::Traversed {
            keys: self.tree()?.traverse(),
        })
    }

    /// Execute any command.
    pub fn execute(&mut self, command: Command) -> BTreeResult<Outcome> {
        tracing::debug!(%command, "dispatching");
        let result = match command {
            Command::Init { degree } => self.init(degree),
            Command::Insert { key } => self.insert(key),
            Command::Search { key } => self.search(key),
            Command::Delete { key } => self.delete(key),
            Command::Traverse => self.traverse(),
        };
        if let Err(err) = &result {
            tracing::debug!(%command, error = %err, "command failed");
        }
        result
    }

    /// Execute a read-only command without mutable access.
    ///
    /// Mutating commands are refused with `InvalidArgument`.
    pub fn query(&self, command: Command) -> BTreeResult<Outcome> {
        tracing::debug!(%command, "dispatching read-only");
        match command {
            Command::Search { key } => self.search(key),
            Command::Traverse => self.traverse(),
            other => Err(BTreeError::invalid_argument(
                other.name(),
                "command mutates the tree",
            )),
        }
    }

    /// Execute a command and wrap the result in the JSON envelope.
    pub fn respond(&mut self, command: Command) -> Response {
        match self.execute(command) {
            Ok(outcome) => outcome.into_response(),
            Err(err) => Response::failure(&err),
        }
    }

    /// Describe the current tree level by level, with its full snapshot.
    pub fn show(&self) -> Response {
        match self.tree() {
            Ok(tree) => Response::ok(
                format!("Current tree structure (height {})", tree.height()),
                ResponseData::Levels {
                    height: tree.height(),
                    levels: tree.levels(),
                    snapshot: tree.snapshot(),
                },
            ),
            Err(err) => Response::failure(&err),
        }
    }

    /// Parse a text command and respond to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::Dispatcher;
    ///
    /// let mut dispatcher = Dispatcher::new();
    /// assert!(!dispatcher.handle_line("insert 1").success);
    /// assert!(dispatcher.handle_line("init 2").success);
    /// assert!(dispatcher.handle_line("insert 1").success);
    /// ```
    pub fn handle_line(&mut self, line: &str) -> Response {
        match line.parse::<Command>() {
            Ok(command) => self.respond(command),
            Err(err) => Response::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn ready(degree: i64, keys: &[Key]) -> Dispatcher {
        let mut dispatcher = Dispatcher::new();
        dispatcher.init(degree).unwrap();
        for &key in keys {
            dispatcher.insert(key).unwrap();
        }
        dispatcher
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&["init", "3"]).unwrap(), Command::Init { degree: 3 });
        assert_eq!(Command::parse(&["delete", "-4"]).unwrap(), Command::Delete { key: -4 });
        assert_eq!(Command::parse(&["traverse"]).unwrap(), Command::Traverse);
        assert_eq!("  insert   9 ".parse::<Command>().unwrap(), Command::Insert { key: 9 });
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        let cases: &[&[&str]] = &[
            &[],
            &["insert"],
            &["insert", "abc"],
            &["insert", "1", "2"],
            &["search", "99999999999999999999"],
            &["traverse", "1"],
            &["rebalance"],
        ];
        for &words in cases {
            let err = Command::parse(words).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidArgument, "{words:?}");
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for command in [
            Command::Init { degree: 2 },
            Command::Insert { key: -1 },
            Command::Search { key: 3 },
            Command::Delete { key: 4 },
            Command::Traverse,
        ] {
            assert_eq!(command.to_string().parse::<Command>().unwrap(), command);
        }
    }

    #[test]
    fn test_uninitialized_guard() {
        let mut dispatcher = Dispatcher::new();
        for command in [
            Command::Insert { key: 1 },
            Command::Search { key: 1 },
            Command::Delete { key: 1 },
            Command::Traverse,
        ] {
            assert_eq!(dispatcher.execute(command), Err(BTreeError::NotInitialized));
            assert!(!dispatcher.is_initialized());
        }
    }

    #[test]
    fn test_init_validates_degree() {
        let mut dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.init(1), Err(BTreeError::invalid_degree(1, 2)));
        assert_eq!(dispatcher.init(-3), Err(BTreeError::invalid_degree(-3, 2)));
        assert!(!dispatcher.is_initialized());
    }

    #[test]
    fn test_init_accepts_huge_degree() {
        let mut dispatcher = Dispatcher::new();
        let outcome = dispatcher.init(i64::MAX / 2).unwrap();
        assert!(matches!(outcome, Outcome::Initialized { .. }));

        for key in [5, -3, 12, 0] {
            dispatcher.insert(key).unwrap();
        }
        assert_eq!(dispatcher.tree().unwrap().traverse(), vec![-3, 0, 5, 12]);
        dispatcher.delete(5).unwrap();
        assert!(dispatcher.tree().unwrap().check_invariants());

        assert!(dispatcher.init(i64::MAX).is_ok());
    }

    #[test]
    fn test_invalid_reinit_keeps_current_tree() {
        let mut dispatcher = ready(2, &[1, 2, 3]);
        assert!(dispatcher.init(0).is_err());
        assert_eq!(dispatcher.tree().unwrap().traverse(), vec![1, 2, 3]);
    }

    #[test]
    fn test_reinit_discards_tree() {
        let mut dispatcher = ready(2, &[1, 2, 3]);
        let outcome = dispatcher.init(4).unwrap();
        assert!(matches!(outcome, Outcome::Initialized { degree: 4, .. }));
        assert!(dispatcher.tree().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_and_missing_keys() {
        let mut dispatcher = ready(3, &[5]);
        assert_eq!(dispatcher.insert(5), Err(BTreeError::DuplicateKey));
        assert_eq!(dispatcher.delete(6), Err(BTreeError::KeyNotFound));
        assert_eq!(dispatcher.tree().unwrap().len(), 1);
    }

    #[test]
    fn test_search_outcome_messages() {
        let dispatcher = ready(2, &[1, 2, 3, 4]);
        let found = dispatcher.search(3).unwrap();
        assert_eq!(found.message(), "Found: 3");
        let missing = dispatcher.search(9).unwrap();
        assert_eq!(missing.message(), "Not found: 9");

        let response = missing.into_response();
        assert!(response.success);
        assert!(matches!(
            response.data,
            Some(ResponseData::Search { found: false, .. })
        ));
    }

    #[test]
    fn test_query_refuses_mutations() {
        let dispatcher = ready(2, &[1]);
        assert!(dispatcher.query(Command::Traverse).is_ok());
        let err = dispatcher.query(Command::Insert { key: 2 }).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_handle_line_envelopes() {
        let mut dispatcher = Dispatcher::new();
        let response = dispatcher.handle_line("traverse");
        assert!(!response.success);
        assert_eq!(response.error, Some(ErrorCode::NotInitialized));

        let response = dispatcher.handle_line("init x");
        assert_eq!(response.error, Some(ErrorCode::InvalidArgument));

        dispatcher.handle_line("init 2");
        dispatcher.handle_line("insert 3");
        dispatcher.handle_line("insert 1");
        let response = dispatcher.handle_line("traverse");
        assert_eq!(response.data, Some(ResponseData::Traverse { keys: vec![1, 3] }));
    }

    #[test]
    fn test_show_lists_levels() {
        assert_eq!(
            Dispatcher::new().show().error,
            Some(ErrorCode::NotInitialized)
        );

        let dispatcher = ready(2, &[1, 2, 3, 4]);
        let response = dispatcher.show();
        assert_eq!(response.message, "Current tree structure (height 2)");
        let Some(ResponseData::Levels { height, levels, .. }) = response.data else {
            panic!("show should return levels");
        };
        assert_eq!(height, 2);
        assert_eq!(levels, vec![vec![vec![2]], vec![vec![1], vec![3, 4]]]);
    }

    #[test]
    fn test_restore_from_snapshot() {
        let source = ready(2, &[4, 8, 15, 16, 23, 42]);
        let snapshot = source.snapshot().unwrap();

        let restored = Dispatcher::from_snapshot(&snapshot).unwrap();
        assert_eq!(restored.snapshot().unwrap(), snapshot);
        assert_eq!(
            restored.tree().unwrap().traverse(),
            vec![4, 8, 15, 16, 23, 42]
        );
    }
}
