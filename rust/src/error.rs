//! Error handling and result types for B-tree operations.
//!
//! Every error here is recoverable at the dispatcher boundary: a failed
//! operation leaves the tree exactly as it was before the call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for B-tree and dispatcher operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BTreeError {
    /// The requested degree is below the minimum of 2.
    #[error("invalid degree {degree}: minimum degree is {min}")]
    InvalidDegree { degree: i64, min: usize },
    /// A tree operation was requested before `init`.
    #[error("tree not initialized: run init first")]
    NotInitialized,
    /// The key is already stored in the tree.
    #[error("key already exists")]
    DuplicateKey,
    /// The key is not stored in the tree.
    #[error("key not found")]
    KeyNotFound,
    /// A command argument was missing, non-numeric or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A snapshot could not be turned back into a valid tree.
    #[error("corrupted snapshot: {0}")]
    CorruptedSnapshot(String),
    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Stable, machine-readable error codes used in response envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidDegree,
    NotInitialized,
    DuplicateKey,
    KeyNotFound,
    InvalidArgument,
    CorruptedSnapshot,
    Serialization,
}

impl BTreeError {
    /// Create an InvalidDegree error for the given degree.
    pub fn invalid_degree(degree: i64, min: usize) -> Self {
        Self::InvalidDegree { degree, min }
    }

    /// Create an InvalidArgument error with context
    pub fn invalid_argument(command: &str, details: &str) -> Self {
        Self::InvalidArgument(format!("{}: {}", command, details))
    }

    /// Create a CorruptedSnapshot error with context
    pub fn corrupted_snapshot(component: &str, details: &str) -> Self {
        Self::CorruptedSnapshot(format!("{}: {}", component, details))
    }

    /// The envelope code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidDegree { .. } => ErrorCode::InvalidDegree,
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::DuplicateKey => ErrorCode::DuplicateKey,
            Self::KeyNotFound => ErrorCode::KeyNotFound,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::CorruptedSnapshot(_) => ErrorCode::CorruptedSnapshot,
            Self::Serialization(_) => ErrorCode::Serialization,
        }
    }

    /// Check if this error was caused by caller input rather than tree state
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDegree { .. } | Self::InvalidArgument(_) | Self::CorruptedSnapshot(_)
        )
    }
}

impl From<serde_json::Error> for BTreeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Public result type for tree operations that may fail
pub type BTreeResult<T> = Result<T, BTreeError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, BTreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, BTreeError>;

/// Result type for tree construction and restoration
pub type InitResult<T> = Result<T, BTreeError>;
