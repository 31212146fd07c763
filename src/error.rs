//! Error taxonomy of the snapshot engine.
//!
//! Every error is raised synchronously where the violated structure is validated.
//! There is no recovery path: the caller fixes the input and rebuilds the model.

use thiserror::Error;

use crate::types::BagId;

/// Errors produced while building or rendering a visualization.
#[derive(Debug, Error)]
pub enum VisuError {
    /// Structural violation at construction time (dangling id, empty hyperedge, ...).
    #[error("Malformed input: {message}")]
    MalformedInput {
        /// What was wrong with the input.
        message: String,
    },

    /// The edges of a tree decomposition do not form a tree.
    #[error("Not a tree: {message}")]
    NotATree {
        /// Description of the offending structure.
        message: String,
    },

    /// A solution table has rows of different lengths.
    #[error("Jagged solution table: row {row} has {found} cells, expected {expected}")]
    TableShape {
        /// Index of the first offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// The input document is not valid JSON or does not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VisuError {
    /// Create a new malformed-input error with the given message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    /// Create a new not-a-tree error with the given message.
    #[must_use]
    pub fn not_a_tree(message: impl Into<String>) -> Self {
        Self::NotATree {
            message: message.into(),
        }
    }

    /// Convenience constructor for an edge referencing an undeclared bag.
    #[must_use]
    pub fn dangling_bag(id: BagId) -> Self {
        Self::malformed(format!("edge references undeclared bag {}", id))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VisuError>;
