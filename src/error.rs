//! Error types for index construction and queries.

use thiserror::Error;

/// Errors that can occur while building, mutating or querying an index.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// An interval in a build batch has `lower > upper` (or a NaN bound).
    #[error("invalid interval at index {index}: lower bound exceeds upper bound ({count} invalid in batch)")]
    InvalidInterval {
        /// Position of the first offending interval in the batch.
        index: usize,
        /// Number of offending intervals in the batch.
        count: usize,
    },

    /// Grid cell size must be strictly positive.
    #[error("grid resolution must be strictly positive")]
    InvalidResolution,

    /// Grid rectangle has `left > right` or `lower > upper`.
    #[error("grid bounds are inverted or not finite")]
    InvalidBounds,

    /// A point lies outside the grid's bounding rectangle.
    #[error("point ({x}, {y}) lies outside the grid bounds")]
    OutOfBounds {
        /// X coordinate of the rejected point.
        x: f64,
        /// Y coordinate of the rejected point.
        y: f64,
    },

    /// The entry to remove is not stored in the index.
    #[error("entry not found in index")]
    NotFound,

    /// Nearest-neighbor query against an index with no entries.
    #[error("index is empty")]
    EmptyIndex,
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
