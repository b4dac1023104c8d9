//! Error types for recency

use thiserror::Error;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which operation input a validator rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The key passed to `get` or `put`
    Key,

    /// The value passed to `put`
    Value,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Key => f.write_str("key"),
            Field::Value => f.write_str("value"),
        }
    }
}

/// Error types for cache operations
///
/// Broken internal bookkeeping (a dead handle, an index entry without a list
/// entry) is not represented here. Those are bugs and panic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Capacity must be at least 1
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// A configured validator rejected a key or value
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        /// Rejected input
        field: Field,
        /// Validator description
        reason: String,
    },
}
