//! Error types for cache lookups.

use shipview_types::ReadFailure;

/// Error type for callers that want an absent cached value as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The category has never been refreshed successfully.
    #[error("{0} has not been populated yet")]
    NotYetPopulated(String),

    /// The latest read failed and there was nothing cached to fall back to.
    #[error("read failed: {0}")]
    Read(#[from] ReadFailure),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;
