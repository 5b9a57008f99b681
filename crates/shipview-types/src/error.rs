//! Error types shared with the memory-reading collaborator.

use thiserror::Error;

use crate::player::Handle;

/// Result type for a single collaborator read.
pub type ReadResult<T> = std::result::Result<T, ReadFailure>;

/// A collaborator could not produce a value on this attempt.
///
/// Read failures are transient and scoped to one category; the cache layer
/// absorbs them and keeps serving whatever it already had.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadFailure {
    #[error("not attached to the target process")]
    NotAttached,

    #[error("memory read at {address} failed: {reason}")]
    Memory { address: Handle, reason: String },

    #[error("could not resolve {0}")]
    Unresolved(String),

    #[error("handle {0} no longer points at a live object")]
    InvalidHandle(Handle),

    #[error("scan has not produced a result yet")]
    ScanPending,

    #[error("{0}")]
    Other(String),
}

/// A category name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);
