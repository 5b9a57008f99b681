//! Error types for shipview.
//!
//! Collaborator read failures never show up here: they are absorbed per
//! category and reported through [`Lookup`](shipview_cache::Lookup) and
//! [`RefreshReport`](crate::RefreshReport). These variants cover caller
//! mistakes and setup problems.

use shipview_config::ConfigError;
use shipview_types::UnknownCategory;

/// Error type for shipview operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] shipview_cache::Error),

    #[error("failed to install log subscriber: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

/// Result type for shipview operations.
pub type Result<T> = std::result::Result<T, Error>;
