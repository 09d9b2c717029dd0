//! Error types for forum client operations

use thiserror::Error;

/// Errors surfaced to the caller of a forum operation
///
/// None of these are retried automatically and none leave a partial write
/// behind; the caller may simply try again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForumError {
    /// A mutation was attempted without a caller identity
    #[error("You must be signed in to do that")]
    Unauthenticated,

    /// A required field was empty
    #[error("Validation error: {0}")]
    Validation(String),

    /// The comment, vote, or post store rejected the call
    #[error("Store error: {0}")]
    Store(String),

    /// An identical submission is still in flight
    #[error("A submission for this thread is already in progress")]
    SubmissionPending,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ForumError {
    /// Wrap a store error, keeping its message verbatim
    pub fn store(e: impl std::fmt::Display) -> Self {
        ForumError::Store(e.to_string())
    }
}
