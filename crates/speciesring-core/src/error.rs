//! Error type shared by the core algorithms.

use thiserror::Error;

/// Errors raised by the alignment, ranking and placement functions.
///
/// All variants describe programming or data errors. None of them are
/// transient, so callers should surface them instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Position-wise comparison was requested for sequences of different length.
    #[error("sequences must have equal length (left: {left}, right: {right})")]
    LengthMismatch { left: usize, right: usize },

    /// The named reference entity is not part of the given collection.
    #[error("reference `{name}` not found in record set")]
    ReferenceNotFound { name: String },

    /// An argument or sequence value cannot be used.
    #[error("invalid {argument}: {reason}")]
    InvalidInput { argument: String, reason: String },
}

impl CoreError {
    /// Create a new `ReferenceNotFound` error for the given reference name.
    pub fn reference_not_found(name: impl Into<String>) -> Self {
        Self::ReferenceNotFound { name: name.into() }
    }

    /// Create a new `InvalidInput` error naming the offending argument.
    pub fn invalid_input(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}
