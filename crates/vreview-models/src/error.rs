//! Model error types.

use thiserror::Error;

/// Result type for model parsing.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while parsing model values from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown disposition: {0}")]
    UnknownDisposition(String),

    #[error("Invalid item key: {0}")]
    InvalidItemKey(String),
}
