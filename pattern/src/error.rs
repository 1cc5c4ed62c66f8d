//! Pattern error types.

use thiserror::Error;

/// Errors that can occur while constructing a pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A text predicate's regular expression failed to compile.
    #[error("invalid regex '{expr}': {message}")]
    InvalidRegex { expr: String, message: String },
}

impl PatternError {
    pub fn invalid_regex(expr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRegex {
            expr: expr.into(),
            message: message.into(),
        }
    }
}

/// Result type for pattern operations.
pub type PatternResult<T> = Result<T, PatternError>;
