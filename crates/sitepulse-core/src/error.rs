//! Error types for SitePulse Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to parse expression '{expression}': {message}")]
    ExpressionParse { expression: String, message: String },

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl CoreError {
    /// Build an expression parse error for the given source text
    pub fn parse(expression: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::ExpressionParse {
            expression: expression.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
