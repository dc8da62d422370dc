//! Runtime error types

use thiserror::Error;

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The HTTP call for an item failed
    #[error("Transport failure: {0}")]
    Transport(String),

    /// A request could not be built from the work item
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider requires an API key and none is configured
    #[error("Missing API key")]
    MissingApiKey,

    /// Type error during expression evaluation
    #[error("Type error: {0}")]
    TypeError(String),

    /// Expression referenced a context variable that does not exist
    #[error("Unknown context variable: {0}")]
    UnknownVariable(String),

    /// Expression called a function outside the registered table
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Invalid value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Configuration or persistence store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Core error (expression parsing and value handling)
    #[error(transparent)]
    Core(#[from] sitepulse_core::CoreError),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
