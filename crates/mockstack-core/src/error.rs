//! Error types for the MockStack core.

/// Core error type for MockStack infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum MockStackError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for MockStack operations.
pub type MockStackResult<T> = Result<T, MockStackError>;
