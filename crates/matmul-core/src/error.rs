//! Error type shared by the engine, the stores, and the orchestration layer.

/// Error type for matrix calculations.
#[derive(Debug, thiserror::Error)]
pub enum MatMulError {
    /// A stored artifact was read before it was written.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected before any computation started.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The persistence medium failed (I/O, serialization).
    #[error("storage failure: {0}")]
    Storage(String),

    /// The report could not be delivered to its callback.
    #[error("callback failure: {0}")]
    Callback(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl MatMulError {
    /// Whether this error reports a missing artifact.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for MatMulError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(format!("serialization: {err}"))
    }
}

/// Result alias used across the workspace.
pub type Result<T, E = MatMulError> = std::result::Result<T, E>;
