use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// Variants fall in three groups. Caller mistakes (`InvalidArgument`,
/// `InvalidPattern`, `InvalidBatchSize`, `Serialization`) are raised before
/// anything is sent to the store. `Deserialization` means the store holds bytes
/// the codec cannot read. The remaining variants describe a failed exchange with
/// the store and are the only ones a resilience policy may swallow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Script not found in store: {0}")]
    NoScript(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("Invalid scan batch size {size}: must be between 1 and {max}")]
    InvalidBatchSize { size: usize, max: usize },
}

impl CacheError {
    /// Returns true if the error came from talking to the store rather than
    /// from the arguments or data handed to the client.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CacheError::ConnectionFailed(_) | CacheError::OperationFailed(_) | CacheError::NoScript(_)
        )
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
