//! Errors raised by cache backends.

use agora_core::AgoraError;
use thiserror::Error;

/// Errors that can occur during cache backend operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid key pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Returns true if the backend could not be reached at all.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_))
    }
}

/// Result type for cache backend operations.
pub type Result<T> = std::result::Result<T, CacheError>;

impl From<CacheError> for AgoraError {
    fn from(err: CacheError) -> Self {
        AgoraError::upstream_with_cause("cache", err.to_string(), err)
    }
}

impl From<config::ConfigError> for CacheError {
    fn from(err: config::ConfigError) -> Self {
        CacheError::InvalidConfig(err.to_string())
    }
}
