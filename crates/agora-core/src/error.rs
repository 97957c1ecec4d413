//! Error types for the Agora marketplace.
//!
//! Every failure surfaced by the cache layer or the marketplace service is
//! one of four categories. The category is preserved end to end so callers
//! can map it to a coarse wire code without inspecting messages.
//!
//! # Example
//!
//! ```
//! use agora_core::{AgoraError, ErrorCode, Result};
//!
//! fn find_listing(id: &str) -> Result<String> {
//!     if id.is_empty() {
//!         return Err(AgoraError::validation("_id", "id cannot be empty"));
//!     }
//!     Err(AgoraError::not_found("product", id))
//! }
//!
//! let err = find_listing("").unwrap_err();
//! assert_eq!(err.code(), ErrorCode::BadInput);
//! assert_eq!(err.code().as_str(), "BAD_INPUT");
//! ```

use std::fmt;

use thiserror::Error;

/// Coarse error code surfaced to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Caller input was rejected by a validator.
    BadInput,
    /// The primary store has no such record.
    NotFound,
    /// A business rule was violated (duplicate favorite, duplicate comment, ...).
    Conflict,
    /// The primary store or the cache backend failed.
    InternalServerError,
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadInput => "BAD_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for marketplace and cache operations.
///
/// # Example
///
/// ```
/// use agora_core::AgoraError;
///
/// let error = AgoraError::not_found("product", "abc");
/// assert!(error.is_not_found());
/// assert_eq!(error.to_string(), "product 'abc' not found");
/// ```
#[derive(Debug, Error)]
pub enum AgoraError {
    /// Caller input failed validation. Never reaches the cache or the store.
    #[error("Validation error for field '{field}': {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Human readable reason
        message: String,
    },

    /// The primary store has no record for the given identity.
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Entity type that was requested
        entity: String,
        /// Identifier that was requested
        id: String,
    },

    /// The primary store or the cache backend failed.
    #[error("Upstream error from '{source_name}': {message}")]
    Upstream {
        /// Name of the failing component
        source_name: String,
        /// Description of what went wrong
        message: String,
        /// Underlying error
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A business rule was violated after a successful read.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the violated rule
        message: String,
    },
}

impl AgoraError {
    // ============================================
    // Convenience constructors
    // ============================================

    /// Creates a Validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a NotFound error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an Upstream error without a cause.
    pub fn upstream(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            source_name: source.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates an Upstream error with a cause.
    pub fn upstream_with_cause<E>(
        source: impl Into<String>,
        message: impl Into<String>,
        cause: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Upstream {
            source_name: source.into(),
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    // ============================================
    // Query methods
    // ============================================

    /// Returns the coarse code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::BadInput,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Conflict { .. } => ErrorCode::Conflict,
            Self::Upstream { .. } => ErrorCode::InternalServerError,
        }
    }

    /// Returns true if the record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if this is an upstream (store or cache backend) error.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    /// Returns true if this is a business-rule conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Type alias for Results with AgoraError.
pub type Result<T> = std::result::Result<T, AgoraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = AgoraError::not_found("post", "0191a2");
        assert_eq!(error.to_string(), "post '0191a2' not found");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_validation_display() {
        let error = AgoraError::validation("price", "must be positive");
        let msg = error.to_string();

        assert!(msg.contains("price"));
        assert!(msg.contains("must be positive"));
        assert!(error.is_validation_error());
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            AgoraError::validation("f", "m").code().as_str(),
            "BAD_INPUT"
        );
        assert_eq!(AgoraError::not_found("user", "u1").code().as_str(), "NOT_FOUND");
        assert_eq!(AgoraError::conflict("dup").code().as_str(), "CONFLICT");
        assert_eq!(
            AgoraError::upstream("store", "down").code().as_str(),
            "INTERNAL_SERVER_ERROR"
        );
    }

    #[test]
    fn test_upstream_with_cause_keeps_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = AgoraError::upstream_with_cause("redis", "connection failed", io_error);

        use std::error::Error;
        assert!(error.source().is_some());
        assert!(error.is_upstream());
    }

    #[test]
    fn test_result_with_question_mark() {
        fn inner() -> Result<()> {
            Err(AgoraError::conflict("Already favorited"))
        }

        fn outer() -> Result<String> {
            inner()?;
            Ok("success".into())
        }

        let err = outer().unwrap_err();
        assert!(err.is_conflict());
    }
}
