//! # Error Types
//!
//! Structured error types for costwise_core. Errors carry enough context
//! to be handled programmatically by API layers and rendered verbatim to
//! end users, and every variant serializes cleanly to JSON.
//!
//! Divide-by-zero is never an error anywhere in the engine:
//! ratio computations (margin, profitability, ROI, break-even) return
//! documented sentinel values instead. See the individual calculation
//! modules for the per-function policy.
//!
//! ## Example
//!
//! ```rust
//! use costwise_core::errors::{EngineError, EngineResult};
//!
//! fn validate_amount(amount: f64) -> EngineResult<()> {
//!     if amount <= 0.0 {
//!         return Err(EngineError::InvalidInput {
//!             field: "amount".to_string(),
//!             value: amount.to_string(),
//!             reason: "Amount must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for costwise_core operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Structured error type for engine operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic handling by whatever layer sits on top.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EngineError {
    /// An input value is invalid (out of range, non-positive, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A referenced entity (product, business) does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        EngineError::MissingField {
            field: field.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        EngineError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::InvalidInput { .. } => "INVALID_INPUT",
            EngineError::MissingField { .. } => "MISSING_FIELD",
            EngineError::NotFound { .. } => "NOT_FOUND",
            EngineError::FileError { .. } => "FILE_ERROR",
            EngineError::FileLocked { .. } => "FILE_LOCKED",
            EngineError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EngineError::VersionMismatch { .. } => "VERSION_MISMATCH",
            EngineError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
