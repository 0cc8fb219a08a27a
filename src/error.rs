//! Error types for the bug bash core.
//!
//! Client failures are captured at the action boundary and translated
//! into store-resident error messages; these types carry the taxonomy
//! up to that point.

use thiserror::Error;

/// Primary error type for bug bash operations.
#[derive(Error, Debug)]
pub enum BugBashError {
    // === Document Errors ===
    /// Document with the specified ID was not found, or was already deleted.
    #[error("{kind} '{id}' does not exist or was already deleted")]
    NotFound { kind: &'static str, id: String },

    /// Attempted to create a document with an ID that already exists.
    #[error("Document ID collision in '{collection}': {id}")]
    IdCollision { collection: String, id: String },

    /// Update or delete presented a stale version token.
    #[error("'{id}' was modified by someone else, please refresh")]
    Conflict { id: String },

    /// Document payload did not match the expected record shape.
    #[error("Malformed document in '{collection}': {reason}")]
    MalformedDocument { collection: String, reason: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === Storage Errors ===
    /// Generic document-store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl BugBashError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }

    /// True for the stale-version failure that save/delete must surface
    /// while keeping local pending edits intact.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Result type using `BugBashError`.
pub type Result<T> = std::result::Result<T, BugBashError>;
