//! Error types shared across the Formwright crates
//!
//! Domain-specific errors live in their own crates; the variants here are
//! the ones that cross crate boundaries (value shape problems, missing
//! references, capability reporting).

use thiserror::Error;

/// Result type for Formwright operations
pub type Result<T> = std::result::Result<T, FormwrightError>;

/// Errors that can occur in form engine operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormwrightError {
    /// Submitted value has the wrong shape for the field (e.g. an object
    /// posted to a text field). Scalar inputs never produce this.
    #[error("field '{handle}' expects {expected}, got {actual}")]
    TypeMismatch {
        /// Handle of the field that received the malformed value
        handle: String,
        /// Expected value shape
        expected: &'static str,
        /// Actual value shape received
        actual: &'static str,
    },

    /// A rule or threshold check failed on a submitted value
    #[error("validation failed on field '{handle}': {message}")]
    ValidationFailure {
        /// Handle of the failing field
        handle: String,
        /// Human-facing message, parameterized by the threshold
        message: String,
    },

    /// Referenced form, template, or status does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What kind of thing was looked up ("form", "template", ...)
        kind: &'static str,
        /// The identifier that failed to resolve
        id: String,
    },

    /// Field type discriminator is not registered
    #[error("unknown field type: {type_name}")]
    UnknownFieldType {
        /// The unrecognized discriminator
        type_name: String,
    },

    /// Reported by the permission collaborator, never generated here
    #[error("capability '{capability}' required")]
    PermissionDenied {
        /// The capability name the caller lacks
        capability: String,
    },

    /// Wire payload could not be decoded
    #[error("payload decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FormwrightError {
    /// Classify a JSON value's shape for TypeMismatch reporting.
    pub fn value_shape(value: &serde_json::Value) -> &'static str {
        match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }
}
