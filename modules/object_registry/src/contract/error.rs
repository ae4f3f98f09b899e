//! Contract error types for the object registry
//!
//! These errors are transport-agnostic and used for inter-module communication.

/// Object registry domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Object, reference entity or priority record not found
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type (object, region, priority_record, ...)
        resource: String,
        /// Resource identifier
        id: String,
    },

    /// Input failed boundary validation
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Uploaded payload could not be read as a spreadsheet at all
    #[error("Unreadable payload: {message}")]
    InvalidPayload { message: String },

    /// Uploaded header row does not match the export columns
    #[error("Header mismatch: expected [{}], found [{}]", .expected.join(", "), .found.join(", "))]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Internal error
    #[error("Internal error")]
    Internal,
}

impl RegistryError {
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
