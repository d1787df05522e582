//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, input/business failures. Every variant
/// that concerns a single input carries the name of the offending field so the
/// HTTP layer can point clients at it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A mandatory field was missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A field was present but its value is not acceptable.
    #[error("{field}: {message}")]
    InvalidArgument { field: String, message: String },

    /// A value failed validation without being tied to a named field.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// The operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn required(field: impl Into<String>) -> Self {
        Self::Required {
            field: field.into(),
        }
    }

    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_render_the_field_name() {
        assert_eq!(DomainError::required("name").to_string(), "name is required");
        assert_eq!(
            DomainError::invalid_argument("name.it", "too long").to_string(),
            "name.it: too long"
        );
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = DomainError::not_found("organization");
        assert_eq!(err.to_string(), "organization not found");
        assert_eq!(
            err,
            DomainError::NotFound {
                resource: "organization".to_string()
            }
        );
    }
}
