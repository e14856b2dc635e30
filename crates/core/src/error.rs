//! Domain error model.

use thiserror::Error;

use crate::record::Record;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures about records and keys.
/// Storage and authorization failures belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// No record exists under the requested key.
    ///
    /// The display form is part of the external contract.
    #[error("{resource_type} with id {key} not found")]
    NotFound {
        resource_type: &'static str,
        key: String,
    },
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found<R: Record>(key: &R::Key) -> Self {
        Self::NotFound {
            resource_type: R::RESOURCE_TYPE,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_type_and_key() {
        let err = DomainError::NotFound {
            resource_type: "HelpRequest",
            key: "99".to_string(),
        };
        assert_eq!(err.to_string(), "HelpRequest with id 99 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_id_is_not_a_not_found() {
        let err = DomainError::invalid_id("RecordId: abc");
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "invalid identifier: RecordId: abc");
    }
}
