//! Error types for KinQL.
//!
//! All errors in KinQL are strongly typed using thiserror. Input problems,
//! storage failures and seed-file failures each get their own enum, and
//! [`KinError`] wraps them for callers that only need one type.
//!
//! Logical conflicts are not errors: a rejected statement is a normal answer
//! and is carried by [`crate::Conflict`] inside a response.

use thiserror::Error;

use crate::conflict::Conflict;
use crate::fact::Fact;
use crate::storage::StorageError;

/// Validation errors for user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("'{name}' is not a single-word name")]
    InvalidName {
        name: String,
    },

    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        field: String,
        max_length: usize,
    },

    #[error("Operation '{operation}' expects {expected} names, got {actual}")]
    WrongArity {
        operation: String,
        expected: String,
        actual: usize,
    },

    #[error("Input does not match any sentence pattern")]
    UnrecognizedInput,
}

/// Errors raised while loading or saving a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Seed file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Seed file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported seed file version {found} (expected {expected})")]
    UnsupportedVersion {
        found: u32,
        expected: u32,
    },

    #[error("Seed fact {fact} conflicts with the knowledge base: {conflict}")]
    Conflict {
        fact: Fact,
        conflict: Conflict,
    },

    #[error("Storage error while seeding: {0}")]
    Storage(#[from] StorageError),
}

/// Top-level error type for KinQL.
#[derive(Debug, Error)]
pub enum KinError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),

    #[error("Invalid sentence pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type alias for KinQL operations.
pub type KinResult<T> = Result<T, KinError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::Person;

    #[test]
    fn test_validation_error_invalid_name() {
        let err = ValidationError::InvalidName {
            name: "Mary Ann".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("Mary Ann"));
        assert!(msg.contains("single-word"));
    }

    #[test]
    fn test_validation_error_arity() {
        let err = ValidationError::WrongArity {
            operation: "father".to_string(),
            expected: "2".to_string(),
            actual: 3,
        };
        let msg = format!("{err}");
        assert!(msg.contains("father"));
        assert!(msg.contains("expects 2"));
        assert!(msg.contains("got 3"));
    }

    #[test]
    fn test_seed_error_conflict_mentions_fact() {
        let fact = Fact::Parent {
            parent: Person::parse("mary").unwrap(),
            child: Person::parse("mary").unwrap(),
        };
        let err = SeedError::Conflict {
            fact,
            conflict: Conflict::SelfReference {
                person: Person::parse("mary").unwrap(),
            },
        };
        let msg = format!("{err}");
        assert!(msg.contains("parent(Mary, Mary)"));
        assert!(msg.contains("self_reference"));
    }

    #[test]
    fn test_kin_error_from_validation() {
        let err: KinError = ValidationError::EmptyName.into();
        assert!(matches!(err, KinError::Validation(ValidationError::EmptyName)));
    }

    #[test]
    fn test_kin_error_from_storage() {
        let err: KinError = StorageError::BackendError("poisoned".to_string()).into();
        assert!(matches!(err, KinError::Storage(_)));
        assert!(format!("{err}").contains("poisoned"));
    }
}
