//! Error taxonomy for core operations
//!
//! Each failure condition gets its own variant so the transport layer can
//! tell them apart without parsing messages.

use std::fmt;

use thiserror::Error;

/// Reason attached to the conflict raised when deleting an establishment
/// that still owns stores.
pub const HAS_STORES_REASON: &str = "cannot delete establishment: it has related stores";

/// What kind of backend failure a [`StorageError`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// The backend rejected a write (foreign key, not-null, unique, ...).
    Constraint,
    /// Any other I/O or driver failure.
    Backend,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constraint => write!(f, "constraint violation"),
            Self::Backend => write!(f, "backend failure"),
        }
    }
}

/// Failure reported by a storage backend, with the underlying cause kept
/// as the error source.
#[derive(Debug, Error)]
#[error("storage error ({kind})")]
pub struct StorageError {
    kind: StorageErrorKind,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl StorageError {
    pub fn new(
        kind: StorageErrorKind,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    pub fn constraint(source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::new(StorageErrorKind::Constraint, source)
    }

    pub fn backend(source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::new(StorageErrorKind::Backend, source)
    }

    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    pub fn is_constraint(&self) -> bool {
        self.kind == StorageErrorKind::Constraint
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors surfaced by the establishment and store services.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested entity does not exist
    #[error("{resource} '{id}' not found")]
    NotFound {
        resource: &'static str,
        id: i64,
    },

    /// Business rule violation
    #[error("{reason}")]
    Conflict { reason: String },

    /// Backend failure, passed through untouched
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The caller canceled the unit of work or its deadline passed
    #[error("operation canceled")]
    Canceled,
}

impl CoreError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn storage_error_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = CoreError::from(StorageError::backend(io));

        // transparent: display and source come straight from the storage error
        assert_eq!(err.to_string(), "storage error (backend failure)");
        let source = err.source().expect("cause attached");
        assert_eq!(source.to_string(), "reset by peer");
    }

    #[test]
    fn conflict_display_is_reason() {
        let err = CoreError::conflict(HAS_STORES_REASON);
        assert_eq!(
            err.to_string(),
            "cannot delete establishment: it has related stores"
        );
    }

    #[test]
    fn not_found_display() {
        let err = CoreError::not_found("establishment", 42);
        assert_eq!(err.to_string(), "establishment '42' not found");
    }
}
