//! Typed outcomes for catalog operations

use std::path::PathBuf;

use thiserror::Error;

use crate::core::entity::EntityKind;

/// Result alias used throughout the catalog core
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur during catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input failed a format, range or length rule. Always raised before any write.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// A well-formed id that does not exist in the store
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// The store rejected an operation
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The store's files could not be created or reached
    #[error("Storage error: cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Coarse category of a [`CatalogError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
    Config,
}

impl CatalogError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Get the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation { .. } => ErrorKind::Validation,
            CatalogError::NotFound { .. } => ErrorKind::NotFound,
            CatalogError::Storage(_) | CatalogError::Io { .. } => ErrorKind::Storage,
            CatalogError::Config { .. } => ErrorKind::Config,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
