//! Error types for the student registry.
//!
//! Expected domain failures (missing rows, uniqueness conflicts, rejected
//! operator input) are distinct variants so the menu can report them tersely,
//! while infrastructure faults keep their source errors attached for full
//! diagnostics.

use thiserror::Error;

/// Result type alias using RegistryError.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Unified error type for record-store and import/export operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The targeted row does not exist (rename, delete, change-group,
    /// group-scoped listings).
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    /// An insert would violate uniqueness or referential integrity.
    #[error("{0}")]
    Conflict(String),

    /// Operator input was rejected before the store was touched.
    #[error("{0}")]
    Validation(String),

    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem failure during import or export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The flat text file could not be read or written.
    #[error("text file error: {0}")]
    Csv(#[from] csv::Error),

    /// The XML document could not be parsed or produced.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl RegistryError {
    /// Build a [`RegistryError::NotFound`] for `entity` keyed by `key`.
    pub fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// True for expected domain failures: the menu prints these as one-line
    /// notices and moves on. Everything else is a fault worth a full log
    /// entry.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Conflict(_) | Self::Validation(_)
        )
    }
}
