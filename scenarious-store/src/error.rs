//! Error types for the entity store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
///
/// Plain lookups never fail; they return `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An alias was registered twice for the same type.
    #[error("duplicated alias '{alias}' for {entity_type}")]
    DuplicateAlias { entity_type: String, alias: String },

    /// A by-name lookup addressed a different type than the collection holds.
    #[error("invalid type name: {0}")]
    InvalidTypeName(String),

    /// A by-name lookup matched neither an identifier nor an alias.
    #[error("object not found: {0}")]
    NotFound(String),
}
