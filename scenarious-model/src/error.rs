//! Error types for type handlers.

use thiserror::Error;

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Errors raised while declaring a handler or creating an entity with it.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// One or more required fields were not supplied. Lists all of them.
    #[error("{entity_type}: required fields '{}' are missing", .fields.join(","))]
    MissingRequiredFields {
        entity_type: String,
        fields: Vec<String>,
    },

    /// A field was declared both required and defaulted.
    #[error(
        "{entity_type}: field '{field}' is required but also has a default value; \
         required fields cannot have default values"
    )]
    InvalidDefault { entity_type: String, field: String },

    /// A definition used a special-method field the handler does not provide.
    #[error("{entity_type}: no special method named '{method}'")]
    UnknownMethod { entity_type: String, method: String },

    /// A strict handler received a field it does not declare.
    #[error("{entity_type}: '{field}' is not a required attribute nor a declared attribute")]
    UnknownField { entity_type: String, field: String },

    /// A date/time attribute held text that could not be parsed.
    #[error("{entity_type}: could not parse '{value}' in field '{field}' as a date/time")]
    InvalidDate {
        entity_type: String,
        field: String,
        value: String,
    },

    /// A special method was called with arguments it cannot use.
    #[error("{entity_type}: invalid arguments for '{method}': {detail}")]
    InvalidArgument {
        entity_type: String,
        method: String,
        detail: String,
    },

    /// The handler's construction step failed.
    #[error("{entity_type}: construction failed: {message}")]
    Construction {
        entity_type: String,
        message: String,
    },
}
