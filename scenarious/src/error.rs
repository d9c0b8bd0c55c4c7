//! Error types for scenario building.

use scenarious_model::HandlerError;
use scenarious_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors that can occur while loading or building a scenario.
///
/// Handler, store and source errors pass through unchanged. Failures to
/// dereference a reference are reported as [`ScenarioError::Load`] with the
/// type being loaded.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A reference string could not be parsed.
    #[error("invalid reference '{reference}'")]
    InvalidReference {
        reference: String,
        #[source]
        source: ReferenceError,
    },

    /// No handler accepts the type name, or the type was never loaded.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// Two handlers claim the same type name.
    #[error("type name '{0}' is already registered")]
    DuplicateTypeName(String),

    /// A type's raw data is not a list, a mapping or a count.
    #[error("type definition '{entity_type}' must be a list, a mapping or a count, got {found}")]
    InvalidTypeDefinition {
        entity_type: String,
        found: &'static str,
    },

    /// The `id` or alias field holds an unusable value.
    #[error("invalid identifier for {entity_type}")]
    InvalidIdentifier {
        entity_type: String,
        #[source]
        source: scenarious_types::Error,
    },

    /// A reference targets an entity of a type that is still loading and
    /// has not been created yet.
    #[error("cyclic reference to {entity_type} '{identifier}' while it is being loaded")]
    CyclicReference {
        entity_type: String,
        identifier: String,
    },

    /// Loading a type failed while resolving a reference.
    #[error("error loading type '{entity_type}'")]
    Load {
        entity_type: String,
        #[source]
        source: ResolveError,
    },

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Reference text that does not match `$<type>_<identifier>[.<attr>...]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("reference must start with '{0}'")]
    MissingSigil(String),

    #[error("no '_' separating type and identifier")]
    MissingSeparator,

    #[error("empty type name")]
    EmptyType,

    #[error("empty identifier")]
    EmptyIdentifier,

    #[error("empty attribute at position {0}")]
    EmptyAttribute(usize),
}

/// A parsed reference that does not lead to a value.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no {entity_type} with identifier or alias '{identifier}'")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("'{reference}' has no attribute '{attribute}'")]
    MissingAttribute { reference: String, attribute: String },

    #[error("cannot read attribute '{attribute}' of a {kind} in '{reference}'")]
    NotNavigable {
        reference: String,
        attribute: String,
        kind: &'static str,
    },
}

/// Failures reading or parsing a scenario source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("scenario source must be a mapping of type names, got {0}")]
    NotAMapping(&'static str),
}

/// Failures loading a [`ScenarioConfig`](crate::ScenarioConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A reserved field name or the reference sigil is empty.
    #[error("config field '{0}' must not be empty")]
    EmptyField(&'static str),
}
