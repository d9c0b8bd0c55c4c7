//! Core type definitions for Scenarious.
//!
//! This crate defines the data every other crate passes around:
//! - [`Value`] and [`Fields`], the dynamic field data of an entity definition
//! - [`Entity`] and [`EntityRef`], the shared domain objects handlers create
//! - [`EntityKey`] and [`EntityIdentifier`], the identity the store assigns
//!
//! Nothing here knows about YAML, handlers or references.

mod entity;
mod ids;
mod value;

pub use entity::{Entity, EntityRef};
pub use ids::{EntityIdentifier, EntityKey};
pub use value::{Fields, Value};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur converting raw values into identity types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("identifier must be an integer or a string, got {0}")]
    InvalidKey(&'static str),

    #[error("alias must be a string or an integer, got {0}")]
    InvalidAlias(&'static str),
}

impl TryFrom<&Value> for EntityKey {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Int(n) => Ok(Self::Int(*n)),
            Value::Str(s) => Ok(Self::Str(s.clone())),
            other => Err(Error::InvalidKey(other.kind())),
        }
    }
}

/// Reads an alias out of a raw value. Integer aliases are kept as text.
pub fn alias_from_value(value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Str(s) => Ok(Some(s.clone())),
        Value::Int(n) => Ok(Some(n.to_string())),
        other => Err(Error::InvalidAlias(other.kind())),
    }
}
