//! Identifier types used by the entity store.
//!
//! Fixture files may name entities with integers (`id: 3`) or free text
//! (`id: lead`), so keys keep whichever representation they were given.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The stored form of an entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityKey {
    Int(i64),
    Str(String),
}

impl EntityKey {
    /// Returns the integer form, if this key is an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Str(_) => None,
        }
    }

    /// Returns the text form, if this key is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Str(s) => Some(s),
        }
    }

    /// Returns the same key in the opposite representation, when one exists.
    ///
    /// `Int(3)` becomes `Str("3")`; `Str("3")` becomes `Int(3)`; text that is
    /// not an integer has no coerced form. Used only as a lookup fallback.
    #[must_use]
    pub fn coerced(&self) -> Option<Self> {
        match self {
            Self::Int(n) => Some(Self::Str(n.to_string())),
            Self::Str(s) => s.trim().parse::<i64>().ok().map(Self::Int),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityKey {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for EntityKey {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&str> for EntityKey {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Public identity of an entity: an optional identifier and optional alias.
///
/// Built from the reserved `id` and alias fields of a raw definition. When
/// the identifier is absent the store mints one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityIdentifier {
    pub identifier: Option<EntityKey>,
    pub alias: Option<String>,
}

impl EntityIdentifier {
    #[must_use]
    pub fn new(identifier: Option<EntityKey>, alias: Option<String>) -> Self {
        Self {
            identifier,
            alias: alias.filter(|a| !a.is_empty()),
        }
    }

    /// An identifier with an explicit key and no alias.
    #[must_use]
    pub fn with_key(key: impl Into<EntityKey>) -> Self {
        Self::new(Some(key.into()), None)
    }

    /// An identifier carrying only an alias; the key will be minted.
    #[must_use]
    pub fn with_alias(alias: impl Into<String>) -> Self {
        Self::new(None, Some(alias.into()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifier.is_none() && self.alias.is_none()
    }
}
