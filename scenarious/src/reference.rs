//! Reference syntax: `$<type_name>_<identifier>[.<attr>...]`.
//!
//! The type name may itself contain underscores; only the last
//! underscore-delimited segment is the identifier. Identifiers stay text
//! here; the store decides whether `"3"` means alias `3` or id `3`.

use crate::error::ReferenceError;
use scenarious_types::{EntityKey, Value};
use std::fmt;

/// Default prefix marking a string as a reference.
pub const DEFAULT_SIGIL: &str = "$";

/// A parsed reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub entity_type: String,
    pub identifier: String,
    /// Attribute path read off the target, in order.
    pub attributes: Vec<String>,
}

impl Reference {
    /// Store lookup key for the target.
    pub fn key(&self) -> EntityKey {
        EntityKey::Str(self.identifier.clone())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.entity_type, self.identifier)?;
        for attribute in &self.attributes {
            write!(f, ".{attribute}")?;
        }
        Ok(())
    }
}

/// Recognises and parses reference strings.
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    sigil: String,
}

impl Default for ReferenceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SIGIL)
    }
}

impl ReferenceResolver {
    pub fn new(sigil: impl Into<String>) -> Self {
        Self {
            sigil: sigil.into(),
        }
    }

    pub fn sigil(&self) -> &str {
        &self.sigil
    }

    /// True exactly for text values starting with the sigil.
    pub fn is_reference(&self, value: &Value) -> bool {
        matches!(value, Value::Str(text) if self.is_reference_text(text))
    }

    pub fn is_reference_text(&self, text: &str) -> bool {
        text.starts_with(&self.sigil)
    }

    /// Splits reference text into type, identifier and attribute path.
    ///
    /// ```
    /// use scenarious::ReferenceResolver;
    ///
    /// let r = ReferenceResolver::default().parse("$movie_star_3.name").unwrap();
    /// assert_eq!(r.entity_type, "movie_star");
    /// assert_eq!(r.identifier, "3");
    /// assert_eq!(r.attributes, vec!["name"]);
    /// ```
    pub fn parse(&self, text: &str) -> Result<Reference, ReferenceError> {
        let body = text
            .strip_prefix(self.sigil.as_str())
            .ok_or_else(|| ReferenceError::MissingSigil(self.sigil.clone()))?;

        let mut segments = body.split('.');
        let head = segments.next().unwrap_or_default();
        let (entity_type, identifier) = head
            .rsplit_once('_')
            .ok_or(ReferenceError::MissingSeparator)?;

        if entity_type.is_empty() {
            return Err(ReferenceError::EmptyType);
        }
        if identifier.is_empty() {
            return Err(ReferenceError::EmptyIdentifier);
        }

        let attributes = segments
            .enumerate()
            .map(|(position, attribute)| {
                if attribute.is_empty() {
                    Err(ReferenceError::EmptyAttribute(position))
                } else {
                    Ok(attribute.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Reference {
            entity_type: entity_type.to_string(),
            identifier: identifier.to_string(),
            attributes,
        })
    }
}
