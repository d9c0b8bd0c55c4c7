//! Scenario sources and the raw data they accumulate into.

use crate::error::{ScenarioError, ScenarioResult, SourceError};
use indexmap::IndexMap;
use scenarious_types::{Fields, Value};
use std::path::{Path, PathBuf};

/// Where scenario data comes from.
///
/// Text converts to [`Source::Yaml`], paths to [`Source::File`] and parsed
/// JSON values to [`Source::Mapping`].
#[derive(Debug, Clone)]
pub enum Source {
    Mapping(serde_json::Value),
    Yaml(String),
    File(PathBuf),
}

impl Source {
    /// Reads the source into an ordered mapping of type name to raw
    /// definition. Empty documents yield an empty mapping.
    pub fn read(&self) -> Result<IndexMap<String, Value>, SourceError> {
        match self {
            Self::Mapping(value) => top_level(value.clone()),
            Self::Yaml(text) => parse_yaml(text),
            Self::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })?;
                parse_yaml(&text)
            }
        }
    }
}

fn parse_yaml(text: &str) -> Result<IndexMap<String, Value>, SourceError> {
    if text.trim().is_empty() {
        return Ok(IndexMap::new());
    }
    let value: serde_json::Value = serde_yaml::from_str(text)?;
    top_level(value)
}

fn top_level(value: serde_json::Value) -> Result<IndexMap<String, Value>, SourceError> {
    match Value::from(value) {
        Value::Null => Ok(IndexMap::new()),
        Value::Map(types) => Ok(types),
        other => Err(SourceError::NotAMapping(other.kind())),
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Self {
        Self::Yaml(text.to_string())
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Self::Yaml(text)
    }
}

impl From<serde_json::Value> for Source {
    fn from(value: serde_json::Value) -> Self {
        Self::Mapping(value)
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// Largest entity count a single integer definition may request.
pub const MAX_DEFINITION_COUNT: usize = 1_000_000;

/// Raw definitions keyed by canonical type name, in first-seen order.
///
/// Each type keeps its definitions as written, one per merged source, so
/// counts are never expanded before the type is loaded.
#[derive(Debug, Clone, Default)]
pub struct RawScenarioData {
    types: IndexMap<String, Vec<Value>>,
}

impl RawScenarioData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, entity_type: &str) -> bool {
        self.types.contains_key(entity_type)
    }

    /// The definitions merged for a type, in merge order.
    pub fn get(&self, entity_type: &str) -> Option<&[Value]> {
        self.types.get(entity_type).map(Vec::as_slice)
    }

    /// Type names in first-seen order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of entities the type's definitions describe.
    pub fn entry_count(&self, entity_type: &str) -> usize {
        self.get(entity_type)
            .unwrap_or_default()
            .iter()
            .filter_map(|definition| definition_entries(entity_type, definition).ok())
            .fold(0, |total, entries| total.saturating_add(entries.len()))
    }

    /// Adds a definition after checking its shape. A type seen before keeps
    /// its earlier entries and gets the new ones appended.
    pub fn merge(&mut self, entity_type: &str, definition: Value) -> ScenarioResult<()> {
        definition_entries(entity_type, &definition)?;
        self.types
            .entry(entity_type.to_string())
            .or_default()
            .push(definition);
        Ok(())
    }
}

/// Classifies one raw definition and yields its entity field mappings.
///
/// A list yields one mapping per entry, a mapping yields itself and a
/// non-negative count `N` yields `N` empty mappings, produced lazily. The
/// shape is checked up front so iteration cannot fail.
pub fn definition_entries<'a>(
    entity_type: &str,
    definition: &'a Value,
) -> ScenarioResult<DefinitionEntries<'a>> {
    let invalid = |found: &'static str| ScenarioError::InvalidTypeDefinition {
        entity_type: entity_type.to_string(),
        found,
    };

    let entries = match definition {
        Value::List(items) => {
            if let Some(item) = items.iter().find(|item| item.as_map().is_none()) {
                return Err(invalid(item.kind()));
            }
            Entries::List(items.iter())
        }
        Value::Map(fields) => Entries::Single(Some(fields)),
        Value::Int(count) => {
            let count = usize::try_from(*count).map_err(|_| invalid("negative integer"))?;
            if count > MAX_DEFINITION_COUNT {
                return Err(invalid("count above limit"));
            }
            Entries::Count(count)
        }
        other => return Err(invalid(other.kind())),
    };
    Ok(DefinitionEntries { entries })
}

/// Iterator over the field mappings of one definition.
#[derive(Debug, Clone)]
pub struct DefinitionEntries<'a> {
    entries: Entries<'a>,
}

#[derive(Debug, Clone)]
enum Entries<'a> {
    List(std::slice::Iter<'a, Value>),
    Single(Option<&'a Fields>),
    Count(usize),
}

impl Iterator for DefinitionEntries<'_> {
    type Item = Fields;

    fn next(&mut self) -> Option<Fields> {
        match &mut self.entries {
            Entries::List(items) => items.find_map(Value::as_map).cloned(),
            Entries::Single(fields) => fields.take().cloned(),
            Entries::Count(remaining) => {
                *remaining = remaining.checked_sub(1)?;
                Some(Fields::new())
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = match &self.entries {
            Entries::List(items) => items.len(),
            Entries::Single(fields) => usize::from(fields.is_some()),
            Entries::Count(remaining) => *remaining,
        };
        (len, Some(len))
    }
}

impl ExactSizeIterator for DefinitionEntries<'_> {}
