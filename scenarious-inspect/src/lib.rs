//! Schema-less handlers and the JSON summary printed by the inspector.

use scenarious::{Scenario, Source, SourceError};
use scenarious_model::{EntitySchema, RecordHandler, TypeHandler};
use scenarious_types::{EntityKey, Value};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScenarioSummary {
    pub types: Vec<TypeSummary>,
}

impl ScenarioSummary {
    pub fn entity_count(&self) -> usize {
        self.types.iter().map(|t| t.count).sum()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TypeSummary {
    pub entity_type: String,
    pub count: usize,
    pub entities: Vec<EntitySummary>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EntitySummary {
    pub identifier: EntityKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub fields: serde_json::Value,
}

/// Guesses the singular spelling of a type key (`actors` -> `actor`).
pub fn singular(name: &str) -> &str {
    match name.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Type keys of every source, singularised, in first-seen order.
pub fn collect_type_names(sources: &[Source]) -> Result<Vec<String>, SourceError> {
    let mut names: Vec<String> = Vec::new();
    for source in sources {
        for key in source.read()?.keys() {
            let name = singular(key);
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

/// One permissive record handler per type: no requirements, no defaults.
pub fn schemaless_handlers(names: &[String]) -> Vec<Rc<dyn TypeHandler>> {
    names
        .iter()
        .map(|name| Rc::new(RecordHandler::new(EntitySchema::new(name))) as Rc<dyn TypeHandler>)
        .collect()
}

/// Describes every loaded type. Entity values are rendered back into
/// reference syntax, e.g. `"$actor_1"`.
pub fn summarize(scenario: &Scenario) -> ScenarioSummary {
    let sigil = scenario.config().reference_sigil.clone();
    let store = scenario.store();

    let types = store
        .types()
        .map(|entity_type| {
            let collection = store.entries(entity_type);
            let entities = collection
                .keys()
                .zip(collection.iter())
                .map(|(key, entity)| EntitySummary {
                    identifier: key.clone(),
                    alias: store.alias_of(entity_type, entity),
                    fields: render(scenario, &sigil, &Value::Map(entity.borrow().fields.clone())),
                })
                .collect::<Vec<_>>();
            TypeSummary {
                entity_type: entity_type.to_string(),
                count: entities.len(),
                entities,
            }
        })
        .collect();

    ScenarioSummary { types }
}

fn render(scenario: &Scenario, sigil: &str, value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => Json::from(*n),
        Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Str(s) => Json::String(s.clone()),
        Value::DateTime(dt) => Json::String(dt.to_rfc3339()),
        Value::List(items) => Json::Array(items.iter().map(|v| render(scenario, sigil, v)).collect()),
        Value::Map(fields) => Json::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), render(scenario, sigil, v)))
                .collect(),
        ),
        Value::Entity(entity) => {
            let entity_type = entity.entity_type();
            match scenario.identifier_of(&entity_type, entity) {
                Some(key) => Json::String(format!("{sigil}{entity_type}_{key}")),
                None => Json::String(format!("<{entity_type}>")),
            }
        }
    }
}
