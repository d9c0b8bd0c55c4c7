mod common;

use common::{actor, genre, movie};
use pretty_assertions::assert_eq;
use scenarious::{HandlerRegistry, ScenarioError};
use scenarious_model::{EntitySchema, HandlerError, RecordHandler};
use std::rc::Rc;

#[test]
fn single_name_also_registers_plural() {
    let mut registry = HandlerRegistry::new();
    registry.register(Rc::new(actor())).unwrap();

    assert!(registry.contains("actor"));
    assert!(registry.contains("actors"));
    assert_eq!(registry.canonical("actors").unwrap(), "actor");
}

#[test]
fn declared_names_are_used_as_is() {
    let mut registry = HandlerRegistry::new();
    registry.register(Rc::new(movie())).unwrap();

    for name in ["movie", "movies", "film", "films"] {
        assert_eq!(registry.canonical(name).unwrap(), "movie", "{name}");
    }
    assert!(!registry.contains("filmss"));
}

#[test]
fn duplicate_spelling_is_rejected_atomically() {
    let mut registry = HandlerRegistry::new();
    registry.register(Rc::new(movie())).unwrap();

    let clash = RecordHandler::new(EntitySchema::new("cinema").with_names(["cinema", "films"]));
    let err = registry.register(Rc::new(clash)).unwrap_err();

    assert!(matches!(err, ScenarioError::DuplicateTypeName(ref name) if name == "films"));
    assert!(!registry.contains("cinema"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn invalid_schema_is_rejected() {
    let mut registry = HandlerRegistry::new();
    let handler = RecordHandler::new(EntitySchema::new("actor").default_value("name", "A").require("name"));
    let err = registry.register(Rc::new(handler)).unwrap_err();
    assert!(matches!(err, ScenarioError::Handler(HandlerError::InvalidDefault { .. })));
    assert!(registry.is_empty());
}

#[test]
fn unknown_names() {
    let mut registry = HandlerRegistry::new();
    registry.register(Rc::new(genre())).unwrap();

    assert!(registry.get("actor").is_none());
    assert!(matches!(registry.handler("actor"), Err(ScenarioError::UnknownType(_))));
    assert!(matches!(registry.canonical("actor"), Err(ScenarioError::UnknownType(_))));
}

#[test]
fn type_names_in_registration_order() {
    let mut registry = HandlerRegistry::new();
    registry.register(Rc::new(genre())).unwrap();
    registry.register(Rc::new(actor())).unwrap();
    assert_eq!(registry.type_names().collect::<Vec<_>>(), vec!["genre", "actor"]);
}
