use pretty_assertions::assert_eq;
use scenarious_model::{
    defaults, DefaultValue, EntitySchema, FieldSpec, FieldType, HandlerError,
};
use scenarious_types::Value;
use std::cell::Cell;
use std::rc::Rc;

// ── FieldSpec constructors ───────────────────────────────────────

#[test]
fn required_field_has_no_default() {
    let f = FieldSpec::required("name");
    assert_eq!(f.name, "name");
    assert!(f.required);
    assert!(f.default.is_none());
    assert_eq!(f.field_type, FieldType::Any);
}

#[test]
fn optional_field_is_neither_required_nor_defaulted() {
    let f = FieldSpec::optional("nickname");
    assert!(!f.required);
    assert!(f.default.is_none());
}

#[test]
fn fixed_default_produces_same_value() {
    let f = FieldSpec::with_default("age", 30);
    let d = f.default.unwrap();
    assert_eq!(d.produce(), Value::Int(30));
    assert_eq!(d.produce(), Value::Int(30));
}

#[test]
fn typed_sets_field_type() {
    let f = FieldSpec::optional("born").typed(FieldType::DateTime);
    assert_eq!(f.field_type, FieldType::DateTime);
}

#[test]
fn field_type_serde_uses_snake_case() {
    let json = serde_json::to_string(&FieldType::DateTime).unwrap();
    assert_eq!(json, "\"date_time\"");
}

// ── EntitySchema ─────────────────────────────────────────────────

fn film_schema() -> EntitySchema {
    EntitySchema::new("film")
        .require("title")
        .require("genre")
        .default_value("actor", Value::Null)
}

#[test]
fn schema_canonical_name_is_first_spelling() {
    let s = EntitySchema::new("person").with_names(["person", "people"]);
    assert_eq!(s.canonical_name(), "person");
    assert_eq!(s.type_names, vec!["person", "people"]);
}

#[test]
fn with_names_ignores_empty_list() {
    let s = EntitySchema::new("person").with_names(Vec::<String>::new());
    assert_eq!(s.type_names, vec!["person"]);
}

#[test]
fn requirements_in_declaration_order() {
    let s = film_schema();
    assert_eq!(s.requirements(), vec!["title", "genre"]);
}

#[test]
fn extends_unions_ancestor_requirements() {
    let movie = EntitySchema::new("movie").require("year").extends(&film_schema());
    assert_eq!(movie.requirements(), vec!["title", "genre", "year"]);
    assert_eq!(movie.canonical_name(), "movie");
}

#[test]
fn extends_keeps_ancestor_defaults() {
    let movie = EntitySchema::new("movie").require("year").extends(&film_schema());
    let defaults = movie.defaults();
    assert_eq!(defaults.get("actor"), Some(&Value::Null));
}

#[test]
fn own_default_overrides_ancestor_default() {
    let base = EntitySchema::new("base").default_value("rating", 1);
    let child = EntitySchema::new("child").default_value("rating", 5).extends(&base);
    assert_eq!(child.defaults().get("rating"), Some(&Value::Int(5)));
    assert_eq!(child.fields.len(), 1);
}

#[test]
fn extends_inherits_strictness() {
    let base = EntitySchema::new("base").strict();
    let child = EntitySchema::new("child").extends(&base);
    assert!(child.strict);
}

#[test]
fn field_declared_twice_keeps_one_entry() {
    let s = EntitySchema::new("x").optional("a").require("a");
    assert_eq!(s.fields.len(), 1);
    assert!(s.fields[0].required);
}

// ── validate ─────────────────────────────────────────────────────

#[test]
fn validate_accepts_disjoint_required_and_defaults() {
    assert!(film_schema().validate().is_ok());
}

#[test]
fn validate_rejects_required_field_with_default() {
    let s = EntitySchema::new("actor")
        .require("name")
        .default_with("name", || Value::from("test name"));
    let err = s.validate().unwrap_err();
    match err {
        HandlerError::InvalidDefault { entity_type, field } => {
            assert_eq!(entity_type, "actor");
            assert_eq!(field, "name");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn validate_rejects_child_requiring_an_ancestor_default() {
    let base = EntitySchema::new("base").default_value("name", "x");
    let child = EntitySchema::new("child").require("name").extends(&base);
    assert!(matches!(
        child.validate(),
        Err(HandlerError::InvalidDefault { .. })
    ));
}

// ── defaults ─────────────────────────────────────────────────────

#[test]
fn providers_are_invoked_per_call() {
    let counter = Rc::new(Cell::new(0));
    let c = Rc::clone(&counter);
    let s = EntitySchema::new("ticket").default_with("number", move || {
        c.set(c.get() + 1);
        Value::Int(c.get())
    });

    assert_eq!(s.defaults()["number"], Value::Int(1));
    assert_eq!(s.defaults()["number"], Value::Int(2));
    assert_eq!(counter.get(), 2);
}

#[test]
fn defaults_follow_declaration_order() {
    let s = EntitySchema::new("x")
        .default_value("b", 1)
        .require("a")
        .default_value("c", 2);
    let keys: Vec<String> = s.defaults().keys().cloned().collect();
    assert_eq!(keys, vec!["b".to_string(), "c".to_string()]);
}

#[test]
fn default_from_accepts_ready_made_providers() {
    let s = EntitySchema::new("genre").default_from("name", defaults::one_of(["drama"]));
    assert_eq!(s.defaults()["name"], Value::from("drama"));
    assert!(matches!(
        s.field_spec("name").unwrap().default,
        Some(DefaultValue::Provider(_))
    ));
}
