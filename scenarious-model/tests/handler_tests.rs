use chrono::{Datelike, Utc};
use scenarious_model::{
    EntitySchema, FieldSpec, FieldType, HandlerError, HandlerResult, RecordHandler, TypeHandler,
};
use scenarious_types::{fields, Entity, EntityRef, Fields, Value};
use std::cell::Cell;
use std::rc::Rc;

fn actor_handler() -> RecordHandler {
    RecordHandler::new(
        EntitySchema::new("actor")
            .require("name")
            .default_value("age", 30),
    )
}

// ── Default implementations ──────────────────────────────────────

struct BareHandler {
    schema: EntitySchema,
}

impl TypeHandler for BareHandler {
    fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    fn do_create(&self, data: Fields) -> HandlerResult<Entity> {
        Ok(Entity::new("bare", data))
    }
}

#[test]
fn default_type_name_is_canonical_name() {
    let h = BareHandler { schema: EntitySchema::new("bare").with_names(["bare", "bares"]) };
    assert_eq!(h.type_name(), "bare");
}

#[test]
fn default_is_method_uses_underscore_marker() {
    let h = BareHandler { schema: EntitySchema::new("bare") };
    assert!(h.is_method("_set_actor"));
    assert!(!h.is_method("actor"));
}

#[test]
fn default_special_method_is_unknown() {
    let h = BareHandler { schema: EntitySchema::new("bare") };
    let err = h.get_special_method("_anything").err().unwrap();
    assert_eq!(err.to_string(), "bare: no special method named 'anything'");
}

#[test]
fn default_clean_data_is_permissive() {
    let h = BareHandler { schema: EntitySchema::new("bare") };
    let mut data = fields! { "whatever" => 1 };
    assert!(h.clean_data(&mut data).is_ok());
    assert_eq!(data.len(), 1);
}

#[test]
fn default_is_datetime_attribute_is_false_for_untyped() {
    let h = BareHandler { schema: EntitySchema::new("bare").optional("when") };
    assert!(!h.is_datetime_attribute("when"));
    assert!(!h.is_datetime_attribute("unknown"));
}

// ── validate_data ────────────────────────────────────────────────

#[test]
fn validate_data_accepts_complete_data() {
    assert!(actor_handler().validate_data(&fields! { "name" => "A" }).is_ok());
}

#[test]
fn validate_data_lists_every_missing_field() {
    let h = RecordHandler::new(EntitySchema::new("movie").require("title").require("genre").require("year"));
    let err = h.validate_data(&fields! { "genre" => "drama" }).unwrap_err();
    match err {
        HandlerError::MissingRequiredFields { entity_type, fields } => {
            assert_eq!(entity_type, "movie");
            assert_eq!(fields, vec!["title".to_string(), "year".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_fields_message_is_readable() {
    let err = actor_handler().validate_data(&fields! { "age" => 30 }).unwrap_err();
    assert_eq!(err.to_string(), "actor: required fields 'name' are missing");
}

// ── create pipeline ──────────────────────────────────────────────

#[test]
fn create_applies_defaults() {
    let actor = actor_handler().create(fields! { "name" => "A" }).unwrap();
    assert_eq!(actor.get_str("name").as_deref(), Some("A"));
    assert_eq!(actor.get_i64("age"), Some(30));
    assert_eq!(actor.entity_type(), "actor");
}

#[test]
fn caller_fields_win_over_defaults() {
    let actor = actor_handler().create(fields! { "name" => "A", "age" => 20 }).unwrap();
    assert_eq!(actor.get_i64("age"), Some(20));
}

#[test]
fn derived_fields_win_over_caller_fields() {
    let h = actor_handler().with_derived(|fields| {
        let name = fields.get("name").and_then(Value::as_str).unwrap_or_default();
        Ok(fields! { "slug" => name.to_lowercase(), "age" => 99 })
    });
    let actor = h.create(fields! { "name" => "Ada", "age" => 20 }).unwrap();
    assert_eq!(actor.get_str("slug").as_deref(), Some("ada"));
    assert_eq!(actor.get_i64("age"), Some(99));
}

#[test]
fn create_fails_without_required_field() {
    let err = actor_handler().create(Fields::new()).unwrap_err();
    assert!(matches!(err, HandlerError::MissingRequiredFields { .. }));
}

#[test]
fn providers_give_each_entity_a_fresh_value() {
    let next = Rc::new(Cell::new(0));
    let n = Rc::clone(&next);
    let h = RecordHandler::new(EntitySchema::new("ticket").default_with("number", move || {
        n.set(n.get() + 1);
        Value::Int(n.get())
    }));
    let a = h.create(Fields::new()).unwrap();
    let b = h.create(Fields::new()).unwrap();
    assert_eq!(a.get_i64("number"), Some(1));
    assert_eq!(b.get_i64("number"), Some(2));
}

#[test]
fn create_keeps_field_order_defaults_first() {
    let h = RecordHandler::new(EntitySchema::new("x").default_value("d", 1));
    let e = h.create(fields! { "a" => 2 }).unwrap();
    let keys: Vec<String> = e.borrow().fields.keys().cloned().collect();
    assert_eq!(keys, vec!["d".to_string(), "a".to_string()]);
}

// ── strict schemas ───────────────────────────────────────────────

fn strict_movie() -> RecordHandler {
    RecordHandler::new(
        EntitySchema::new("movie")
            .require("title")
            .optional("actor")
            .field(FieldSpec::optional("released").typed(FieldType::DateTime))
            .strict(),
    )
}

#[test]
fn strict_schema_accepts_declared_fields() {
    let movie = strict_movie().create(fields! { "title" => "M", "actor" => Value::Null }).unwrap();
    assert_eq!(movie.get_str("title").as_deref(), Some("M"));
}

#[test]
fn strict_schema_rejects_unknown_field() {
    let err = strict_movie().create(fields! { "title" => "M", "budget" => 10 }).unwrap_err();
    match err {
        HandlerError::UnknownField { entity_type, field } => {
            assert_eq!(entity_type, "movie");
            assert_eq!(field, "budget");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ── date/time formatting ─────────────────────────────────────────

#[test]
fn datetime_text_is_parsed() {
    let movie = strict_movie()
        .create(fields! { "title" => "M", "released" => "2018-06-01" })
        .unwrap();
    let released = movie.borrow().get("released").and_then(Value::as_datetime).unwrap();
    assert_eq!(released.year(), 2018);
    assert_eq!(released.month(), 6);
}

#[test]
fn datetime_values_pass_through() {
    let now = Utc::now();
    let movie = strict_movie()
        .create(fields! { "title" => "M", "released" => now })
        .unwrap();
    assert_eq!(movie.borrow().get("released"), Some(&Value::DateTime(now)));
}

#[test]
fn unparseable_datetime_fails() {
    let err = strict_movie()
        .create(fields! { "title" => "M", "released" => "soon" })
        .unwrap_err();
    assert!(matches!(err, HandlerError::InvalidDate { ref value, .. } if value == "soon"));
}

#[test]
fn overridden_datetime_hook_is_used() {
    struct StampHandler {
        schema: EntitySchema,
    }
    impl TypeHandler for StampHandler {
        fn schema(&self) -> &EntitySchema {
            &self.schema
        }
        fn is_datetime_attribute(&self, attr: &str) -> bool {
            attr.ends_with("_at")
        }
        fn do_create(&self, data: Fields) -> HandlerResult<Entity> {
            Ok(Entity::new("stamp", data))
        }
    }

    let h = StampHandler { schema: EntitySchema::new("stamp") };
    let e = h.create(fields! { "created_at" => "2001-02-03 04:05:06", "label" => "2001-02-03" }).unwrap();
    assert!(matches!(e.borrow().get("created_at"), Some(Value::DateTime(_))));
    assert!(matches!(e.borrow().get("label"), Some(Value::Str(_))));
}

// ── special methods ──────────────────────────────────────────────

#[test]
fn setter_method_stores_argument() {
    let h = actor_handler().with_setter("set_partner", "partner");
    let a = h.create(fields! { "name" => "A" }).unwrap();
    let b = h.create(fields! { "name" => "B" }).unwrap();

    let method = h.get_special_method("_set_partner").unwrap();
    method(&a, &[Value::Entity(b.clone())]).unwrap();

    assert_eq!(a.get_entity("partner"), Some(b));
}

#[test]
fn setter_method_rejects_wrong_arity() {
    let h = actor_handler().with_setter("set_partner", "partner");
    let a = h.create(fields! { "name" => "A" }).unwrap();
    let method = h.get_special_method("_set_partner").unwrap();
    let err = method(&a, &[]).unwrap_err();
    assert!(matches!(err, HandlerError::InvalidArgument { .. }));
}

#[test]
fn appender_method_collects_arguments() {
    let h = actor_handler().with_appender("add_tags", "tags");
    let a = h.create(fields! { "name" => "A" }).unwrap();
    let method = h.get_special_method("_add_tags").unwrap();
    method(&a, &[Value::from("x"), Value::from("y")]).unwrap();
    method(&a, &[Value::from("z")]).unwrap();
    assert_eq!(
        a.attribute("tags"),
        Some(Value::List(vec!["x".into(), "y".into(), "z".into()]))
    );
}

#[test]
fn custom_method_sees_new_entity() {
    let h = actor_handler().with_method("rename", |entity: &EntityRef, args: &[Value]| {
        let name = args.first().and_then(Value::as_str).unwrap_or("?").to_uppercase();
        entity.set("name", name);
        Ok(())
    });
    let a = h.create(fields! { "name" => "a" }).unwrap();
    h.get_special_method("_rename").unwrap()(&a, &[Value::from("bob")]).unwrap();
    assert_eq!(a.get_str("name").as_deref(), Some("BOB"));
}

#[test]
fn registered_methods_are_listed() {
    let h = actor_handler().with_setter("set_partner", "partner");
    let names: Vec<&str> = h.methods().names().collect();
    assert_eq!(names, vec!["set_partner"]);
}
