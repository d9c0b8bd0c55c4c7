//! Handlers shared by the integration tests.

#![allow(dead_code)]

use scenarious::{Scenario, ScenarioResult, Source};
use scenarious_model::{
    defaults, EntitySchema, FieldSpec, FieldType, HandlerError, RecordHandler, TypeHandler,
};
use scenarious_types::{Entity, Fields, Value};
use std::rc::Rc;

pub const GENRE_NAMES: [&str; 3] = ["drama", "comedy", "horror"];

pub fn actor() -> RecordHandler {
    RecordHandler::new(EntitySchema::new("actor").require("name").default_value("age", 30))
}

/// Accepts `movie`, `movies`, `film` and `films`.
pub fn movie() -> RecordHandler {
    RecordHandler::new(
        EntitySchema::new("movie")
            .with_names(["movie", "movies", "film", "films"])
            .require("title")
            .optional("actor"),
    )
    .with_setter("set_lead", "lead")
    .with_appender("add_cast", "cast")
    .with_method("rate", |entity, args| {
        entity.set("rating", args.first().cloned().unwrap_or_default());
        Ok(())
    })
}

pub fn genre() -> RecordHandler {
    RecordHandler::new(EntitySchema::new("genre").default_from("name", defaults::one_of(GENRE_NAMES)))
}

fn media() -> EntitySchema {
    EntitySchema::new("media")
        .require("title")
        .default_value("language", "en")
}

/// Strict handler with a date/time field, inheriting from a media schema.
pub fn tvshow() -> RecordHandler {
    RecordHandler::new(
        EntitySchema::new("tvshow")
            .extends(&media())
            .field(FieldSpec::optional("aired").typed(FieldType::DateTime))
            .require("seasons")
            .strict(),
    )
}

/// A handler with its own domain logic instead of a plain record.
pub struct ReviewHandler {
    schema: EntitySchema,
}

impl ReviewHandler {
    pub fn new() -> Self {
        Self {
            schema: EntitySchema::new("review").require("movie").require("stars"),
        }
    }
}

impl TypeHandler for ReviewHandler {
    fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    fn derive_fields(&self, fields: &Fields) -> Result<Fields, HandlerError> {
        let stars = fields.get("stars").and_then(Value::as_i64).unwrap_or_default();
        let mut derived = Fields::new();
        derived.insert("positive".into(), Value::Bool(stars >= 3));
        Ok(derived)
    }

    fn do_create(&self, data: Fields) -> Result<Entity, HandlerError> {
        if data.get("movie").and_then(Value::as_entity).is_none() {
            return Err(HandlerError::Construction {
                entity_type: "review".into(),
                message: "a review needs a movie entity".into(),
            });
        }
        Ok(Entity::new("review", data))
    }
}

pub fn handlers() -> Vec<Rc<dyn TypeHandler>> {
    vec![
        Rc::new(actor()),
        Rc::new(movie()),
        Rc::new(genre()),
        Rc::new(tvshow()),
        Rc::new(ReviewHandler::new()),
    ]
}

pub fn load(source: impl Into<Source>) -> ScenarioResult<Scenario> {
    Scenario::builder().handlers(handlers()).source(source).load()
}

pub fn json(value: serde_json::Value) -> Source {
    Source::Mapping(value)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("scenarious=debug")
        .with_test_writer()
        .try_init();
}
