use crate::error::{HandlerError, HandlerResult};
use crate::handler::{SpecialMethod, SpecialMethods, TypeHandler};
use crate::EntitySchema;
use scenarious_types::{Entity, EntityRef, Fields, Value};
use std::fmt;
use std::rc::Rc;

type Deriver = Rc<dyn Fn(&Fields) -> HandlerResult<Fields>>;

/// Stock handler that stores the final field mapping on an [`Entity`].
///
/// Covers the common case of fixture types that are plain records. Special
/// methods and derived fields are attached with the builder methods.
///
/// ```
/// use scenarious_model::{EntitySchema, RecordHandler, TypeHandler};
/// use scenarious_types::fields;
///
/// let actors = RecordHandler::new(EntitySchema::new("actor").require("name").default_value("age", 30));
/// let actor = actors.create(fields! { "name" => "Ada" }).unwrap();
/// assert_eq!(actor.get_i64("age"), Some(30));
/// ```
#[derive(Clone)]
pub struct RecordHandler {
    schema: EntitySchema,
    methods: SpecialMethods,
    deriver: Option<Deriver>,
}

impl RecordHandler {
    pub fn new(schema: EntitySchema) -> Self {
        Self {
            schema,
            methods: SpecialMethods::new(),
            deriver: None,
        }
    }

    /// Registers a special method, invoked for `_<name>` definition fields.
    #[must_use]
    pub fn with_method(
        mut self,
        name: &str,
        method: impl Fn(&EntityRef, &[Value]) -> HandlerResult<()> + 'static,
    ) -> Self {
        self.methods.register(name, method);
        self
    }

    /// Registers a special method that stores its single argument in `field`.
    ///
    /// `_set_lead: $actor_1` with `with_setter("set_lead", "lead")` sets the
    /// new entity's `lead` field to actor 1 after construction.
    #[must_use]
    pub fn with_setter(self, name: &str, field: &str) -> Self {
        let entity_type = self.schema.canonical_name().to_string();
        let method = name.to_string();
        let field = field.to_string();
        self.with_method(name, move |entity, args| match args {
            [value] => {
                entity.set(field.clone(), value.clone());
                Ok(())
            }
            _ => Err(HandlerError::InvalidArgument {
                entity_type: entity_type.clone(),
                method: method.clone(),
                detail: format!("expected 1 argument, got {}", args.len()),
            }),
        })
    }

    /// Registers a special method that appends its arguments to the list in
    /// `field`, creating the list when absent.
    #[must_use]
    pub fn with_appender(self, name: &str, field: &str) -> Self {
        let field = field.to_string();
        self.with_method(name, move |entity, args| {
            let mut entity = entity.borrow_mut();
            let slot = entity
                .fields
                .entry(field.clone())
                .or_insert_with(|| Value::List(Vec::new()));
            match slot {
                Value::List(items) => items.extend(args.iter().cloned()),
                other => {
                    let previous = std::mem::take(other);
                    let mut items = vec![previous];
                    items.extend(args.iter().cloned());
                    *other = Value::List(items);
                }
            }
            Ok(())
        })
    }

    /// Computes extra fields from the caller's fields; they override defaults
    /// and caller values.
    #[must_use]
    pub fn with_derived(mut self, deriver: impl Fn(&Fields) -> HandlerResult<Fields> + 'static) -> Self {
        self.deriver = Some(Rc::new(deriver));
        self
    }

    pub fn methods(&self) -> &SpecialMethods {
        &self.methods
    }
}

impl TypeHandler for RecordHandler {
    fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    fn special_method(&self, name: &str) -> Option<SpecialMethod> {
        self.methods.get(name)
    }

    fn derive_fields(&self, fields: &Fields) -> HandlerResult<Fields> {
        match &self.deriver {
            Some(deriver) => deriver(fields),
            None => Ok(Fields::new()),
        }
    }

    fn do_create(&self, data: Fields) -> HandlerResult<Entity> {
        Ok(Entity::new(self.schema.canonical_name(), data))
    }
}

impl fmt::Debug for RecordHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordHandler")
            .field("schema", &self.schema)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}
