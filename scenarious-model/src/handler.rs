use crate::datetime::parse_datetime;
use crate::error::{HandlerError, HandlerResult};
use crate::EntitySchema;
use chrono::{DateTime, Utc};
use scenarious_types::{Entity, EntityRef, Fields, Value};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Prefix marking a definition field as a deferred method call.
pub const METHOD_MARKER: &str = "_";

/// A post-construction call: receives the new entity and its arguments.
pub type SpecialMethod = Rc<dyn Fn(&EntityRef, &[Value]) -> HandlerResult<()>>;

/// Named special methods owned by a handler.
#[derive(Clone, Default)]
pub struct SpecialMethods(HashMap<String, SpecialMethod>);

impl SpecialMethods {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        method: impl Fn(&EntityRef, &[Value]) -> HandlerResult<()> + 'static,
    ) {
        self.0.insert(name.into(), Rc::new(method));
    }

    pub fn get(&self, name: &str) -> Option<SpecialMethod> {
        self.0.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Debug for SpecialMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

/// Turns raw field mappings of one entity type into entities.
///
/// Only [`TypeHandler::schema`] and [`TypeHandler::do_create`] must be
/// implemented. The provided [`TypeHandler::create`] runs the full pipeline:
///
/// 1. [`validate_data`](TypeHandler::validate_data): every required field present
/// 2. schema defaults, providers invoked per entity
/// 3. caller fields overlay the defaults
/// 4. [`derive_fields`](TypeHandler::derive_fields) output overlays everything
/// 5. [`clean_data`](TypeHandler::clean_data), then [`format_data`](TypeHandler::format_data)
/// 6. [`do_create`](TypeHandler::do_create)
pub trait TypeHandler {
    /// The declared names and fields of this type.
    fn schema(&self) -> &EntitySchema;

    /// Builds the domain object from the final field mapping.
    fn do_create(&self, data: Fields) -> HandlerResult<Entity>;

    /// The canonical type name.
    fn type_name(&self) -> &str {
        self.schema().canonical_name()
    }

    /// Required field names, own and inherited.
    fn requirements(&self) -> Vec<&str> {
        self.schema().requirements()
    }

    /// Fails listing every required field absent from `data`.
    fn validate_data(&self, data: &Fields) -> HandlerResult<()> {
        let missing: Vec<String> = self
            .requirements()
            .into_iter()
            .filter(|field| !data.contains_key(*field))
            .map(str::to_string)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(HandlerError::MissingRequiredFields {
                entity_type: self.type_name().to_string(),
                fields: missing,
            })
        }
    }

    /// Whether a definition field denotes a deferred method call.
    fn is_method(&self, field: &str) -> bool {
        field.starts_with(METHOD_MARKER)
    }

    /// Looks up a special method by its bare name (without the marker).
    fn special_method(&self, name: &str) -> Option<SpecialMethod> {
        let _ = name;
        None
    }

    /// Resolves a marked definition field to its special method.
    fn get_special_method(&self, field: &str) -> HandlerResult<SpecialMethod> {
        let name = field.strip_prefix(METHOD_MARKER).unwrap_or(field);
        self.special_method(name)
            .ok_or_else(|| HandlerError::UnknownMethod {
                entity_type: self.type_name().to_string(),
                method: name.to_string(),
            })
    }

    /// Fields the handler computes from the caller's fields. These win over
    /// both defaults and caller fields.
    fn derive_fields(&self, fields: &Fields) -> HandlerResult<Fields> {
        let _ = fields;
        Ok(Fields::new())
    }

    /// Drops or rejects fields the created object would not hold. Strict
    /// schemas reject anything that is not declared.
    fn clean_data(&self, data: &mut Fields) -> HandlerResult<()> {
        let schema = self.schema();
        if !schema.strict {
            return Ok(());
        }
        match data.keys().find(|k| !schema.is_declared(k)) {
            Some(field) => Err(HandlerError::UnknownField {
                entity_type: self.type_name().to_string(),
                field: field.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Whether text values of `attr` should be parsed as timestamps.
    fn is_datetime_attribute(&self, attr: &str) -> bool {
        self.schema()
            .field_spec(attr)
            .is_some_and(|f| f.field_type == crate::FieldType::DateTime)
    }

    fn parse_date(&self, field: &str, text: &str) -> HandlerResult<DateTime<Utc>> {
        parse_datetime(text).ok_or_else(|| HandlerError::InvalidDate {
            entity_type: self.type_name().to_string(),
            field: field.to_string(),
            value: text.to_string(),
        })
    }

    /// Coerces text values of date/time attributes into timestamps.
    fn format_data(&self, data: &mut Fields) -> HandlerResult<()> {
        for (field, value) in data.iter_mut() {
            if let Value::Str(text) = value {
                if self.is_datetime_attribute(field) {
                    *value = Value::DateTime(self.parse_date(field, text)?);
                }
            }
        }
        Ok(())
    }

    /// Creates one entity from caller-supplied fields.
    fn create(&self, fields: Fields) -> HandlerResult<EntityRef> {
        self.validate_data(&fields)?;

        let derived = self.derive_fields(&fields)?;
        let mut data = self.schema().defaults();
        data.extend(fields);
        data.extend(derived);

        self.clean_data(&mut data)?;
        self.format_data(&mut data)?;

        Ok(EntityRef::new(self.do_create(data)?))
    }
}
