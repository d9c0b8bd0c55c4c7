use crate::error::{HandlerError, HandlerResult};
use scenarious_types::{Fields, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Zero-argument function producing a fresh default per entity.
pub type Provider = Rc<dyn Fn() -> Value>;

/// How a field gets a value when the definition omits it.
#[derive(Clone)]
pub enum DefaultValue {
    /// The same value for every entity.
    Fixed(Value),
    /// Invoked once per entity; never memoised.
    Provider(Provider),
}

impl DefaultValue {
    /// Produces the value for one entity.
    #[must_use]
    pub fn produce(&self) -> Value {
        match self {
            Self::Fixed(value) => value.clone(),
            Self::Provider(provider) => provider(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// The data type of a declared field.
///
/// Only [`FieldType::DateTime`] changes behaviour today: text values of
/// such fields are parsed into timestamps before construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Any,
    Text,
    Number,
    Bool,
    DateTime,
    Relation,
    List,
    Json,
}

/// One declared field of an entity type.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub required: bool,
    pub default: Option<DefaultValue>,
    pub field_type: FieldType,
}

impl FieldSpec {
    fn simple(name: &str, required: bool, default: Option<DefaultValue>) -> Self {
        Self {
            name: name.into(),
            required,
            default,
            field_type: FieldType::Any,
        }
    }

    /// Shorthand for a field every definition must supply.
    pub fn required(name: &str) -> Self {
        Self::simple(name, true, None)
    }

    /// Shorthand for a declared field with no default.
    pub fn optional(name: &str) -> Self {
        Self::simple(name, false, None)
    }

    /// Shorthand for a field with a constant default.
    pub fn with_default(name: &str, value: impl Into<Value>) -> Self {
        Self::simple(name, false, Some(DefaultValue::Fixed(value.into())))
    }

    /// Shorthand for a field whose default is produced per entity.
    pub fn with_provider(name: &str, provider: impl Fn() -> Value + 'static) -> Self {
        Self::simple(name, false, Some(DefaultValue::Provider(Rc::new(provider))))
    }

    /// Sets the field's data type.
    #[must_use]
    pub fn typed(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    // Layers a later declaration of the same field over this one. Flags are
    // unioned so that a conflict introduced by either layer stays visible.
    fn merge(&mut self, other: FieldSpec) {
        self.required |= other.required;
        if other.default.is_some() {
            self.default = other.default;
        }
        if other.field_type != FieldType::Any {
            self.field_type = other.field_type;
        }
    }
}

/// Declares an entity type: its accepted names and its fields.
///
/// Derived types are expressed by [`EntitySchema::extends`], which flattens
/// the parent's fields into this schema once, at declaration time.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    /// Accepted spellings; the first is canonical.
    pub type_names: Vec<String>,
    /// Flattened declarations, ancestors first.
    pub fields: Vec<FieldSpec>,
    /// Reject fields that are not declared.
    pub strict: bool,
}

impl EntitySchema {
    /// A schema with a single canonical name and no fields.
    pub fn new(type_name: &str) -> Self {
        Self {
            type_names: vec![type_name.to_string()],
            fields: Vec::new(),
            strict: false,
        }
    }

    /// Replaces the accepted spellings. The first one becomes canonical.
    #[must_use]
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if !names.is_empty() {
            self.type_names = names;
        }
        self
    }

    /// Inherits every field of `parent`, placed before this schema's own.
    #[must_use]
    pub fn extends(mut self, parent: &EntitySchema) -> Self {
        let own = std::mem::replace(&mut self.fields, parent.fields.clone());
        for spec in own {
            self.upsert(spec);
        }
        self.strict |= parent.strict;
        self
    }

    /// Adds a field declaration, layering over an earlier one of the same name.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.upsert(spec);
        self
    }

    #[must_use]
    pub fn require(self, name: &str) -> Self {
        self.field(FieldSpec::required(name))
    }

    #[must_use]
    pub fn optional(self, name: &str) -> Self {
        self.field(FieldSpec::optional(name))
    }

    #[must_use]
    pub fn default_value(self, name: &str, value: impl Into<Value>) -> Self {
        self.field(FieldSpec::with_default(name, value))
    }

    #[must_use]
    pub fn default_with(self, name: &str, provider: impl Fn() -> Value + 'static) -> Self {
        self.field(FieldSpec::with_provider(name, provider))
    }

    /// Adds a field with a ready-made default, e.g. from [`crate::defaults`].
    #[must_use]
    pub fn default_from(self, name: &str, default: DefaultValue) -> Self {
        self.field(FieldSpec::simple(name, false, Some(default)))
    }

    /// Makes the handler reject undeclared fields.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    fn upsert(&mut self, spec: FieldSpec) {
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => existing.merge(spec),
            None => self.fields.push(spec),
        }
    }

    /// The canonical type name.
    pub fn canonical_name(&self) -> &str {
        self.type_names.first().map(String::as_str).unwrap_or_default()
    }

    /// Every required field name, own and inherited, in declaration order.
    pub fn requirements(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect()
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.field_spec(name).is_some()
    }

    /// Checks that no field is both required and defaulted.
    pub fn validate(&self) -> HandlerResult<()> {
        match self.fields.iter().find(|f| f.required && f.default.is_some()) {
            Some(spec) => Err(HandlerError::InvalidDefault {
                entity_type: self.canonical_name().to_string(),
                field: spec.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Produces the default fields for one entity, invoking providers afresh.
    pub fn defaults(&self) -> Fields {
        self.fields
            .iter()
            .filter_map(|f| f.default.as_ref().map(|d| (f.name.clone(), d.produce())))
            .collect()
    }
}
