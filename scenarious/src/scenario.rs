//! Scenario building: ordering, reference resolution and deferred calls.

use crate::config::ScenarioConfig;
use crate::error::{ConfigError, ResolveError, ScenarioError, ScenarioResult};
use crate::reference::{Reference, ReferenceResolver};
use crate::registry::HandlerRegistry;
use crate::source::{definition_entries, RawScenarioData, Source};
use scenarious_model::{SpecialMethod, TypeHandler};
use scenarious_store::{EntityCollection, EntityStore};
use scenarious_types::{alias_from_value, EntityIdentifier, EntityKey, EntityRef, Fields, Value};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Per-type progress through a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    /// Entities of the type are being created; references to it only see
    /// the ones created so far.
    Loading,
    Loaded,
}

/// Argument of a special method, resolved after the entity exists.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredArgument {
    /// Passed as the single argument once resolved.
    Reference(String),
    /// Spread as positional arguments; references among them are resolved.
    List(Vec<Value>),
    /// Passed as the single argument.
    Scalar(Value),
}

/// A special method recorded while walking a definition.
#[derive(Clone)]
pub struct DeferredCall {
    /// The definition key, marker included.
    pub field: String,
    pub method: SpecialMethod,
    pub argument: DeferredArgument,
}

impl fmt::Debug for DeferredCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredCall")
            .field("field", &self.field)
            .field("argument", &self.argument)
            .finish_non_exhaustive()
    }
}

/// An object graph built from declarative fixture data.
///
/// ```
/// use scenarious::Scenario;
/// use scenarious_model::{EntitySchema, RecordHandler};
///
/// let scenario = Scenario::builder()
///     .handler(RecordHandler::new(EntitySchema::new("actor").require("name")))
///     .handler(RecordHandler::new(EntitySchema::new("movie").require("title")))
///     .source("movies: [{title: M, actor: $actor_1}]\nactors: [{name: A}]")
///     .load()
///     .unwrap();
///
/// let movie = &scenario.entities("movies").unwrap()[0];
/// let actor = movie.get_entity("actor").unwrap();
/// assert_eq!(actor.get_str("name").as_deref(), Some("A"));
/// ```
#[derive(Debug)]
pub struct Scenario {
    config: ScenarioConfig,
    raw: RawScenarioData,
    store: EntityStore,
    references: ReferenceResolver,
    handlers: HandlerRegistry,
    states: HashMap<String, LoadState>,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder::default()
    }

    /// Loads and builds a scenario with default settings.
    pub fn load<S, H>(sources: S, handlers: H) -> ScenarioResult<Self>
    where
        S: IntoIterator,
        S::Item: Into<Source>,
        H: IntoIterator<Item = Rc<dyn TypeHandler>>,
    {
        Self::builder()
            .sources(sources)
            .handlers(handlers)
            .load()
    }

    /// Appends another source's definitions. Usable before or after
    /// [`Scenario::build`]; entries for types that are already loaded are
    /// kept but never built.
    pub fn update(&mut self, source: impl Into<Source>) -> ScenarioResult<()> {
        for (name, definition) in source.into().read()? {
            let entity_type = self.handlers.canonical(&name)?;
            if self.is_loaded(&entity_type) {
                warn!("Type '{}' is already loaded; new entries will not be built", entity_type);
            }
            self.raw.merge(&entity_type, definition)?;
        }
        Ok(())
    }

    /// Loads every type: the priority list first, then the rest in the
    /// order the sources introduced them. Loaded types are never reloaded,
    /// so calling this again only picks up new types.
    pub fn build(&mut self) -> ScenarioResult<()> {
        for name in self.config.load_priority.clone() {
            let entity_type = self.handlers.canonical(&name)?;
            if !self.raw.contains(&entity_type) {
                debug!("Priority type '{}' has no definitions, skipping", entity_type);
                continue;
            }
            self.load_type(&entity_type)?;
        }

        let remaining: Vec<String> = self.raw.types().map(str::to_string).collect();
        for entity_type in remaining {
            self.load_type(&entity_type)?;
        }

        info!("Built scenario with {} types", self.store.types().count());
        Ok(())
    }

    /// Every entity of a type, in definition order.
    pub fn entities(&self, type_name: &str) -> ScenarioResult<Vec<EntityRef>> {
        let entity_type = self.loaded_type(type_name)?;
        Ok(self.store.all(&entity_type))
    }

    /// Collection view of a type, supporting `by_name("actor_1")`.
    pub fn collection(&self, type_name: &str) -> ScenarioResult<EntityCollection> {
        let entity_type = self.loaded_type(type_name)?;
        Ok(self.store.entries(&entity_type))
    }

    /// Looks an entity up by alias or identifier. A miss is `Ok(None)`.
    pub fn by_id(
        &self,
        type_name: &str,
        key: impl Into<EntityKey>,
    ) -> ScenarioResult<Option<EntityRef>> {
        let entity_type = self.loaded_type(type_name)?;
        Ok(self.store.get(&entity_type, &key.into()))
    }

    /// Creates one more entity right away, loading the type's pending
    /// definitions first.
    pub fn add(&mut self, type_name: &str, fields: Fields) -> ScenarioResult<EntityRef> {
        let entity_type = self.handlers.canonical(type_name)?;
        self.load_type(&entity_type)?;
        self.load_entity(&entity_type, fields)
    }

    pub fn identifier_of(&self, type_name: &str, entity: &EntityRef) -> Option<EntityKey> {
        let entity_type = self.handlers.canonical(type_name).ok()?;
        self.store.identifier_of(&entity_type, entity)
    }

    pub fn alias_of(&self, type_name: &str, entity: &EntityRef) -> Option<String> {
        let entity_type = self.handlers.canonical(type_name).ok()?;
        self.store.alias_of(&entity_type, entity)
    }

    pub fn is_loaded(&self, type_name: &str) -> bool {
        self.state(type_name) == LoadState::Loaded
    }

    pub fn state(&self, type_name: &str) -> LoadState {
        self.handlers
            .canonical(type_name)
            .ok()
            .and_then(|entity_type| self.states.get(&entity_type).copied())
            .unwrap_or_default()
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub fn raw_data(&self) -> &RawScenarioData {
        &self.raw
    }

    fn loaded_type(&self, type_name: &str) -> ScenarioResult<String> {
        let entity_type = self.handlers.canonical(type_name)?;
        if self.store.has_type(&entity_type) {
            Ok(entity_type)
        } else {
            Err(ScenarioError::UnknownType(type_name.to_string()))
        }
    }

    fn load_type(&mut self, entity_type: &str) -> ScenarioResult<()> {
        if self.states.get(entity_type).copied().unwrap_or_default() != LoadState::Unloaded {
            return Ok(());
        }

        let definitions = self.raw.get(entity_type).unwrap_or_default().to_vec();

        debug!(entity_type, count = self.raw.entry_count(entity_type), "Loading type");
        self.states
            .insert(entity_type.to_string(), LoadState::Loading);
        for definition in &definitions {
            for fields in definition_entries(entity_type, definition)? {
                self.load_entity(entity_type, fields)?;
            }
        }

        self.store.register_type(entity_type);
        self.states.insert(entity_type.to_string(), LoadState::Loaded);
        Ok(())
    }

    fn load_entity(&mut self, entity_type: &str, fields: Fields) -> ScenarioResult<EntityRef> {
        let handler = self.handlers.handler(entity_type)?;
        let (id, fields) = self.extract_identifier(entity_type, fields)?;

        let mut deferred = Vec::new();
        let data = self.resolve_fields(entity_type, handler.as_ref(), fields, &mut deferred)?;
        let entity = handler.create(data)?;
        let assigned = self.store.add(entity.clone(), entity_type, id)?;
        debug!(
            entity_type,
            identifier = ?assigned.identifier,
            alias = ?assigned.alias,
            deferred = deferred.len(),
            "Created entity"
        );

        for call in deferred {
            self.invoke(entity_type, &entity, call)?;
        }
        Ok(entity)
    }

    /// Strips the id and alias fields off a definition.
    fn extract_identifier(
        &self,
        entity_type: &str,
        mut fields: Fields,
    ) -> ScenarioResult<(EntityIdentifier, Fields)> {
        let invalid = |source| ScenarioError::InvalidIdentifier {
            entity_type: entity_type.to_string(),
            source,
        };

        let identifier = match fields.shift_remove(&self.config.id_field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(EntityKey::try_from(&value).map_err(invalid)?),
        };
        let alias = match fields.shift_remove(&self.config.alias_field) {
            None => None,
            Some(value) => alias_from_value(&value).map_err(invalid)?,
        };

        Ok((EntityIdentifier::new(identifier, alias), fields))
    }

    /// Resolves references in a mapping and pulls out special-method keys,
    /// at any depth.
    fn resolve_fields(
        &mut self,
        entity_type: &str,
        handler: &dyn TypeHandler,
        fields: Fields,
        deferred: &mut Vec<DeferredCall>,
    ) -> ScenarioResult<Fields> {
        let mut resolved = Fields::with_capacity(fields.len());
        for (field, value) in fields {
            if handler.is_method(&field) {
                let method = handler.get_special_method(&field)?;
                deferred.push(DeferredCall {
                    argument: self.defer(value),
                    field,
                    method,
                });
            } else {
                let value = self.resolve_value(entity_type, handler, value, deferred)?;
                resolved.insert(field, value);
            }
        }
        Ok(resolved)
    }

    fn resolve_value(
        &mut self,
        entity_type: &str,
        handler: &dyn TypeHandler,
        value: Value,
        deferred: &mut Vec<DeferredCall>,
    ) -> ScenarioResult<Value> {
        match value {
            Value::Map(fields) => Ok(Value::Map(
                self.resolve_fields(entity_type, handler, fields, deferred)?,
            )),
            Value::List(items) => items
                .into_iter()
                .map(|item| self.resolve_value(entity_type, handler, item, deferred))
                .collect::<ScenarioResult<Vec<_>>>()
                .map(Value::List),
            Value::Str(text) if self.references.is_reference_text(&text) => {
                self.resolve_reference(entity_type, &text)
            }
            other => Ok(other),
        }
    }

    fn defer(&self, value: Value) -> DeferredArgument {
        match value {
            Value::Str(text) if self.references.is_reference_text(&text) => {
                DeferredArgument::Reference(text)
            }
            Value::List(items) => DeferredArgument::List(items),
            other => DeferredArgument::Scalar(other),
        }
    }

    fn invoke(
        &mut self,
        entity_type: &str,
        entity: &EntityRef,
        call: DeferredCall,
    ) -> ScenarioResult<()> {
        let args = match call.argument {
            DeferredArgument::Reference(text) => vec![self.resolve_reference(entity_type, &text)?],
            DeferredArgument::List(items) => {
                let mut args = Vec::with_capacity(items.len());
                for item in items {
                    let arg = match item {
                        Value::Str(text) if self.references.is_reference_text(&text) => {
                            self.resolve_reference(entity_type, &text)?
                        }
                        other => other,
                    };
                    args.push(arg);
                }
                args
            }
            DeferredArgument::Scalar(value) => vec![value],
        };

        debug!(entity_type, method = %call.field, args = args.len(), "Invoking special method");
        (call.method)(entity, &args)?;
        Ok(())
    }

    /// Dereferences reference text while loading `loading_type`, loading
    /// the target type first when needed.
    fn resolve_reference(&mut self, loading_type: &str, text: &str) -> ScenarioResult<Value> {
        let reference =
            self.references
                .parse(text)
                .map_err(|source| ScenarioError::InvalidReference {
                    reference: text.to_string(),
                    source,
                })?;
        let target_type = self.handlers.canonical(&reference.entity_type)?;
        let key = reference.key();

        let in_progress = self.states.get(&target_type).copied() == Some(LoadState::Loading);
        if in_progress {
            if self.store.get(&target_type, &key).is_none() {
                return Err(ScenarioError::CyclicReference {
                    entity_type: target_type,
                    identifier: reference.identifier,
                });
            }
        } else {
            self.load_type(&target_type)?;
        }

        let target = self.store.get(&target_type, &key).ok_or_else(|| ScenarioError::Load {
            entity_type: loading_type.to_string(),
            source: ResolveError::NotFound {
                entity_type: target_type.clone(),
                identifier: reference.identifier.clone(),
            },
        })?;

        navigate(Value::Entity(target), &reference).map_err(|source| ScenarioError::Load {
            entity_type: loading_type.to_string(),
            source,
        })
    }
}

/// Reads a reference's attribute path off its target.
fn navigate(mut value: Value, reference: &Reference) -> Result<Value, ResolveError> {
    for attribute in &reference.attributes {
        let missing = || ResolveError::MissingAttribute {
            reference: reference.to_string(),
            attribute: attribute.clone(),
        };
        value = match &value {
            Value::Entity(entity) => entity.attribute(attribute).ok_or_else(missing)?,
            Value::Map(fields) => fields.get(attribute).cloned().ok_or_else(missing)?,
            other => {
                return Err(ResolveError::NotNavigable {
                    reference: reference.to_string(),
                    attribute: attribute.clone(),
                    kind: other.kind(),
                });
            }
        };
    }
    Ok(value)
}

/// Configures and loads a [`Scenario`].
pub struct ScenarioBuilder {
    sources: Vec<Source>,
    handlers: Vec<Rc<dyn TypeHandler>>,
    load_priority: Option<Vec<String>>,
    config: ScenarioConfig,
    entity_store: Option<EntityStore>,
    reference_handler: Option<ReferenceResolver>,
    autobuild: bool,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            handlers: Vec::new(),
            load_priority: None,
            config: ScenarioConfig::default(),
            entity_store: None,
            reference_handler: None,
            autobuild: true,
        }
    }
}

impl ScenarioBuilder {
    #[must_use]
    pub fn source(mut self, source: impl Into<Source>) -> Self {
        self.sources.push(source.into());
        self
    }

    #[must_use]
    pub fn sources<S>(mut self, sources: S) -> Self
    where
        S: IntoIterator,
        S::Item: Into<Source>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn handler(self, handler: impl TypeHandler + 'static) -> Self {
        self.shared_handler(Rc::new(handler))
    }

    #[must_use]
    pub fn shared_handler(mut self, handler: Rc<dyn TypeHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    #[must_use]
    pub fn handlers(mut self, handlers: impl IntoIterator<Item = Rc<dyn TypeHandler>>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    /// Types to load before any other. Overrides the config's list.
    #[must_use]
    pub fn load_priority<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.load_priority = Some(types.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn config(mut self, config: ScenarioConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts from an existing store. Types it already holds count as
    /// loaded.
    #[must_use]
    pub fn entity_store(mut self, store: EntityStore) -> Self {
        self.entity_store = Some(store);
        self
    }

    /// Replaces the resolver built from the config's sigil.
    #[must_use]
    pub fn reference_handler(mut self, resolver: ReferenceResolver) -> Self {
        self.reference_handler = Some(resolver);
        self
    }

    /// Whether [`ScenarioBuilder::load`] also builds. Defaults to `true`.
    #[must_use]
    pub fn autobuild(mut self, autobuild: bool) -> Self {
        self.autobuild = autobuild;
        self
    }

    /// Registers handlers, reads every source and, with autobuild, builds.
    pub fn load(self) -> ScenarioResult<Scenario> {
        let mut config = self.config;
        if let Some(priority) = self.load_priority {
            config.load_priority = priority;
        }
        config.validate()?;

        let mut handlers = HandlerRegistry::new();
        for handler in self.handlers {
            handlers.register(handler)?;
        }

        let store = self.entity_store.unwrap_or_default();
        let states = store
            .types()
            .map(|entity_type| (entity_type.to_string(), LoadState::Loaded))
            .collect();

        let references = self
            .reference_handler
            .unwrap_or_else(|| ReferenceResolver::new(config.reference_sigil.clone()));
        if references.sigil().is_empty() {
            return Err(ConfigError::EmptyField("reference_sigil").into());
        }

        let mut scenario = Scenario {
            config,
            raw: RawScenarioData::new(),
            store,
            references,
            handlers,
            states,
        };

        for source in self.sources {
            scenario.update(source)?;
        }
        if self.autobuild {
            scenario.build()?;
        }
        Ok(scenario)
    }
}
