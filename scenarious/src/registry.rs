use crate::error::{ScenarioError, ScenarioResult};
use scenarious_model::TypeHandler;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Type handlers indexed by every spelling they accept.
///
/// A handler declaring a single name is also registered under that name
/// plus `s`, so `actor` and `actors` both resolve. Handlers declaring
/// several names get exactly those.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Vec<Rc<dyn TypeHandler>>,
    by_name: HashMap<String, usize>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the handler's schema and registers all of its spellings.
    ///
    /// Nothing is registered if any spelling is already taken.
    pub fn register(&mut self, handler: Rc<dyn TypeHandler>) -> ScenarioResult<()> {
        let schema = handler.schema();
        schema.validate()?;

        let mut names = schema.type_names.clone();
        if let [single] = names.as_slice() {
            let plural = format!("{single}s");
            names.push(plural);
        }

        if let Some(taken) = names.iter().find(|name| self.by_name.contains_key(*name)) {
            return Err(ScenarioError::DuplicateTypeName(taken.clone()));
        }

        let index = self.handlers.len();
        self.handlers.push(handler);
        for name in names {
            self.by_name.insert(name, index);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Rc<dyn TypeHandler>> {
        self.by_name.get(name).map(|&index| &self.handlers[index])
    }

    /// The handler for any accepted spelling of a type.
    pub fn handler(&self, name: &str) -> ScenarioResult<Rc<dyn TypeHandler>> {
        self.get(name)
            .cloned()
            .ok_or_else(|| ScenarioError::UnknownType(name.to_string()))
    }

    /// Canonical name for any accepted spelling of a type.
    pub fn canonical(&self, name: &str) -> ScenarioResult<String> {
        self.get(name)
            .map(|handler| handler.type_name().to_string())
            .ok_or_else(|| ScenarioError::UnknownType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Canonical names of every registered handler, in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|handler| handler.type_name())
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.type_names()).finish()
    }
}
