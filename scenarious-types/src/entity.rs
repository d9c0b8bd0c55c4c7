use crate::{Fields, Value};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A domain object created from a fixture definition.
///
/// Type handlers decide which fields end up here. Fields may hold other
/// entities through [`Value::Entity`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub entity_type: String,
    pub fields: Fields,
}

impl Entity {
    #[must_use]
    pub fn new(entity_type: impl Into<String>, fields: Fields) -> Self {
        Self {
            entity_type: entity_type.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Extract a string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Extract an integer field.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    /// Extract a numeric field (integers widen).
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    /// Extract a boolean field.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Extract a field holding another entity.
    pub fn get_entity(&self, field: &str) -> Option<EntityRef> {
        self.get(field).and_then(Value::as_entity).cloned()
    }

    /// Sets a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }
}

/// Shared handle to a created entity.
///
/// The store, references in other entities' fields, and test code all hold
/// the same object, so post-construction calls are visible everywhere.
/// Equality is identity.
#[derive(Clone)]
pub struct EntityRef(Rc<RefCell<Entity>>);

impl EntityRef {
    #[must_use]
    pub fn new(entity: Entity) -> Self {
        Self(Rc::new(RefCell::new(entity)))
    }

    /// Borrows the entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Entity> {
        self.0.borrow()
    }

    /// Mutably borrows the entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Entity> {
        self.0.borrow_mut()
    }

    #[must_use]
    pub fn entity_type(&self) -> String {
        self.borrow().entity_type.clone()
    }

    /// Reads one attribute, cloning it out of the entity.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.borrow().get(name).cloned()
    }

    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<String> {
        self.borrow().get_str(field).map(str::to_string)
    }

    #[must_use]
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.borrow().get_i64(field)
    }

    #[must_use]
    pub fn get_entity(&self, field: &str) -> Option<EntityRef> {
        self.borrow().get_entity(field)
    }

    pub fn set(&self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.borrow_mut().set(field, value)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for EntityRef {}

// Prints only the type so that cyclic graphs do not recurse.
impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(entity) => write!(f, "EntityRef<{}>", entity.entity_type),
            Err(_) => f.write_str("EntityRef<borrowed>"),
        }
    }
}
