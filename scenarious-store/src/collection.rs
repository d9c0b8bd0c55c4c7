use crate::entity_store::Slot;
use crate::error::{StoreError, StoreResult};
use scenarious_types::{EntityKey, EntityRef};
use std::ops::Index;

/// Snapshot of one type's entities, in insertion order.
///
/// Besides positional access it resolves `"<type>_<identifier or alias>"`
/// names, e.g. `actors.by_name("actor_1")`.
#[derive(Debug, Clone)]
pub struct EntityCollection {
    entity_type: String,
    slots: Vec<Slot>,
}

impl EntityCollection {
    pub(crate) fn new(entity_type: &str, slots: Vec<Slot>) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            slots,
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EntityRef> {
        self.slots.get(index).map(|s| &s.entity)
    }

    pub fn first(&self) -> Option<&EntityRef> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityRef> {
        self.slots.iter().map(|s| &s.entity)
    }

    /// Identifiers in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &EntityKey> {
        self.slots.iter().map(|s| &s.key)
    }

    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.iter().any(|e| e.ptr_eq(entity))
    }

    /// Looks up `"<type>_<name>"`, matching `name` against identifiers (as
    /// text) first and aliases second.
    pub fn by_name(&self, name: &str) -> StoreResult<EntityRef> {
        let (type_name, wanted) = name
            .rsplit_once('_')
            .ok_or_else(|| StoreError::InvalidTypeName(name.to_string()))?;

        if type_name != self.entity_type {
            return Err(StoreError::InvalidTypeName(type_name.to_string()));
        }

        self.slots
            .iter()
            .find(|s| s.key.to_string() == wanted)
            .or_else(|| self.slots.iter().find(|s| s.alias.as_deref() == Some(wanted)))
            .map(|s| s.entity.clone())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    pub fn to_vec(&self) -> Vec<EntityRef> {
        self.iter().cloned().collect()
    }
}

impl Index<usize> for EntityCollection {
    type Output = EntityRef;

    fn index(&self, index: usize) -> &EntityRef {
        &self.slots[index].entity
    }
}

impl<'a> IntoIterator for &'a EntityCollection {
    type Item = &'a EntityRef;
    type IntoIter = Box<dyn Iterator<Item = &'a EntityRef> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
