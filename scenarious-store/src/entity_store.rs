use crate::collection::EntityCollection;
use crate::error::{StoreError, StoreResult};
use indexmap::IndexMap;
use scenarious_types::{EntityIdentifier, EntityKey, EntityRef};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub(crate) key: EntityKey,
    pub(crate) alias: Option<String>,
    pub(crate) entity: EntityRef,
}

/// Everything stored for one entity type.
#[derive(Debug)]
struct TypeSlots {
    /// In `add` order; relocation rewrites the key in place.
    slots: Vec<Slot>,
    by_key: HashMap<EntityKey, usize>,
    by_alias: HashMap<String, usize>,
    /// Next candidate for a minted identifier.
    counter: i64,
}

impl Default for TypeSlots {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            by_key: HashMap::new(),
            by_alias: HashMap::new(),
            counter: 1,
        }
    }
}

impl TypeSlots {
    /// Scans upward from the counter to the first identifier not in use in
    /// either its integer or its text form.
    fn mint(&mut self) -> EntityKey {
        while self.holder_of(&EntityKey::Int(self.counter)).is_some() {
            self.counter += 1;
        }
        EntityKey::Int(self.counter)
    }

    /// The stored key equal to `key` or to its coerced form, with its slot.
    /// `1` and `"1"` name the same entity, so at most one of them is live.
    fn holder_of(&self, key: &EntityKey) -> Option<(EntityKey, usize)> {
        std::iter::once(key.clone())
            .chain(key.coerced())
            .find_map(|k| self.by_key.get(&k).map(|&index| (k, index)))
    }

    fn position_of(&self, entity: &EntityRef) -> Option<usize> {
        self.slots.iter().position(|slot| slot.entity.ptr_eq(entity))
    }
}

/// Keyed, per-type collection of created entities.
///
/// Identifiers and aliases are unique within a type. An explicit identifier
/// that is already taken goes to the newcomer; the previous holder is
/// relocated to a freshly minted identifier. Entries are never removed
/// except by [`EntityStore::reset`].
#[derive(Debug, Default)]
pub struct EntityStore {
    types: IndexMap<String, TypeSlots>,
}

impl EntityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every type, entity and counter.
    pub fn reset(&mut self) {
        self.types.clear();
    }

    pub fn has_type(&self, entity_type: &str) -> bool {
        self.types.contains_key(entity_type)
    }

    /// Marks a type as present even if it never receives an entity.
    pub fn register_type(&mut self, entity_type: &str) {
        self.types.entry(entity_type.to_string()).or_default();
    }

    /// Type names in the order they were first registered.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of entities stored for a type.
    pub fn len(&self, entity_type: &str) -> usize {
        self.types.get(entity_type).map_or(0, |t| t.slots.len())
    }

    /// Stores an entity and returns the identifier it was given.
    ///
    /// Fails with [`StoreError::DuplicateAlias`] before touching anything if
    /// the alias is already registered for the type.
    pub fn add(
        &mut self,
        entity: EntityRef,
        entity_type: &str,
        id: EntityIdentifier,
    ) -> StoreResult<EntityIdentifier> {
        let id = EntityIdentifier::new(id.identifier, id.alias);
        let slots = self.types.entry(entity_type.to_string()).or_default();

        if let Some(alias) = &id.alias {
            if slots.by_alias.contains_key(alias) {
                return Err(StoreError::DuplicateAlias {
                    entity_type: entity_type.to_string(),
                    alias: alias.clone(),
                });
            }
        }

        let key = match id.identifier {
            Some(key) => {
                if let Some((held, index)) = slots.holder_of(&key) {
                    // Minted while the key is still registered so it cannot be reused.
                    let relocated = slots.mint();
                    slots.by_key.remove(&held);
                    debug!(
                        entity_type,
                        from = %held,
                        to = %relocated,
                        "Relocating entity to free an explicit identifier"
                    );
                    slots.slots[index].key = relocated.clone();
                    slots.by_key.insert(relocated, index);
                }
                key
            }
            None => slots.mint(),
        };

        let index = slots.slots.len();
        slots.by_key.insert(key.clone(), index);
        if let Some(alias) = &id.alias {
            slots.by_alias.insert(alias.clone(), index);
        }
        slots.slots.push(Slot {
            key: key.clone(),
            alias: id.alias.clone(),
            entity,
        });

        Ok(EntityIdentifier::new(Some(key), id.alias))
    }

    /// Finds an entity by alias or identifier.
    ///
    /// The key's text form is tried as an alias first (aliases are stored as
    /// text, so `2` finds `_alias: 2`), then the key as an identifier in
    /// either representation (`"3"` <-> `3`).
    pub fn get(&self, entity_type: &str, key: &EntityKey) -> Option<EntityRef> {
        let slots = self.types.get(entity_type)?;

        let index = match slots.by_alias.get(&key.to_string()) {
            Some(&index) => index,
            None => slots.holder_of(key)?.1,
        };

        Some(slots.slots[index].entity.clone())
    }

    /// All entities of a type, in the order they were added.
    pub fn all(&self, entity_type: &str) -> Vec<EntityRef> {
        self.types
            .get(entity_type)
            .map(|t| t.slots.iter().map(|s| s.entity.clone()).collect())
            .unwrap_or_default()
    }

    /// A collection view of a type, supporting by-name lookups.
    pub fn entries(&self, entity_type: &str) -> EntityCollection {
        let slots = self
            .types
            .get(entity_type)
            .map(|t| t.slots.clone())
            .unwrap_or_default();
        EntityCollection::new(entity_type, slots)
    }

    /// The identifier an entity currently holds.
    pub fn identifier_of(&self, entity_type: &str, entity: &EntityRef) -> Option<EntityKey> {
        let slots = self.types.get(entity_type)?;
        slots
            .position_of(entity)
            .map(|index| slots.slots[index].key.clone())
    }

    pub fn alias_of(&self, entity_type: &str, entity: &EntityRef) -> Option<String> {
        let slots = self.types.get(entity_type)?;
        slots
            .position_of(entity)
            .and_then(|index| slots.slots[index].alias.clone())
    }
}
