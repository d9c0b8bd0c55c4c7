//! In-memory entity store for Scenarious.
//!
//! Holds every entity a scenario creates, grouped by type name.
//!
//! # Identity rules
//!
//! - Identifiers and aliases are unique within a type
//! - Missing identifiers are minted from a per-type counter starting at 1,
//!   skipping any value already in use
//! - An explicit identifier that is already taken is given to the new
//!   entity; the previous holder moves to a freshly minted identifier
//! - A repeated alias is an error

mod collection;
mod entity_store;
mod error;

pub use collection::EntityCollection;
pub use entity_store::EntityStore;
pub use error::{StoreError, StoreResult};
