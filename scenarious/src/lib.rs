//! Declarative test-fixture scenarios.
//!
//! A scenario is built from YAML (or already parsed JSON) that maps entity
//! type names to definitions:
//!
//! ```yaml
//! actors:
//!   - {name: Ada, _alias: lead}
//!   - {id: 7, name: Grace}
//! movies:
//!   - title: Rust
//!     actor: $actor_lead
//!     _add_cast: [$actor_7]
//! genres: 3
//! ```
//!
//! # Architecture
//!
//! - **Source**: raw definitions, merged per type across sources
//! - **Registry**: type handlers by every accepted spelling
//! - **Reference**: the `$type_id.attr` syntax
//! - **Scenario**: load ordering, reference resolution and deferred
//!   special-method calls, on top of an [`EntityStore`]
//!
//! ## Build Process
//!
//! 1. Types in the load-priority list are loaded first
//! 2. Remaining types load in the order the sources introduced them
//! 3. A reference to a type that is not loaded yet loads it on the spot
//! 4. For each definition: strip `id`/`_alias`, resolve references, record
//!    `_method` keys, create through the handler, store, then run the
//!    recorded methods
//!
//! [`EntityStore`]: scenarious_store::EntityStore

mod config;
mod error;
mod reference;
mod registry;
mod scenario;
mod source;
pub mod testing;

pub use config::ScenarioConfig;
pub use error::{
    ConfigError, ReferenceError, ResolveError, ScenarioError, ScenarioResult, SourceError,
};
pub use reference::{Reference, ReferenceResolver, DEFAULT_SIGIL};
pub use registry::HandlerRegistry;
pub use scenario::{DeferredArgument, DeferredCall, LoadState, Scenario, ScenarioBuilder};
pub use source::{
    definition_entries, DefinitionEntries, RawScenarioData, Source, MAX_DEFINITION_COUNT,
};
