//! Type-handler model for Scenarious.
//!
//! A type handler turns the raw field mapping of one fixture entity into a
//! domain object. This crate defines:
//! - [`EntitySchema`]: accepted type names plus an ordered list of
//!   [`FieldSpec`]s (required / defaulted / typed), flattened from ancestors
//! - [`TypeHandler`]: the creation pipeline: validate, default, derive,
//!   clean, format, construct
//! - [`RecordHandler`]: a ready-to-use handler producing plain [`Entity`]s
//! - [`defaults`]: randomised and sequential default providers
//!
//! [`Entity`]: scenarious_types::Entity

pub mod defaults;

mod datetime;
mod error;
mod handler;
mod record;
mod schema;

pub use datetime::parse_datetime;
pub use error::{HandlerError, HandlerResult};
pub use handler::{SpecialMethod, SpecialMethods, TypeHandler, METHOD_MARKER};
pub use record::RecordHandler;
pub use schema::{DefaultValue, EntitySchema, FieldSpec, FieldType, Provider};
