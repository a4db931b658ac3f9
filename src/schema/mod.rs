//! Schema generation.
//!
//! A schema describes the types and indexing options of the fields of a
//! registered type, mirroring the shape of the documents written for it.

pub mod builder;
pub mod field;
#[allow(clippy::module_inception)]
pub mod schema;

pub use builder::{SchemaBuilder, SchemaCache};
pub use field::{FieldMapping, LeafField, ObjectField, Stored};
pub use schema::{Properties, Schema};
