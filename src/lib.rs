//! # Docmapper
//!
//! An object/document mapping engine for search stores.
//!
//! ## Features
//!
//! - Static per-type descriptors instead of runtime reflection
//! - Schema, payload and exclusion policies resolved per property
//! - Recursive schema generation with cycle detection
//! - Polymorphic documents through a discriminator field
//! - Caches owned by a registry and safe for concurrent use
//! - A narrow storage contract with an in-memory implementation

pub mod attribute;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod registry;
pub mod schema;
pub mod signature;
pub mod store;
pub mod value;

pub mod prelude {
    pub use crate::config::MapperConfig;
    pub use crate::context::ObjectContext;
    pub use crate::descriptor::{
        ClassRef, CollectionInterface, DeclaredType, Describe, Entity, IndexMode, PayloadOptions,
        PropertyDescriptor, RootOptions, SchemaOptions, TermVector, TypeDescriptor,
    };
    pub use crate::diagnostic::Diagnostic;
    pub use crate::document::Document;
    pub use crate::error::{MapperError, Result};
    pub use crate::polymorphic;
    pub use crate::schema::Schema;
    pub use crate::store::{DocumentStore, MemoryStore, StoreSession};
    pub use crate::value::PropertyValue;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
