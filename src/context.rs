//! Entry point of the mapping engine.
//!
//! An [`ObjectContext`] owns a [`TypeRegistry`] and exposes everything a
//! storage layer needs: schemas for registered types, conversion of objects
//! to documents and back, and access to object identifiers.
//!
//! # Examples
//!
//! ```
//! use docmapper::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct Tweet {
//!     message: String,
//! }
//!
//! impl Describe for Tweet {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>()
//!             .root_entity()
//!             .field("message", |t| &t.message, |t| &mut t.message)
//!             .build()
//!     }
//! }
//!
//! let context = ObjectContext::new();
//! context.register::<Tweet>().unwrap();
//!
//! let tweet = Tweet { message: "hello".to_string() };
//! let document = context.to_document(&tweet).unwrap();
//! assert_eq!(document.get_str("message"), Some("hello"));
//!
//! let read: Tweet = context.from_document(&document).unwrap();
//! assert_eq!(read.message, "hello");
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::attribute::ResolvedProperty;
use crate::config::MapperConfig;
use crate::descriptor::{ClassRef, Describe, Entity};
use crate::diagnostic::Diagnostic;
use crate::document::{Document, DocumentReader, DocumentWriter, codec};
use crate::error::{MapperError, Result};
use crate::registry::TypeRegistry;
use crate::schema::{Schema, SchemaBuilder};
use crate::signature::TypeSignature;
use crate::value::FieldRef;

/// Shared handle on a type registry.
///
/// Cloning is cheap; clones share the registry and its caches.
#[derive(Debug, Clone, Default)]
pub struct ObjectContext {
    registry: Arc<TypeRegistry>,
}

impl ObjectContext {
    /// Create a context with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a validated configuration.
    pub fn with_config(config: MapperConfig) -> Result<Self> {
        config.validate()?;
        Ok(ObjectContext {
            registry: Arc::new(TypeRegistry::with_config(config)),
        })
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &MapperConfig {
        self.registry.config()
    }

    /// Register `T` and every type reachable from it.
    pub fn register<T: ?Sized + Describe>(&self) -> Result<()> {
        self.registry.register(ClassRef::of::<T>())
    }

    pub fn register_class(&self, class: ClassRef) -> Result<()> {
        self.registry.register(class)
    }

    pub fn is_registered<T: ?Sized + Describe>(&self) -> bool {
        self.registry.is_registered(ClassRef::of::<T>())
    }

    /// Registered types in registration order.
    pub fn types(&self) -> Vec<ClassRef> {
        self.registry.types()
    }

    /// The storage type name of `T`.
    pub fn type_name<T: ?Sized + Describe>(&self) -> String {
        self.registry.type_name(ClassRef::of::<T>())
    }

    pub fn schema<T: ?Sized + Describe>(&self) -> Result<Schema> {
        self.schema_for(ClassRef::of::<T>())
    }

    pub fn schema_for(&self, class: ClassRef) -> Result<Schema> {
        SchemaBuilder::new(&self.registry).build(class)
    }

    pub fn to_document(&self, object: &dyn Entity) -> Result<Document> {
        DocumentWriter::new(&self.registry).write(object)
    }

    /// Read an object of the concrete type `T`.
    pub fn from_document<T>(&self, document: &Document) -> Result<T>
    where
        T: Describe + fmt::Debug + Send + Sync,
    {
        DocumentReader::new(&self.registry).read_as(document)
    }

    /// Read an object declared as `class`; the document may name a subtype.
    pub fn from_document_as(
        &self,
        document: &Document,
        class: ClassRef,
    ) -> Result<Box<dyn Entity>> {
        DocumentReader::new(&self.registry).read(document, class)
    }

    /// The identifier of `object`, if its type maps one and it is set.
    pub fn id_of(&self, object: &dyn Entity) -> Result<Option<String>> {
        let class = object.class();
        let Some(property) = self.identifier_property(class)? else {
            return Ok(None);
        };

        let value = property.descriptor().read(object.as_any())?;
        match value {
            FieldRef::Null => Ok(None),
            FieldRef::String(id) => Ok(Some(id.to_string())),
            scalar @ (FieldRef::Short(_)
            | FieldRef::Integer(_)
            | FieldRef::Long(_)
            | FieldRef::Uri(_)) => match codec::encode_scalar(&scalar, None)? {
                Value::String(id) => Ok(Some(id)),
                other => Ok(Some(other.to_string())),
            },
            other => Err(MapperError::value(format!(
                "a {} cannot be used as identifier of type [{}]",
                other.kind_name(),
                class
            ))),
        }
    }

    /// Fail with a missing identifier error unless `object` carries one.
    pub fn require_id(&self, object: &dyn Entity) -> Result<String> {
        self.id_of(object)?
            .ok_or_else(|| MapperError::missing_identifier(object.class().type_path()))
    }

    /// Assign `id` to `object`.
    ///
    /// Returns false when the type of `object` maps no identifier.
    pub fn set_id(&self, object: &mut dyn Entity, id: &str) -> Result<bool> {
        let class = object.class();
        let Some(property) = self.identifier_property(class)? else {
            return Ok(false);
        };

        let signature = self
            .registry
            .signatures()
            .property(class, property.descriptor())?;
        let TypeSignature::Scalar(kind) = *signature else {
            return Err(MapperError::value(format!(
                "the identifier of type [{class}] is not a scalar"
            )));
        };

        let value = codec::decode_scalar(kind, &Value::String(id.to_string()), None)?;
        property.descriptor().write(object.as_any_mut(), value)?;
        Ok(true)
    }

    /// Diagnostics found while resolving registered types.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.registry.diagnostics()
    }

    fn identifier_property(&self, class: ClassRef) -> Result<Option<Arc<ResolvedProperty>>> {
        self.registry.check(class)?;
        Ok(self
            .registry
            .attributes()
            .property(class, &self.registry.config().identifier_field))
    }
}
