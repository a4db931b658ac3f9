//! The set of types known to the mapping engine.

use std::any::TypeId;

use ahash::{AHashMap, AHashSet};
use log::debug;
use parking_lot::RwLock;

use crate::attribute::AttributeResolver;
use crate::config::MapperConfig;
use crate::descriptor::ClassRef;
use crate::diagnostic::Diagnostic;
use crate::error::{MapperError, Result};
use crate::schema::SchemaCache;
use crate::signature::SignatureResolver;

#[derive(Debug, Default)]
struct RegisteredTypes {
    by_id: AHashMap<TypeId, ClassRef>,
    by_path: AHashMap<&'static str, ClassRef>,
    order: Vec<ClassRef>,
}

impl RegisteredTypes {
    fn insert(&mut self, class: ClassRef) -> bool {
        if self.by_id.contains_key(&class.type_id()) {
            return false;
        }
        self.by_id.insert(class.type_id(), class);
        self.by_path.insert(class.type_path(), class);
        self.order.push(class);
        true
    }
}

/// Registry of mapped types.
///
/// Owns the resolver caches of the engine. Registration walks every type
/// reachable from the registered one, through payload-visible nested
/// object properties and family subtypes, validates their signatures and
/// publishes the whole set at once. Registering a type twice is a no-op.
#[derive(Debug)]
pub struct TypeRegistry {
    config: MapperConfig,
    types: RwLock<RegisteredTypes>,
    attributes: AttributeResolver,
    signatures: SignatureResolver,
    schemas: SchemaCache,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_config(MapperConfig::default())
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MapperConfig) -> Self {
        TypeRegistry {
            attributes: AttributeResolver::with_discriminator(config.discriminator_field.as_str()),
            config,
            types: RwLock::new(RegisteredTypes::default()),
            signatures: SignatureResolver::new(),
            schemas: SchemaCache::default(),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn attributes(&self) -> &AttributeResolver {
        &self.attributes
    }

    pub fn signatures(&self) -> &SignatureResolver {
        &self.signatures
    }

    pub(crate) fn schemas(&self) -> &SchemaCache {
        &self.schemas
    }

    /// Register `class` and every type reachable from it.
    ///
    /// Fails with an unsupported type error when a payload-visible property
    /// of any reachable type has no resolvable signature; nothing is
    /// registered in that case.
    pub fn register(&self, class: ClassRef) -> Result<()> {
        if self.is_registered(class) {
            return Ok(());
        }

        let mut pending = Vec::new();
        let mut seen = AHashSet::new();
        let mut stack = vec![class];

        while let Some(next) = stack.pop() {
            if !seen.insert(next.type_id()) || self.is_registered(next) {
                continue;
            }

            let attributes = self.attributes.properties(next);
            for property in attributes.payload_properties() {
                let signature = self.signatures.property(next, property.descriptor())?;
                if let Some(nested) = signature.nested_class() {
                    stack.push(nested);
                }
            }
            stack.extend(attributes.subtypes().iter().rev().copied());
            pending.push(next);
        }

        let mut types = self.types.write();
        for class in pending {
            if types.insert(class) {
                debug!("Added type [{}]", class);
            }
        }
        Ok(())
    }

    pub fn is_registered(&self, class: ClassRef) -> bool {
        self.types.read().by_id.contains_key(&class.type_id())
    }

    /// Fail with an unregistered type error unless `class` is registered.
    pub fn check(&self, class: ClassRef) -> Result<()> {
        if self.is_registered(class) {
            Ok(())
        } else {
            Err(MapperError::unregistered_type(class.type_path()))
        }
    }

    /// Find a registered type by the name written in the discriminator field.
    pub fn class_by_name(&self, type_path: &str) -> Option<ClassRef> {
        self.types.read().by_path.get(type_path).copied()
    }

    /// Registered types in registration order.
    pub fn types(&self) -> Vec<ClassRef> {
        self.types.read().order.clone()
    }

    /// The storage type name of `class`: its root alias, or its lower-cased
    /// simple name.
    pub fn type_name(&self, class: ClassRef) -> String {
        self.attributes
            .properties(class)
            .root()
            .and_then(|root| root.type_alias())
            .map(str::to_string)
            .unwrap_or_else(|| class.simple_name().to_lowercase())
    }

    /// Diagnostics found while resolving registered types.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.attributes.diagnostics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    use crate::descriptor::{
        CollectionInterface, DeclaredType, Describe, PropertyDescriptor, RootOptions,
        TypeDescriptor, getter, setter,
    };
    use crate::value::{FieldRef, FieldValue};

    #[derive(Debug, Default)]
    struct Library {
        name: String,
        books: Vec<Box<Book>>,
    }

    #[derive(Debug, Default)]
    struct Book {
        title: String,
        author: Option<Box<Author>>,
    }

    #[derive(Debug, Default)]
    struct Author {
        name: String,
        favorite: Option<Box<Book>>,
    }

    impl Describe for Library {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .root_entity_with(RootOptions::new().alias("libraries"))
                .field("name", |l| &l.name, |l| &mut l.name)
                .field("books", |l| &l.books, |l| &mut l.books)
                .build()
        }
    }

    impl Describe for Book {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .root_entity()
                .field("title", |b| &b.title, |b| &mut b.title)
                .field("author", |b| &b.author, |b| &mut b.author)
                .build()
        }
    }

    impl Describe for Author {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .root_entity()
                .field("name", |a| &a.name, |a| &mut a.name)
                .field("favorite", |a| &a.favorite, |a| &mut a.favorite)
                .build()
        }
    }

    #[derive(Debug, Default)]
    struct Broken;

    impl Describe for Broken {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .root_entity()
                .property(PropertyDescriptor::new(
                    "items",
                    DeclaredType::raw_collection(CollectionInterface::List),
                    getter(|_: &dyn Any| Ok(FieldRef::Null)),
                    Some(setter(|_: &mut dyn Any, _: FieldValue| Ok(()))),
                ))
                .build()
        }
    }

    #[test]
    fn test_register_reachable_types() -> Result<()> {
        let registry = TypeRegistry::new();
        registry.register(ClassRef::of::<Library>())?;

        assert!(registry.is_registered(ClassRef::of::<Library>()));
        assert!(registry.is_registered(ClassRef::of::<Book>()));
        assert!(registry.is_registered(ClassRef::of::<Author>()));
        assert_eq!(registry.types().len(), 3);
        assert_eq!(registry.types()[0], ClassRef::of::<Library>());
        Ok(())
    }

    #[test]
    fn test_register_is_idempotent() -> Result<()> {
        let registry = TypeRegistry::new();
        registry.register(ClassRef::of::<Book>())?;
        let before = registry.types();
        registry.register(ClassRef::of::<Book>())?;
        assert_eq!(registry.types(), before);
        Ok(())
    }

    #[test]
    fn test_unsupported_type_registers_nothing() {
        let registry = TypeRegistry::new();
        let result = registry.register(ClassRef::of::<Broken>());

        assert!(matches!(result, Err(MapperError::UnsupportedType(_))));
        assert!(!registry.is_registered(ClassRef::of::<Broken>()));
        assert!(
            registry
                .check(ClassRef::of::<Broken>())
                .is_err_and(|e| matches!(e, MapperError::UnregisteredType(_)))
        );
    }

    #[test]
    fn test_lookup_by_name() -> Result<()> {
        let registry = TypeRegistry::new();
        registry.register(ClassRef::of::<Library>())?;

        let book = ClassRef::of::<Book>();
        assert_eq!(registry.class_by_name(book.type_path()), Some(book));
        assert_eq!(registry.class_by_name("unknown::Type"), None);
        assert_eq!(registry.type_name(ClassRef::of::<Library>()), "libraries");
        assert_eq!(registry.type_name(book), "book");
        Ok(())
    }
}
