//! Type identity, runtime entity handles and per-type descriptors.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use log::warn;

use crate::descriptor::options::{PayloadOptions, RootOptions, SchemaOptions};
use crate::descriptor::property::PropertyDescriptor;
use crate::value::PropertyValue;

/// A type that can describe its own mapping.
///
/// Implemented by every mapped concrete type, and by abstract families
/// (`dyn Trait`) through [`polymorphic!`](crate::polymorphic).
pub trait Describe: 'static {
    /// Build the static descriptor of this type.
    fn describe() -> TypeDescriptor;
}

/// Object-safe handle on a mapped instance.
///
/// Implemented for every sized [`Describe`] type. [`Entity::class`] always
/// reports the exact runtime type, which is what makes documents polymorphic.
pub trait Entity: Any + Send + Sync + fmt::Debug {
    /// The runtime class of this object.
    fn class(&self) -> ClassRef;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_entity(&self) -> &dyn Entity;
}

impl<T> Entity for T
where
    T: Describe + fmt::Debug + Send + Sync,
{
    fn class(&self) -> ClassRef {
        ClassRef::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn as_entity(&self) -> &dyn Entity {
        self
    }
}

/// Creates a default instance of a concrete type.
pub type Factory = fn() -> Box<dyn Entity>;

fn construct<T>() -> Box<dyn Entity>
where
    T: Describe + Default + fmt::Debug + Send + Sync,
{
    Box::new(T::default())
}

/// Identity of a mapped type.
///
/// Equality and hashing use the [`TypeId`]; the fully qualified type path is
/// the value written into the discriminator field.
#[derive(Clone, Copy)]
pub struct ClassRef {
    type_id: TypeId,
    type_path: &'static str,
    describe: fn() -> TypeDescriptor,
}

impl ClassRef {
    pub fn of<T: ?Sized + Describe>() -> Self {
        ClassRef {
            type_id: TypeId::of::<T>(),
            type_path: type_name::<T>(),
            describe: T::describe,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified type path, e.g. `app::model::Tweet`.
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Last path segment without generic arguments, e.g. `Tweet`.
    pub fn simple_name(&self) -> &'static str {
        let path = self.type_path;
        let path = path.strip_prefix("dyn ").unwrap_or(path);
        let path = path.split('<').next().unwrap_or(path);
        path.rsplit("::").next().unwrap_or(path)
    }

    /// Build the descriptor of this type.
    pub fn describe(&self) -> TypeDescriptor {
        (self.describe)()
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassRef").field(&self.type_path).finish()
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_path)
    }
}

/// Static description of a mapped type.
///
/// Built once per type through [`TypeDescriptor::builder`] (concrete types)
/// or [`TypeDescriptor::family`] (abstract families).
#[derive(Clone)]
pub struct TypeDescriptor {
    class: ClassRef,
    root: Option<RootOptions>,
    properties: Vec<PropertyDescriptor>,
    factory: Option<Factory>,
    subtypes: Vec<ClassRef>,
}

// Manual Debug implementation to skip the accessor closures
impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("class", &self.class)
            .field("root", &self.root)
            .field("properties", &self.properties)
            .field("abstract", &self.factory.is_none())
            .field("subtypes", &self.subtypes)
            .finish()
    }
}

impl TypeDescriptor {
    /// Start describing a concrete type, instantiable through `Default`.
    pub fn builder<T>() -> TypeBuilder<T>
    where
        T: Describe + Default + fmt::Debug + Send + Sync,
    {
        TypeBuilder::new(ClassRef::of::<T>(), Some(construct::<T> as Factory))
    }

    /// Start describing an abstract family, typically `dyn Trait`.
    ///
    /// Families have no factory; documents declared as a family are read
    /// through the concrete subtype named by their discriminator.
    pub fn family<T: ?Sized + Describe>() -> TypeBuilder<T> {
        TypeBuilder::new(ClassRef::of::<T>(), None)
    }

    pub fn class(&self) -> ClassRef {
        self.class
    }

    pub fn type_path(&self) -> &'static str {
        self.class.type_path()
    }

    pub fn root(&self) -> Option<&RootOptions> {
        self.root.as_ref()
    }

    pub fn is_root_entity(&self) -> bool {
        self.root.is_some()
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|property| property.name() == name)
    }

    pub fn factory(&self) -> Option<Factory> {
        self.factory
    }

    pub fn is_abstract(&self) -> bool {
        self.factory.is_none()
    }

    pub fn subtypes(&self) -> &[ClassRef] {
        &self.subtypes
    }
}

/// A builder for constructing type descriptors in a fluent manner.
///
/// Declarations (`schema`, `payload`, `exclude`) apply to the property added last.
pub struct TypeBuilder<T: ?Sized + 'static> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized + Describe> TypeBuilder<T> {
    fn new(class: ClassRef, factory: Option<Factory>) -> Self {
        TypeBuilder {
            descriptor: TypeDescriptor {
                class,
                root: None,
                properties: Vec::new(),
                factory,
                subtypes: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    /// Mark the type as a root entity.
    pub fn root_entity(self) -> Self {
        self.root_entity_with(RootOptions::default())
    }

    /// Mark the type as a root entity with explicit options.
    pub fn root_entity_with(mut self, options: RootOptions) -> Self {
        self.descriptor.root = Some(options);
        self
    }

    /// Add a concrete subtype to an abstract family.
    pub fn subtype<S: ?Sized + Describe>(mut self) -> Self {
        let class = ClassRef::of::<S>();
        if !self.descriptor.subtypes.contains(&class) {
            self.descriptor.subtypes.push(class);
        }
        self
    }

    /// Add a prepared property descriptor.
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.descriptor.properties.push(property);
        self
    }

    /// Attach a schema declaration to the last property.
    pub fn schema(self, options: SchemaOptions) -> Self {
        self.map_last("schema", |property| property.with_schema(options))
    }

    /// Attach a payload declaration to the last property.
    pub fn payload(self, options: PayloadOptions) -> Self {
        self.map_last("payload", |property| property.with_payload(options))
    }

    /// Explicitly exclude the last property.
    pub fn exclude(self) -> Self {
        self.map_last("exclude", PropertyDescriptor::with_exclude)
    }

    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }

    fn map_last<F>(mut self, declaration: &str, apply: F) -> Self
    where
        F: FnOnce(PropertyDescriptor) -> PropertyDescriptor,
    {
        match self.descriptor.properties.pop() {
            Some(last) => self.descriptor.properties.push(apply(last)),
            None => warn!(
                "The {} declaration on type [{}] precedes any property and will be ignored",
                declaration,
                self.descriptor.class
            ),
        }
        self
    }
}

impl<T: Describe> TypeBuilder<T> {
    /// Add a readable and writable property backed by a field lens.
    pub fn field<V, G, M>(self, name: &str, get: G, get_mut: M) -> Self
    where
        V: PropertyValue,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.property(PropertyDescriptor::field(name, get, get_mut))
    }

    /// Add a property without write accessor. It never takes part in mapping.
    pub fn read_only<V, G>(self, name: &str, get: G) -> Self
    where
        V: PropertyValue,
        G: Fn(&T) -> &V + Send + Sync + 'static,
    {
        self.property(PropertyDescriptor::read_only(name, get))
    }
}
