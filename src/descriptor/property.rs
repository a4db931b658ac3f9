//! Property descriptors and declared property types.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::descriptor::class::ClassRef;
use crate::descriptor::options::{PayloadOptions, SchemaOptions};
use crate::error::{MapperError, Result};
use crate::signature::ScalarKind;
use crate::value::{FieldRef, FieldValue, PropertyValue};

/// Read accessor of a property.
pub type Getter = Arc<dyn for<'a> Fn(&'a dyn Any) -> Result<FieldRef<'a>> + Send + Sync>;

/// Write accessor of a property.
pub type Setter = Arc<dyn Fn(&mut dyn Any, FieldValue) -> Result<()> + Send + Sync>;

/// Collection capability a property is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionInterface {
    List,
    Set,
    Queue,
}

/// The declared type of a property, before signature resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    Scalar(ScalarKind),
    Array(Box<DeclaredType>),
    /// `element` is `None` for a raw collection without element type.
    Collection {
        interface: CollectionInterface,
        element: Option<Box<DeclaredType>>,
    },
    Class(ClassRef),
}

impl DeclaredType {
    pub fn array(element: DeclaredType) -> Self {
        DeclaredType::Array(Box::new(element))
    }

    pub fn collection(interface: CollectionInterface, element: DeclaredType) -> Self {
        DeclaredType::Collection {
            interface,
            element: Some(Box::new(element)),
        }
    }

    pub fn raw_collection(interface: CollectionInterface) -> Self {
        DeclaredType::Collection {
            interface,
            element: None,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Scalar(kind) => write!(f, "{kind}"),
            DeclaredType::Array(element) => write!(f, "[{element}]"),
            DeclaredType::Collection { interface, element } => {
                write!(f, "{interface:?}")?;
                match element {
                    Some(element) => write!(f, "<{element}>"),
                    None => Ok(()),
                }
            }
            DeclaredType::Class(class) => write!(f, "{class}"),
        }
    }
}

/// Box a read accessor closure.
pub fn getter<F>(f: F) -> Getter
where
    F: for<'a> Fn(&'a dyn Any) -> Result<FieldRef<'a>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Box a write accessor closure.
pub fn setter<F>(f: F) -> Setter
where
    F: Fn(&mut dyn Any, FieldValue) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn owner_mismatch<T: ?Sized>(property: &str) -> MapperError {
    MapperError::value(format!(
        "accessor of property '{property}' expects an object of type [{}]",
        type_name::<T>()
    ))
}

/// A named attribute of a mapped type.
///
/// Carries the declared type, a read accessor, an optional write accessor
/// and the declarations the attribute resolver evaluates.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: String,
    declared: DeclaredType,
    getter: Getter,
    setter: Option<Setter>,
    excluded: bool,
    schema: Option<SchemaOptions>,
    payload: Option<PayloadOptions>,
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("writable", &self.setter.is_some())
            .field("excluded", &self.excluded)
            .field("schema", &self.schema)
            .field("payload", &self.payload)
            .finish()
    }
}

impl PropertyDescriptor {
    /// Create a property from explicit accessors.
    pub fn new<S: Into<String>>(
        name: S,
        declared: DeclaredType,
        getter: Getter,
        setter: Option<Setter>,
    ) -> Self {
        PropertyDescriptor {
            name: name.into(),
            declared,
            getter,
            setter,
            excluded: false,
            schema: None,
            payload: None,
        }
    }

    /// Create a property backed by a field lens.
    ///
    /// The declared type and both accessors are derived from `V`.
    pub fn field<T, V, G, M>(name: &str, get: G, get_mut: M) -> Self
    where
        T: Any,
        V: PropertyValue,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        let write_name = name.to_owned();
        let setter = setter(move |object: &mut dyn Any, value: FieldValue| {
            let this = object
                .downcast_mut::<T>()
                .ok_or_else(|| owner_mismatch::<T>(&write_name))?;
            *get_mut(this) = V::from_field(value)?;
            Ok(())
        });

        let mut property = Self::read_only(name, get);
        property.setter = Some(setter);
        property
    }

    /// Create a property without write accessor.
    pub fn read_only<T, V, G>(name: &str, get: G) -> Self
    where
        T: Any,
        V: PropertyValue,
        G: Fn(&T) -> &V + Send + Sync + 'static,
    {
        let read_name = name.to_owned();
        let getter = getter(move |object: &dyn Any| {
            let this = object
                .downcast_ref::<T>()
                .ok_or_else(|| owner_mismatch::<T>(&read_name))?;
            Ok(get(this).to_field())
        });

        Self::new(name, V::declared_type(), getter, None)
    }

    /// Explicitly exclude this property from schema and payload.
    pub fn with_exclude(mut self) -> Self {
        self.excluded = true;
        self
    }

    pub fn with_schema(mut self, options: SchemaOptions) -> Self {
        self.schema = Some(options);
        self
    }

    pub fn with_payload(mut self, options: PayloadOptions) -> Self {
        self.payload = Some(options);
        self
    }

    /// Raw property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Whether exclusion is declared explicitly.
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// The explicit schema declaration, if any.
    pub fn schema(&self) -> Option<&SchemaOptions> {
        self.schema.as_ref()
    }

    /// The explicit payload declaration, if any.
    pub fn payload(&self) -> Option<&PayloadOptions> {
        self.payload.as_ref()
    }

    /// Read the property value from `object`.
    pub fn read<'a>(&self, object: &'a dyn Any) -> Result<FieldRef<'a>> {
        (self.getter)(object)
    }

    /// Write `value` into the property of `object`.
    pub fn write(&self, object: &mut dyn Any, value: FieldValue) -> Result<()> {
        match &self.setter {
            Some(setter) => setter(object, value),
            None => Err(MapperError::value(format!(
                "property '{}' has no write accessor",
                self.name
            ))),
        }
    }
}
