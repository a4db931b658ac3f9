//! Runtime property values.
//!
//! Read accessors produce a borrowed [`FieldRef`] (no deep copies of the
//! object graph), write accessors consume an owned [`FieldValue`]. The
//! [`PropertyValue`] trait converts between these and concrete Rust types,
//! and reports the declared type of a property.
//!
//! # Supported Types
//!
//! - **Scalars** - `bool`, `i16`, `i32`, `i64`, `f32`, `f64`, `String`,
//!   `DateTime<Utc>`, `Url`
//! - **Optional values** - `Option<T>` (absent values map to null)
//! - **Arrays** - `Box<[T]>`
//! - **Ordered collections** - `Vec<T>`, `VecDeque<T>`, `HashSet<T>`, `BTreeSet<T>`
//! - **Nested objects** - `Box<T>` for mapped `T`, `Box<dyn Trait>` through
//!   [`polymorphic!`](crate::polymorphic)

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::Hash;

use chrono::{DateTime, Utc};
use url::Url;

use crate::descriptor::{ClassRef, CollectionInterface, DeclaredType, Describe, Entity};
use crate::error::{MapperError, Result};
use crate::signature::ScalarKind;

/// A borrowed view of a property value.
#[derive(Debug, Clone)]
pub enum FieldRef<'a> {
    Null,
    Boolean(bool),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(&'a str),
    Date(DateTime<Utc>),
    Uri(&'a Url),
    Sequence(Vec<FieldRef<'a>>),
    Object(&'a dyn Entity),
}

impl FieldRef<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldRef::Null)
    }

    /// Name of the value kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldRef::Null => "null",
            FieldRef::Boolean(_) => "boolean",
            FieldRef::Short(_) => "short",
            FieldRef::Integer(_) => "integer",
            FieldRef::Long(_) => "long",
            FieldRef::Float(_) => "float",
            FieldRef::Double(_) => "double",
            FieldRef::String(_) => "string",
            FieldRef::Date(_) => "date",
            FieldRef::Uri(_) => "uri",
            FieldRef::Sequence(_) => "sequence",
            FieldRef::Object(_) => "object",
        }
    }
}

/// An owned property value.
#[derive(Debug)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Date(DateTime<Utc>),
    Uri(Url),
    Sequence(Vec<FieldValue>),
    Object(Box<dyn Entity>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Name of the value kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Short(_) => "short",
            FieldValue::Integer(_) => "integer",
            FieldValue::Long(_) => "long",
            FieldValue::Float(_) => "float",
            FieldValue::Double(_) => "double",
            FieldValue::String(_) => "string",
            FieldValue::Date(_) => "date",
            FieldValue::Uri(_) => "uri",
            FieldValue::Sequence(_) => "sequence",
            FieldValue::Object(_) => "object",
        }
    }

    /// Unwrap a nested object, failing for any other kind.
    pub fn into_entity(self, expected: &str) -> Result<Box<dyn Entity>> {
        match self {
            FieldValue::Object(entity) => Ok(entity),
            other => Err(unexpected(expected, &other)),
        }
    }

    /// Unwrap a sequence, failing for any other kind.
    pub fn into_sequence(self, expected: &str) -> Result<Vec<FieldValue>> {
        match self {
            FieldValue::Sequence(items) => Ok(items),
            other => Err(unexpected(expected, &other)),
        }
    }
}

fn unexpected(expected: &str, found: &FieldValue) -> MapperError {
    MapperError::value(format!(
        "expected a value of type [{expected}], found {}",
        found.kind_name()
    ))
}

/// Conversion between a Rust property type and runtime field values.
pub trait PropertyValue: Sized + 'static {
    /// The declared type reported to the signature resolver.
    fn declared_type() -> DeclaredType;

    fn to_field(&self) -> FieldRef<'_>;

    fn from_field(value: FieldValue) -> Result<Self>;
}

macro_rules! impl_scalar {
    ($ty:ty, $kind:ident, |$value:ident| $borrow:expr) => {
        impl PropertyValue for $ty {
            fn declared_type() -> DeclaredType {
                DeclaredType::Scalar(ScalarKind::$kind)
            }

            fn to_field(&self) -> FieldRef<'_> {
                let $value = self;
                $borrow
            }

            fn from_field(value: FieldValue) -> Result<Self> {
                match value {
                    FieldValue::$kind(inner) => Ok(inner),
                    other => Err(unexpected(stringify!($ty), &other)),
                }
            }
        }
    };
}

impl_scalar!(bool, Boolean, |v| FieldRef::Boolean(*v));
impl_scalar!(i16, Short, |v| FieldRef::Short(*v));
impl_scalar!(i32, Integer, |v| FieldRef::Integer(*v));
impl_scalar!(i64, Long, |v| FieldRef::Long(*v));
impl_scalar!(f32, Float, |v| FieldRef::Float(*v));
impl_scalar!(f64, Double, |v| FieldRef::Double(*v));
impl_scalar!(String, String, |v| FieldRef::String(v.as_str()));
impl_scalar!(DateTime<Utc>, Date, |v| FieldRef::Date(*v));
impl_scalar!(Url, Uri, |v| FieldRef::Uri(v));

impl<T: PropertyValue> PropertyValue for Option<T> {
    fn declared_type() -> DeclaredType {
        T::declared_type()
    }

    fn to_field(&self) -> FieldRef<'_> {
        match self {
            Some(value) => value.to_field(),
            None => FieldRef::Null,
        }
    }

    fn from_field(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Null => Ok(None),
            value => T::from_field(value).map(Some),
        }
    }
}

fn from_sequence<T, C>(value: FieldValue, expected: &str) -> Result<C>
where
    T: PropertyValue,
    C: FromIterator<T>,
{
    value
        .into_sequence(expected)?
        .into_iter()
        .map(T::from_field)
        .collect()
}

impl<T: PropertyValue> PropertyValue for Vec<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::collection(CollectionInterface::List, T::declared_type())
    }

    fn to_field(&self) -> FieldRef<'_> {
        FieldRef::Sequence(self.iter().map(T::to_field).collect())
    }

    fn from_field(value: FieldValue) -> Result<Self> {
        from_sequence(value, "Vec")
    }
}

impl<T: PropertyValue> PropertyValue for VecDeque<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::collection(CollectionInterface::Queue, T::declared_type())
    }

    fn to_field(&self) -> FieldRef<'_> {
        FieldRef::Sequence(self.iter().map(T::to_field).collect())
    }

    fn from_field(value: FieldValue) -> Result<Self> {
        from_sequence(value, "VecDeque")
    }
}

impl<T: PropertyValue + Eq + Hash> PropertyValue for HashSet<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::collection(CollectionInterface::Set, T::declared_type())
    }

    fn to_field(&self) -> FieldRef<'_> {
        FieldRef::Sequence(self.iter().map(T::to_field).collect())
    }

    fn from_field(value: FieldValue) -> Result<Self> {
        from_sequence(value, "HashSet")
    }
}

impl<T: PropertyValue + Ord> PropertyValue for BTreeSet<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::collection(CollectionInterface::Set, T::declared_type())
    }

    fn to_field(&self) -> FieldRef<'_> {
        FieldRef::Sequence(self.iter().map(T::to_field).collect())
    }

    fn from_field(value: FieldValue) -> Result<Self> {
        from_sequence(value, "BTreeSet")
    }
}

impl<T: PropertyValue> PropertyValue for Box<[T]> {
    fn declared_type() -> DeclaredType {
        DeclaredType::array(T::declared_type())
    }

    fn to_field(&self) -> FieldRef<'_> {
        FieldRef::Sequence(self.iter().map(T::to_field).collect())
    }

    fn from_field(value: FieldValue) -> Result<Self> {
        from_sequence::<T, Vec<T>>(value, "array").map(Vec::into_boxed_slice)
    }
}

impl<T> PropertyValue for Box<T>
where
    T: Describe + std::fmt::Debug + Send + Sync,
{
    fn declared_type() -> DeclaredType {
        DeclaredType::Class(ClassRef::of::<T>())
    }

    fn to_field(&self) -> FieldRef<'_> {
        FieldRef::Object(&**self)
    }

    fn from_field(value: FieldValue) -> Result<Self> {
        let class = ClassRef::of::<T>();
        let entity = value.into_entity(class.type_path())?;
        let found = entity.class();
        entity.into_any().downcast::<T>().map_err(|_| {
            MapperError::value(format!(
                "expected an object of type [{class}], found [{found}]"
            ))
        })
    }
}
