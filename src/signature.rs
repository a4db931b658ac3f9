//! Type signature resolution.
//!
//! A [`TypeSignature`] is the structural shape of a declared property type:
//! a scalar, an array or collection of a nested signature, or a mapped
//! object. Scalar and object signatures are interned and shared; array and
//! collection signatures are created on each resolution.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::descriptor::{ClassRef, CollectionInterface, DeclaredType, PropertyDescriptor};
use crate::error::{MapperError, Result};

/// Built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Boolean,
    Short,
    Integer,
    Long,
    Float,
    Double,
    String,
    Date,
    Uri,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Boolean => "boolean",
            ScalarKind::Short => "short",
            ScalarKind::Integer => "integer",
            ScalarKind::Long => "long",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::String => "string",
            ScalarKind::Date => "date",
            ScalarKind::Uri => "uri",
        }
    }

    /// Field type name used in schemas. URIs are described as strings.
    pub fn schema_type(&self) -> &'static str {
        match self {
            ScalarKind::Uri => "string",
            kind => kind.as_str(),
        }
    }

    /// String and URI scalars carry text.
    pub fn is_textual(&self) -> bool {
        matches!(self, ScalarKind::String | ScalarKind::Uri)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container used to rebuild a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Set-like collections, rebuilt without duplicates.
    HashSet,
    /// List-like and queue-like collections, rebuilt in order.
    List,
}

/// The terminal element of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureLeaf {
    Scalar(ScalarKind),
    Object(ClassRef),
}

/// Structural shape of a property type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Scalar(ScalarKind),
    Array(Arc<TypeSignature>),
    Collection {
        element: Arc<TypeSignature>,
        container: ContainerKind,
    },
    Object(ClassRef),
}

impl TypeSignature {
    /// The element signature of an array or collection.
    pub fn element(&self) -> Option<&Arc<TypeSignature>> {
        match self {
            TypeSignature::Array(element) => Some(element),
            TypeSignature::Collection { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        self.element().is_some()
    }

    /// Follow element signatures down to the scalar or object at the bottom.
    pub fn leaf(&self) -> SignatureLeaf {
        match self {
            TypeSignature::Scalar(kind) => SignatureLeaf::Scalar(*kind),
            TypeSignature::Object(class) => SignatureLeaf::Object(*class),
            TypeSignature::Array(element) => element.leaf(),
            TypeSignature::Collection { element, .. } => element.leaf(),
        }
    }

    /// The object class at the bottom of this signature, if any.
    pub fn nested_class(&self) -> Option<ClassRef> {
        match self.leaf() {
            SignatureLeaf::Object(class) => Some(class),
            SignatureLeaf::Scalar(_) => None,
        }
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Scalar(kind) => write!(f, "{kind}"),
            TypeSignature::Array(element) => write!(f, "[{element}]"),
            TypeSignature::Collection { element, container } => {
                write!(f, "{container:?}<{element}>")
            }
            TypeSignature::Object(class) => write!(f, "{}", class.simple_name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SignatureKey {
    Scalar(ScalarKind),
    Class(TypeId),
}

/// Maps declared property types to signatures.
///
/// Safe for concurrent use. Interned signatures are inserted if absent: when
/// two threads race on the same key, the first stored signature wins and both
/// callers receive it.
#[derive(Debug, Default)]
pub struct SignatureResolver {
    interned: RwLock<AHashMap<SignatureKey, Arc<TypeSignature>>>,
    properties: RwLock<AHashMap<TypeId, AHashMap<String, Arc<TypeSignature>>>>,
}

impl SignatureResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a declared type to its signature.
    pub fn resolve(&self, declared: &DeclaredType) -> Result<Arc<TypeSignature>> {
        match declared {
            DeclaredType::Scalar(kind) => Ok(self.intern(SignatureKey::Scalar(*kind), || {
                TypeSignature::Scalar(*kind)
            })),
            DeclaredType::Class(class) => {
                let class = *class;
                Ok(self.intern(SignatureKey::Class(class.type_id()), || {
                    TypeSignature::Object(class)
                }))
            }
            DeclaredType::Array(element) => {
                let element = self.resolve(element)?;
                Ok(Arc::new(TypeSignature::Array(element)))
            }
            DeclaredType::Collection { interface, element } => {
                let element = element.as_ref().ok_or_else(|| {
                    MapperError::unsupported_type(format!(
                        "raw collection {declared} has no element type"
                    ))
                })?;
                let element = self.resolve(element)?;
                let container = match interface {
                    CollectionInterface::Set => ContainerKind::HashSet,
                    CollectionInterface::List | CollectionInterface::Queue => ContainerKind::List,
                };
                Ok(Arc::new(TypeSignature::Collection { element, container }))
            }
        }
    }

    /// Resolve the signature of a property of `owner`, cached per property.
    pub fn property(
        &self,
        owner: ClassRef,
        property: &PropertyDescriptor,
    ) -> Result<Arc<TypeSignature>> {
        if let Some(signature) = self
            .properties
            .read()
            .get(&owner.type_id())
            .and_then(|by_name| by_name.get(property.name()))
        {
            return Ok(Arc::clone(signature));
        }

        let signature = self.resolve(property.declared_type()).map_err(|e| match e {
            MapperError::UnsupportedType(reason) => MapperError::unsupported_type(format!(
                "property '{}' of type [{}]: {}",
                property.name(),
                owner,
                reason
            )),
            other => other,
        })?;

        let mut properties = self.properties.write();
        let stored = properties
            .entry(owner.type_id())
            .or_default()
            .entry(property.name().to_owned())
            .or_insert(signature);
        Ok(Arc::clone(stored))
    }

    fn intern<F>(&self, key: SignatureKey, create: F) -> Arc<TypeSignature>
    where
        F: FnOnce() -> TypeSignature,
    {
        if let Some(signature) = self.interned.read().get(&key) {
            return Arc::clone(signature);
        }

        let mut interned = self.interned.write();
        let signature = interned.entry(key).or_insert_with(|| {
            let signature = create();
            debug!("Interned signature [{}]", signature);
            Arc::new(signature)
        });
        Arc::clone(signature)
    }
}
