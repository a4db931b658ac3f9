//! Static type descriptors.
//!
//! A mapped type describes itself once through [`Describe`]: its properties
//! with their accessors and declarations, whether it is a root entity, how
//! to instantiate it, and (for abstract families) its concrete subtypes.

pub mod class;
pub mod options;
mod polymorphic;
pub mod property;

pub use class::{ClassRef, Describe, Entity, Factory, TypeBuilder, TypeDescriptor};
pub use options::{IndexMode, PayloadOptions, RootOptions, SchemaOptions, TermVector};
pub use property::{
    CollectionInterface, DeclaredType, Getter, PropertyDescriptor, Setter, getter, setter,
};
