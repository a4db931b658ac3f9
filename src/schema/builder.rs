//! Schema generation for registered types.

use std::any::TypeId;
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;
use parking_lot::RwLock;

use crate::descriptor::ClassRef;
use crate::error::{MapperError, Result};
use crate::registry::TypeRegistry;
use crate::schema::field::{FieldMapping, LeafField, ObjectField};
use crate::schema::schema::{Properties, Schema};
use crate::signature::SignatureLeaf;

/// Per-type field sets, without the discriminator field.
pub type SchemaCache = RwLock<AHashMap<TypeId, Arc<Properties>>>;

/// Builds schemas from the resolved attributes and signatures of a registry.
#[derive(Debug, Clone, Copy)]
pub struct SchemaBuilder<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        SchemaBuilder { registry }
    }

    /// Build the schema of a registered type.
    ///
    /// Nested object properties are expanded recursively. A type graph that
    /// reaches a type again while expanding it is rejected.
    pub fn build(&self, class: ClassRef) -> Result<Schema> {
        self.registry.check(class)?;
        let properties = self.with_discriminator(class, &mut Vec::new())?;
        Ok(Schema::new(self.registry.type_name(class), properties))
    }

    fn with_discriminator(&self, class: ClassRef, path: &mut Vec<ClassRef>) -> Result<Properties> {
        let cached = self.class_properties(class, path)?;
        let mut properties = Properties::clone(&cached);
        properties.insert(
            self.registry.config().discriminator_field.as_str(),
            FieldMapping::Leaf(LeafField::discriminator()),
        );
        Ok(properties)
    }

    fn class_properties(
        &self,
        class: ClassRef,
        path: &mut Vec<ClassRef>,
    ) -> Result<Arc<Properties>> {
        if let Some(properties) = self.registry.schemas().read().get(&class.type_id()) {
            return Ok(Arc::clone(properties));
        }

        if let Some(start) = path.iter().position(|entry| *entry == class) {
            let cycle = path[start..]
                .iter()
                .chain(std::iter::once(&class))
                .map(ClassRef::type_path);
            return Err(MapperError::recursive_schema(cycle));
        }

        self.registry.check(class)?;
        path.push(class);
        let expanded = self.expand(class, path);
        path.pop();
        let computed = Arc::new(expanded?);

        let mut schemas = self.registry.schemas().write();
        let published = schemas.entry(class.type_id()).or_insert_with(|| {
            debug!("Built {} schema fields of type [{}]", computed.len(), class);
            Arc::clone(&computed)
        });
        Ok(Arc::clone(published))
    }

    fn expand(&self, class: ClassRef, path: &mut Vec<ClassRef>) -> Result<Properties> {
        let attributes = self.registry.attributes().properties(class);
        let mut properties = Properties::new();

        for property in attributes.schema_properties() {
            let signature = self
                .registry
                .signatures()
                .property(class, property.descriptor())?;
            let field = match signature.leaf() {
                SignatureLeaf::Scalar(kind) => FieldMapping::Leaf(LeafField::from_options(
                    kind,
                    property.policy().schema(),
                    property.policy().payload(),
                )),
                SignatureLeaf::Object(nested) => {
                    FieldMapping::Object(ObjectField::new(self.with_discriminator(nested, path)?))
                }
            };
            properties.insert(property.display_name(), field);
        }

        // Abstract families describe the union of their subtypes.
        if attributes.is_abstract() {
            for subtype in attributes.subtypes() {
                let fields = self.class_properties(*subtype, path)?;
                for (name, field) in fields.iter() {
                    properties.insert(name, field.clone());
                }
            }
        }

        Ok(properties)
    }
}
