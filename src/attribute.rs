//! Attribute policy resolution.
//!
//! Decides, for every property of a type, whether it takes part in the
//! generated schema, in serialized documents, or in neither. Results are
//! computed once per type and cached for the lifetime of the resolver.
//!
//! The precedence rules, evaluated per property:
//!
//! 1. A property without write accessor is excluded (warning).
//! 2. An explicit exclusion wins; other declarations on the same property
//!    are reported as conflicts.
//! 3. An explicit schema or payload declaration makes the property visible
//!    on that side with the declared options.
//! 4. A property of a root entity is implicitly visible on both sides.
//! 5. A payload declaration without schema declaration implies a stored,
//!    unsearchable schema field; a schema declaration without payload
//!    declaration implies default payload options.
//! 6. A property visible on neither side is excluded.

use std::any::TypeId;
use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, warn};
use parking_lot::{Mutex, RwLock};

use crate::config::MapperConfig;
use crate::descriptor::{
    ClassRef, Factory, PayloadOptions, PropertyDescriptor, RootOptions, SchemaOptions,
};
use crate::diagnostic::Diagnostic;

/// Resolved visibility of a property.
///
/// Schema visibility always implies payload visibility.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributePolicy {
    schema: Option<SchemaOptions>,
    payload: Option<PayloadOptions>,
}

impl AttributePolicy {
    /// A policy for a property that takes part in nothing.
    pub fn excluded() -> Self {
        Self::default()
    }

    pub fn schema(&self) -> Option<&SchemaOptions> {
        self.schema.as_ref()
    }

    pub fn payload(&self) -> Option<&PayloadOptions> {
        self.payload.as_ref()
    }

    pub fn is_schema_visible(&self) -> bool {
        self.schema.is_some()
    }

    pub fn is_payload_visible(&self) -> bool {
        self.payload.is_some()
    }

    pub fn is_excluded(&self) -> bool {
        self.schema.is_none() && self.payload.is_none()
    }
}

/// A property together with its resolved display name and policy.
#[derive(Debug, Clone)]
pub struct ResolvedProperty {
    descriptor: PropertyDescriptor,
    display_name: String,
    policy: AttributePolicy,
}

impl ResolvedProperty {
    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    /// Raw property name.
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Name used for the field in schemas and documents.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn policy(&self) -> &AttributePolicy {
        &self.policy
    }
}

/// Cached attributes of one type.
#[derive(Debug)]
pub struct ClassAttributes {
    class: ClassRef,
    root: Option<RootOptions>,
    factory: Option<Factory>,
    subtypes: Vec<ClassRef>,
    properties: Vec<Arc<ResolvedProperty>>,
    by_name: AHashMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl ClassAttributes {
    pub fn class(&self) -> ClassRef {
        self.class
    }

    pub fn root(&self) -> Option<&RootOptions> {
        self.root.as_ref()
    }

    pub fn is_root_entity(&self) -> bool {
        self.root.is_some()
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

    /// Every declared property in declaration order, excluded ones included.
    pub fn properties(&self) -> &[Arc<ResolvedProperty>] {
        &self.properties
    }

    /// Properties carried in documents, in declaration order.
    pub fn payload_properties(&self) -> impl Iterator<Item = &Arc<ResolvedProperty>> {
        self.properties
            .iter()
            .filter(|property| property.policy.is_payload_visible())
    }

    /// Properties described in schemas, in declaration order.
    pub fn schema_properties(&self) -> impl Iterator<Item = &Arc<ResolvedProperty>> {
        self.properties
            .iter()
            .filter(|property| property.policy.is_schema_visible())
    }

    /// Look up a mapped property by display name.
    pub fn property(&self, display_name: &str) -> Option<&Arc<ResolvedProperty>> {
        self.by_name
            .get(display_name)
            .map(|index| &self.properties[*index])
    }

    /// Diagnostics found while resolving this type.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    // The discriminator field name is reserved and counts as taken.
    fn resolve(class: ClassRef, discriminator: &str) -> Self {
        let descriptor = class.describe();
        let root = descriptor.root().cloned();
        let is_root = root.is_some();
        let mut diagnostics = Vec::new();
        let mut properties = Vec::with_capacity(descriptor.properties().len());
        let mut by_name = AHashMap::new();

        for property in descriptor.properties() {
            let mut policy = resolve_policy(class, is_root, property, &mut diagnostics);
            let display_name = display_name(property);

            if !policy.is_excluded() {
                if display_name == discriminator || by_name.contains_key(&display_name) {
                    report(
                        &mut diagnostics,
                        Diagnostic::DuplicateName {
                            type_path: class.type_path().to_string(),
                            name: display_name.clone(),
                        },
                    );
                    policy = AttributePolicy::excluded();
                } else {
                    by_name.insert(display_name.clone(), properties.len());
                }
            }

            properties.push(Arc::new(ResolvedProperty {
                descriptor: property.clone(),
                display_name,
                policy,
            }));
        }

        ClassAttributes {
            class,
            root,
            factory: descriptor.factory(),
            subtypes: descriptor.subtypes().to_vec(),
            properties,
            by_name,
            diagnostics,
        }
    }
}

fn display_name(property: &PropertyDescriptor) -> String {
    property
        .schema()
        .and_then(SchemaOptions::display_name)
        .or_else(|| property.payload().and_then(PayloadOptions::display_name))
        .unwrap_or(property.name())
        .to_string()
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}

fn resolve_policy(
    class: ClassRef,
    is_root: bool,
    property: &PropertyDescriptor,
    diagnostics: &mut Vec<Diagnostic>,
) -> AttributePolicy {
    if !property.is_writable() {
        report(
            diagnostics,
            Diagnostic::NoWriteAccessor {
                type_path: class.type_path().to_string(),
                property: property.name().to_string(),
            },
        );
        return AttributePolicy::excluded();
    }

    if property.is_excluded() {
        let declared = [
            ("schema", property.schema().is_some()),
            ("payload", property.payload().is_some()),
        ];
        for (ignored, _) in declared.into_iter().filter(|(_, present)| *present) {
            report(
                diagnostics,
                Diagnostic::ConflictingDeclaration {
                    type_path: class.type_path().to_string(),
                    property: property.name().to_string(),
                    ignored: ignored.to_string(),
                },
            );
        }
        return AttributePolicy::excluded();
    }

    let schema = match (property.schema(), property.payload()) {
        (Some(declared), _) => Some(declared.clone()),
        (None, _) if is_root => Some(SchemaOptions::default()),
        (None, Some(_)) => Some(SchemaOptions::stored_only()),
        (None, None) => None,
    };

    let payload = match property.payload() {
        Some(declared) => Some(declared.clone()),
        None if is_root || property.schema().is_some() => Some(PayloadOptions::default()),
        None => None,
    };

    AttributePolicy { schema, payload }
}

/// Resolves and caches attribute policies per type.
///
/// Safe for concurrent use: concurrent first resolutions of the same type may
/// both compute, the first published result wins and only its diagnostics
/// are recorded.
#[derive(Debug)]
pub struct AttributeResolver {
    discriminator: String,
    classes: RwLock<AHashMap<TypeId, Arc<ClassAttributes>>>,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl Default for AttributeResolver {
    fn default() -> Self {
        Self::with_discriminator(MapperConfig::default().discriminator_field)
    }
}

impl AttributeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver reserving `discriminator` as a field name.
    pub fn with_discriminator<S: Into<String>>(discriminator: S) -> Self {
        AttributeResolver {
            discriminator: discriminator.into(),
            classes: RwLock::new(AHashMap::new()),
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    /// The resolved attributes of `class`.
    pub fn properties(&self, class: ClassRef) -> Arc<ClassAttributes> {
        if let Some(attributes) = self.classes.read().get(&class.type_id()) {
            return Arc::clone(attributes);
        }

        let computed = Arc::new(ClassAttributes::resolve(class, &self.discriminator));

        let mut classes = self.classes.write();
        let published = classes
            .entry(class.type_id())
            .or_insert_with(|| Arc::clone(&computed));
        if Arc::ptr_eq(published, &computed) {
            debug!(
                "Resolved {} properties of type [{}]",
                computed.properties.len(),
                class
            );
            self.diagnostics
                .lock()
                .extend(computed.diagnostics.iter().cloned());
        }
        Arc::clone(published)
    }

    /// Look up a mapped property of `class` by display name.
    pub fn property(&self, class: ClassRef, display_name: &str) -> Option<Arc<ResolvedProperty>> {
        self.properties(class).property(display_name).cloned()
    }

    pub fn is_root_entity(&self, class: ClassRef) -> bool {
        self.properties(class).is_root_entity()
    }

    /// The schema options of a property, if it is schema-visible.
    pub fn schema_attribute(&self, class: ClassRef, property: &str) -> Option<SchemaOptions> {
        self.find(class, property)
            .and_then(|resolved| resolved.policy.schema().cloned())
    }

    /// The payload options of a property, if it is payload-visible.
    pub fn payload_attribute(&self, class: ClassRef, property: &str) -> Option<PayloadOptions> {
        self.find(class, property)
            .and_then(|resolved| resolved.policy.payload().cloned())
    }

    /// Every diagnostic recorded so far, in discovery order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    // Raw names are accepted too, so that excluded properties can be queried.
    fn find(&self, class: ClassRef, property: &str) -> Option<Arc<ResolvedProperty>> {
        let attributes = self.properties(class);
        attributes.property(property).cloned().or_else(|| {
            attributes
                .properties()
                .iter()
                .find(|resolved| resolved.name() == property)
                .cloned()
        })
    }
}
