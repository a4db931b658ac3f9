//! Object persistence on top of a document store.

use std::fmt;

use log::{debug, warn};

use crate::context::ObjectContext;
use crate::descriptor::{ClassRef, Describe, Entity};
use crate::document::Document;
use crate::error::Result;
use crate::store::traits::DocumentStore;

/// Saves and loads mapped objects through a [`DocumentStore`].
///
/// Objects are stored under the type name of their runtime type.
#[derive(Debug)]
pub struct StoreSession<S: DocumentStore> {
    context: ObjectContext,
    store: S,
}

impl<S: DocumentStore> StoreSession<S> {
    pub fn new(context: ObjectContext, store: S) -> Self {
        StoreSession { context, store }
    }

    pub fn context(&self) -> &ObjectContext {
        &self.context
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store `object` and assign the identifier it was stored under.
    ///
    /// When the assigned identifier cannot be written back, the stored
    /// document is removed again and the error is returned.
    pub fn save(&self, object: &mut dyn Entity) -> Result<String> {
        let class = object.class();
        let type_name = self.context.registry().type_name(class);
        let current = self.context.id_of(object)?;
        let document = self.context.to_document(object)?;

        let id = self.store.put(&type_name, current.as_deref(), &document)?;
        if current.as_deref() != Some(id.as_str()) {
            // The object must not disagree with the store.
            if let Err(e) = self.context.set_id(object, &id) {
                warn!(
                    "Removing document '{}' of type [{}]: its identifier cannot be assigned",
                    id, class
                );
                self.store.delete(&type_name, &id)?;
                return Err(e);
            }
        }
        debug!("Saved object of type [{}] as '{}'", class, id);
        Ok(id)
    }

    /// Load the object of type `T` stored under `id`.
    pub fn get<T>(&self, id: &str) -> Result<Option<T>>
    where
        T: Describe + fmt::Debug + Send + Sync,
    {
        let type_name = self.context.type_name::<T>();
        match self.store.get(&type_name, id)? {
            Some(document) => self.read(document, id).map(Some),
            None => Ok(None),
        }
    }

    /// Delete `object`, which must carry an identifier.
    pub fn delete(&self, object: &dyn Entity) -> Result<bool> {
        let id = self.context.require_id(object)?;
        let type_name = self.context.registry().type_name(object.class());
        Ok(self.store.delete(&type_name, &id)?)
    }

    /// Load every object of type `T` whose document is accepted by `filter`.
    pub fn find<T, F>(&self, filter: F) -> Result<Vec<T>>
    where
        T: Describe + fmt::Debug + Send + Sync,
        F: Fn(&Document) -> bool,
    {
        let class = ClassRef::of::<T>();
        self.context.registry().check(class)?;
        let type_name = self.context.registry().type_name(class);

        self.store
            .search(&type_name, &filter)?
            .into_iter()
            .map(|(id, document)| self.read(document, &id))
            .collect()
    }

    // Stores may keep the identifier apart from the document body.
    fn read<T>(&self, mut document: Document, id: &str) -> Result<T>
    where
        T: Describe + fmt::Debug + Send + Sync,
    {
        let identifier = self.context.config().identifier_field.as_str();
        if !document.has_field(identifier) {
            document.add_field(identifier, id);
        }
        self.context.from_document(&document)
    }
}
