//! In-memory document store for testing.

use std::collections::BTreeMap;

use ahash::AHashMap;
use anyhow::bail;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::document::Document;
use crate::store::traits::DocumentStore;

/// A document store kept in memory.
///
/// Documents are grouped by type name and ordered by identifier. Missing
/// identifiers are assigned as random UUIDs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    types: RwLock<AHashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of documents stored under `type_name`.
    pub fn count(&self, type_name: &str) -> usize {
        self.types
            .read()
            .get(type_name)
            .map_or(0, BTreeMap::len)
    }

    /// Clear all documents from the store.
    pub fn clear(&self) {
        self.types.write().clear();
    }
}

impl DocumentStore for MemoryStore {
    fn put(
        &self,
        type_name: &str,
        id: Option<&str>,
        document: &Document,
    ) -> anyhow::Result<String> {
        let id = match id {
            Some("") => bail!("empty identifier for a document of type '{type_name}'"),
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        self.types
            .write()
            .entry(type_name.to_string())
            .or_default()
            .insert(id.clone(), document.clone());
        Ok(id)
    }

    fn get(&self, type_name: &str, id: &str) -> anyhow::Result<Option<Document>> {
        Ok(self
            .types
            .read()
            .get(type_name)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    fn delete(&self, type_name: &str, id: &str) -> anyhow::Result<bool> {
        Ok(self
            .types
            .write()
            .get_mut(type_name)
            .and_then(|documents| documents.remove(id))
            .is_some())
    }

    fn search(
        &self,
        type_name: &str,
        filter: &dyn Fn(&Document) -> bool,
    ) -> anyhow::Result<Vec<(String, Document)>> {
        let types = self.types.read();
        let Some(documents) = types.get(type_name) else {
            return Ok(Vec::new());
        };

        Ok(documents
            .iter()
            .filter(|(_, document)| filter(document))
            .map(|(id, document)| (id.clone(), document.clone()))
            .collect())
    }
}
