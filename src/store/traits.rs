//! Storage collaborator contract.

use crate::document::Document;

/// A backend that persists documents by type name and identifier.
///
/// The mapping engine only produces and consumes documents; everything
/// about persistence, querying and transport belongs to implementations.
/// Errors are opaque to the engine and surface as
/// [`MapperError::Store`](crate::error::MapperError::Store).
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Store `document` under `type_name`.
    ///
    /// When `id` is None the store assigns an identifier. Returns the
    /// identifier the document is stored under.
    fn put(&self, type_name: &str, id: Option<&str>, document: &Document)
    -> anyhow::Result<String>;

    /// Fetch a document by identifier.
    fn get(&self, type_name: &str, id: &str) -> anyhow::Result<Option<Document>>;

    /// Delete a document. Returns false when it did not exist.
    fn delete(&self, type_name: &str, id: &str) -> anyhow::Result<bool>;

    /// Return every document of `type_name` accepted by `filter`, with its identifier.
    fn search(
        &self,
        type_name: &str,
        filter: &dyn Fn(&Document) -> bool,
    ) -> anyhow::Result<Vec<(String, Document)>>;
}
