//! Per-property and per-type declarations.
//!
//! These are the static counterparts of the declarative metadata a mapped
//! type attaches to its properties. Every option is optional: an option that
//! is not declared is left for the storage backend to derive.

use serde::{Deserialize, Serialize};

/// How a field is indexed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMode {
    /// Broken down into tokens by an analyzer and searchable.
    Analyzed,
    /// Searchable as a single exact term.
    NotAnalyzed,
    /// Not searchable at all.
    No,
}

/// Term vector storage mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermVector {
    No,
    Yes,
    WithOffsets,
    WithPositions,
    WithPositionsOffsets,
}

/// Schema declaration of a property.
///
/// A property carrying a schema declaration participates in the generated
/// schema with these options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaOptions {
    name: Option<String>,
    store: Option<bool>,
    index: Option<IndexMode>,
    term_vector: Option<TermVector>,
    boost: Option<f32>,
    omit_norms: Option<bool>,
    omit_tf: Option<bool>,
    analyzer: Option<String>,
    index_analyzer: Option<String>,
    search_analyzer: Option<String>,
    include_in_all: Option<bool>,
    precision_step: Option<u32>,
}

impl SchemaOptions {
    /// Create a schema declaration with every option left undeclared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options applied to properties that are only carried in the payload:
    /// stored, never searchable.
    pub fn stored_only() -> Self {
        Self::new().store(true).index(IndexMode::No)
    }

    /// Override the display name of the property.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set whether the backend stores the field on its own.
    pub fn store(mut self, store: bool) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the index mode.
    pub fn index(mut self, index: IndexMode) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the term vector mode.
    pub fn term_vector(mut self, term_vector: TermVector) -> Self {
        self.term_vector = Some(term_vector);
        self
    }

    /// Set the field boost.
    pub fn boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Set whether norms are omitted.
    pub fn omit_norms(mut self, omit_norms: bool) -> Self {
        self.omit_norms = Some(omit_norms);
        self
    }

    /// Set whether term frequencies and positions are omitted.
    pub fn omit_tf(mut self, omit_tf: bool) -> Self {
        self.omit_tf = Some(omit_tf);
        self
    }

    /// Set the analyzer used both at index and at search time.
    pub fn analyzer<S: Into<String>>(mut self, analyzer: S) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Set the analyzer used at index time only.
    pub fn index_analyzer<S: Into<String>>(mut self, analyzer: S) -> Self {
        self.index_analyzer = Some(analyzer.into());
        self
    }

    /// Set the analyzer used at search time only.
    pub fn search_analyzer<S: Into<String>>(mut self, analyzer: S) -> Self {
        self.search_analyzer = Some(analyzer.into());
        self
    }

    /// Set whether the field is copied into the index-everything aggregate.
    pub fn include_in_all(mut self, include_in_all: bool) -> Self {
        self.include_in_all = Some(include_in_all);
        self
    }

    /// Set the precision step of numeric and date fields.
    pub fn precision_step(mut self, precision_step: u32) -> Self {
        self.precision_step = Some(precision_step);
        self
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn stored(&self) -> Option<bool> {
        self.store
    }

    pub fn index_mode(&self) -> Option<IndexMode> {
        self.index
    }

    pub fn term_vector_mode(&self) -> Option<TermVector> {
        self.term_vector
    }

    /// The declared boost, if any. The backend default is 1.0.
    pub fn boost_value(&self) -> Option<f32> {
        self.boost
    }

    pub fn omits_norms(&self) -> Option<bool> {
        self.omit_norms
    }

    pub fn omits_tf(&self) -> Option<bool> {
        self.omit_tf
    }

    pub fn included_in_all(&self) -> Option<bool> {
        self.include_in_all
    }

    pub fn precision_step_value(&self) -> Option<u32> {
        self.precision_step
    }

    /// Resolve the (index-time, search-time) analyzer pair.
    ///
    /// `analyzer` sets both halves; the dedicated options override one half each.
    pub fn analyzer_pair(&self) -> (Option<&str>, Option<&str>) {
        let index = self
            .index_analyzer
            .as_deref()
            .or(self.analyzer.as_deref());
        let search = self
            .search_analyzer
            .as_deref()
            .or(self.analyzer.as_deref());
        (index, search)
    }
}

/// Payload declaration of a property.
///
/// A property carrying a payload declaration is written into documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadOptions {
    name: Option<String>,
    null_value: Option<String>,
    format: Option<String>,
}

impl PayloadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the display name. A schema name override takes precedence.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Placeholder substituted for explicit nulls, in its textual form.
    pub fn null_value<S: Into<String>>(mut self, null_value: S) -> Self {
        self.null_value = Some(null_value.into());
        self
    }

    /// `chrono` format string used for date values.
    pub fn format<S: Into<String>>(mut self, format: S) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Placeholder announced to the backend in schemas. Documents keep nulls.
    pub fn null_placeholder(&self) -> Option<&str> {
        self.null_value.as_deref()
    }

    pub fn date_format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}

/// Root entity declaration of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootOptions {
    alias: Option<String>,
}

impl RootOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the type is stored and described under, instead of its simple name.
    pub fn alias<S: Into<String>>(mut self, alias: S) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn type_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_pair_resolution() {
        let options = SchemaOptions::new().analyzer("french");
        assert_eq!(options.analyzer_pair(), (Some("french"), Some("french")));

        let options = SchemaOptions::new()
            .analyzer("french")
            .search_analyzer("simple");
        assert_eq!(options.analyzer_pair(), (Some("french"), Some("simple")));

        let options = SchemaOptions::new().index_analyzer("keyword");
        assert_eq!(options.analyzer_pair(), (Some("keyword"), None));
    }

    #[test]
    fn test_stored_only() {
        let options = SchemaOptions::stored_only();
        assert_eq!(options.stored(), Some(true));
        assert_eq!(options.index_mode(), Some(IndexMode::No));
        assert_eq!(options.boost_value(), None);
    }
}
