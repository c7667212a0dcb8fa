//! The extracted schema model

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::error::Result;
use crate::extract::SchemaExtractor;
use crate::grammar::{Parser, language};

/// Object types, relations and permissions extracted from one schema.
///
/// Types keep first-declaration order. Relations and permissions keep source
/// order per type, including repeats. A type without relations has no entry
/// in `relations` (same for permissions); the `*_of` accessors return an
/// empty slice for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaModel {
    object_types: IndexSet<String>,
    relations: IndexMap<String, Vec<String>>,
    permissions: IndexMap<String, Vec<String>>,
}

impl SchemaModel {
    pub fn builder() -> SchemaModelBuilder {
        SchemaModelBuilder::default()
    }

    /// Parse and extract a model from schema bytes.
    pub fn from_source(source: &[u8]) -> Result<Self> {
        let language = language()?;
        let tree = Parser::new(language).parse(source)?;
        let extractor = SchemaExtractor::new(language)?;
        Ok(extractor.extract(&tree))
    }

    /// Read, parse and extract a schema file.
    pub fn load(path: &authz_fs::NormalizedPath) -> Result<Self> {
        Ok(crate::extract::load_schema(path)?.model)
    }

    pub fn object_types(&self) -> &IndexSet<String> {
        &self.object_types
    }

    pub fn relations(&self) -> &IndexMap<String, Vec<String>> {
        &self.relations
    }

    pub fn permissions(&self) -> &IndexMap<String, Vec<String>> {
        &self.permissions
    }

    pub fn relations_of(&self, object_type: &str) -> &[String] {
        self.relations
            .get(object_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn permissions_of(&self, object_type: &str) -> &[String] {
        self.permissions
            .get(object_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains_type(&self, object_type: &str) -> bool {
        self.object_types.contains(object_type)
    }

    /// Every `(type, relation)` pair in declaration order.
    pub fn relation_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.relations
            .iter()
            .flat_map(|(ty, names)| names.iter().map(move |name| (ty.as_str(), name.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.object_types.is_empty()
    }
}

/// Incremental construction of a [`SchemaModel`].
///
/// Adding a relation or permission registers its type if needed, so the
/// type-key invariant holds for every built model.
#[derive(Debug, Default)]
pub struct SchemaModelBuilder {
    model: SchemaModel,
}

impl SchemaModelBuilder {
    pub fn object_type(mut self, name: impl Into<String>) -> Self {
        self.add_object_type(name.into());
        self
    }

    pub fn relation(mut self, object_type: impl Into<String>, name: impl Into<String>) -> Self {
        self.add_relation(object_type.into(), name.into());
        self
    }

    pub fn permission(mut self, object_type: impl Into<String>, name: impl Into<String>) -> Self {
        self.add_permission(object_type.into(), name.into());
        self
    }

    pub fn build(self) -> SchemaModel {
        self.model
    }

    pub(crate) fn add_object_type(&mut self, name: String) {
        self.model.object_types.insert(name);
    }

    pub(crate) fn add_relation(&mut self, object_type: String, name: String) {
        self.model.object_types.insert(object_type.clone());
        self.model
            .relations
            .entry(object_type)
            .or_default()
            .push(name);
    }

    pub(crate) fn add_permission(&mut self, object_type: String, name: String) {
        self.model.object_types.insert(object_type.clone());
        self.model
            .permissions
            .entry(object_type)
            .or_default()
            .push(name);
    }
}
