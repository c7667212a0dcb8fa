//! Schema model extraction
//!
//! Each relation or permission name is attributed to its nearest enclosing
//! named `object_definition`, found by walking parent links. Query capture
//! order is never relied on.

use indexmap::{IndexMap, IndexSet};

use authz_fs::NormalizedPath;

use crate::error::{Error, Result};
use crate::grammar::{Language, MAX_SOURCE_BYTES, Node, NodeKind, Parser, Query, Tree, language};
use crate::model::{SchemaModel, SchemaModelBuilder};

const DEFINITIONS: &str = "(object_definition (type_identifier) @name)";
const RELATIONS: &str = "(relation (field_identifier) @name)";
const PERMISSIONS: &str = "(permission (method_identifier) @name)";

/// Extracts [`SchemaModel`] content from syntax trees.
///
/// Holds precompiled queries; build one per [`Language`] and reuse it.
pub struct SchemaExtractor {
    definitions: Query,
    relations: Query,
    permissions: Query,
}

impl SchemaExtractor {
    pub fn new(language: &Language) -> Result<Self> {
        Ok(Self {
            definitions: Query::new(language, DEFINITIONS)?,
            relations: Query::new(language, RELATIONS)?,
            permissions: Query::new(language, PERMISSIONS)?,
        })
    }

    /// Object type names in first-declaration order, without repeats.
    pub fn extract_object_types(&self, tree: &Tree) -> IndexSet<String> {
        self.definition_names(tree).into_iter().collect()
    }

    /// Relation names grouped by the object type that declares them.
    pub fn extract_relations(&self, tree: &Tree) -> IndexMap<String, Vec<String>> {
        attribute(tree, &self.relations, "relation")
    }

    /// Relations declared directly under `object_type`; empty when it has none.
    pub fn relations_for(&self, tree: &Tree, object_type: &str) -> Vec<String> {
        self.extract_relations(tree)
            .swap_remove(object_type)
            .unwrap_or_default()
    }

    /// Permission names grouped by the object type that declares them.
    pub fn extract_permissions(&self, tree: &Tree) -> IndexMap<String, Vec<String>> {
        attribute(tree, &self.permissions, "permission")
    }

    /// Permissions declared directly under `object_type`; empty when it has none.
    pub fn permissions_for(&self, tree: &Tree, object_type: &str) -> Vec<String> {
        self.extract_permissions(tree)
            .swap_remove(object_type)
            .unwrap_or_default()
    }

    /// Build the full model from one tree.
    pub fn extract(&self, tree: &Tree) -> SchemaModel {
        let mut builder = SchemaModelBuilder::default();
        for name in self.definition_names(tree) {
            builder.add_object_type(name);
        }
        for (object_type, names) in attribute(tree, &self.relations, "relation") {
            for name in names {
                builder.add_relation(object_type.clone(), name);
            }
        }
        for (object_type, names) in attribute(tree, &self.permissions, "permission") {
            for name in names {
                builder.add_permission(object_type.clone(), name);
            }
        }
        let model = builder.build();
        tracing::debug!(
            object_types = model.object_types().len(),
            relations = model.relations().values().map(Vec::len).sum::<usize>(),
            permissions = model.permissions().values().map(Vec::len).sum::<usize>(),
            "extracted schema model"
        );
        model
    }

    /// Names of the named definitions, in source order, repeats included.
    fn definition_names(&self, tree: &Tree) -> Vec<String> {
        self.definitions
            .matches(tree)
            .into_iter()
            .filter_map(|m| {
                m.captures
                    .iter()
                    .find(|c| c.name == "name")
                    .map(|c| c.node.text().to_string())
            })
            .collect()
    }
}

/// Group every capture of `query` under the definition that encloses it.
fn attribute(tree: &Tree, query: &Query, what: &str) -> IndexMap<String, Vec<String>> {
    let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
    for capture in query.captures(tree) {
        match owner_of(capture.node) {
            Some(object_type) => grouped
                .entry(object_type.to_string())
                .or_default()
                .push(capture.node.text().to_string()),
            None => tracing::warn!(
                name = capture.node.text(),
                at = %capture.node.start_point(),
                "{what} outside any named definition, skipping"
            ),
        }
    }
    grouped
}

/// Name of the nearest ancestor `object_definition` that has one.
fn owner_of<'t>(node: Node<'t>) -> Option<&'t str> {
    std::iter::successors(node.parent(), |n| n.parent())
        .filter(|n| n.kind() == NodeKind::ObjectDefinition)
        .find_map(|n| n.child_of_kind(NodeKind::TypeIdentifier))
        .map(|name| name.text())
}

/// A schema file after parsing and extraction.
#[derive(Debug)]
pub struct ParsedSchema {
    /// File name of the schema, used in generated headers and reports.
    pub source_name: String,
    pub tree: Tree,
    pub model: SchemaModel,
}

/// Read a schema file, parse it and extract its model.
///
/// # Errors
///
/// - [`Error::Fs`] when the file cannot be read
/// - [`Error::ParseFailure`] when it exceeds [`MAX_SOURCE_BYTES`]
/// - [`Error::GrammarUnavailable`] when the grammar cannot be built
pub fn load_schema(path: &NormalizedPath) -> Result<ParsedSchema> {
    let bytes = match authz_fs::io::read_bytes_bounded(path, MAX_SOURCE_BYTES as u64) {
        Ok(bytes) => bytes,
        Err(authz_fs::Error::TooLarge { size, max, .. }) => {
            return Err(Error::ParseFailure {
                reason: format!("{path} is {size} bytes, larger than the {max} byte limit"),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let language = language()?;
    let tree = Parser::new(language).parse(&bytes)?;
    let model = SchemaExtractor::new(language)?.extract(&tree);
    let source_name = path.file_name().unwrap_or(path.as_str()).to_string();

    tracing::debug!(path = %path, types = model.object_types().len(), "loaded schema");
    Ok(ParsedSchema {
        source_name,
        tree,
        model,
    })
}
