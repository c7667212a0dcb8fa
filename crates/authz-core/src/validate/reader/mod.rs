//! Structural model-file readers
//!
//! A reader finds one named declaration in a source file and lists its
//! fields with their annotations. It reads syntax only; nothing is imported
//! or executed.

mod python;
mod typescript;

use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;

use authz_fs::{NormalizedPath, io};

use crate::error::{Error, Result};

pub use python::PythonModelReader;
pub use typescript::TypeScriptModelReader;

/// A string literal in either quote style, escapes allowed.
static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'"#).unwrap()
});

/// One declared field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDecl {
    /// The annotation as written, without any default value.
    pub annotation: String,
    /// String literal values the annotation admits, in source order.
    pub literals: Vec<String>,
    /// The field has a default or admits `None` / is marked `?`.
    pub optional: bool,
}

/// A named declaration and its fields, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDeclaration {
    pub name: String,
    pub fields: IndexMap<String, FieldDecl>,
}

impl ModelDeclaration {
    pub fn field_names(&self) -> IndexSet<String> {
        self.fields.keys().cloned().collect()
    }

    /// Union of the literals of `fields`, skipping fields that are absent.
    pub fn literals_of(&self, fields: &[&str]) -> IndexSet<String> {
        fields
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .flat_map(|field| field.literals.iter().cloned())
            .collect()
    }

    /// Object types named by `subject_type` and `object_type`.
    pub fn declared_object_types(&self) -> IndexSet<String> {
        self.literals_of(&["subject_type", "object_type"])
    }

    /// Relations named by `relation` and `subject_relation`.
    pub fn declared_relations(&self) -> IndexSet<String> {
        self.literals_of(&["relation", "subject_relation"])
    }
}

/// Reads declarations out of one kind of source file.
pub trait ModelReader: Sync {
    /// File extensions (without the dot) this reader understands.
    fn extensions(&self) -> &'static [&'static str];

    /// Find the declaration called `name`, if present.
    fn read(&self, source: &str, name: &str) -> Option<ModelDeclaration>;
}

static PYTHON: PythonModelReader = PythonModelReader;
static TYPESCRIPT: TypeScriptModelReader = TypeScriptModelReader;

/// The reader for a file extension (without the dot).
pub fn reader_for_extension(extension: &str) -> Option<&'static dyn ModelReader> {
    let readers: [&'static dyn ModelReader; 2] = [&PYTHON, &TYPESCRIPT];
    readers
        .into_iter()
        .find(|r| r.extensions().iter().any(|e| e.eq_ignore_ascii_case(extension)))
}

/// Read the declaration `name` from the model file at `path`.
///
/// # Errors
///
/// - [`Error::ModelNotFound`] when the file does not exist
/// - [`Error::UnsupportedModelFormat`] for an extension no reader handles
/// - [`Error::ModelClassNotFound`] when the file has no such declaration
pub fn load_declaration(path: &NormalizedPath, name: &str) -> Result<ModelDeclaration> {
    if !path.is_file() {
        return Err(Error::ModelNotFound {
            path: path.to_native(),
        });
    }
    let reader = path
        .extension()
        .and_then(reader_for_extension)
        .ok_or_else(|| Error::UnsupportedModelFormat {
            path: path.to_native(),
        })?;

    let source = io::read_text(path)?;
    let declaration = reader
        .read(&source, name)
        .ok_or_else(|| Error::ModelClassNotFound {
            path: path.to_native(),
            name: name.to_string(),
        })?;
    tracing::debug!(path = %path, name, fields = declaration.fields.len(), "read model declaration");
    Ok(declaration)
}

/// Every string literal in `text`, unescaped only for quotes and backslashes.
pub(crate) fn string_literals(text: &str) -> Vec<String> {
    STRING_LITERAL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().replace("\\\"", "\"").replace("\\'", "'").replace("\\\\", "\\"))
        .collect()
}

/// Cut a line at the first `marker` that is outside any string literal.
pub(crate) fn strip_comment<'a>(line: &'a str, marker: &str) -> &'a str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c == '"' || c == '\'' || c == '`' {
            quote = Some(c);
        } else if line[i..].starts_with(marker) {
            return line[..i].trim_end();
        }
    }
    line.trim_end()
}
