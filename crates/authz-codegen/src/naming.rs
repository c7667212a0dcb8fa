//! Identifier conversion for generated code

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Convert a schema type name to a PascalCase identifier.
///
/// Underscores, namespace slashes, dashes and dots separate words:
/// `table_view` becomes `TableView`, `org/document` becomes `OrgDocument`.
pub fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split(['_', '/', '-', '.']).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// PascalCase identifiers for every type, in input order.
///
/// Fails when two types collapse to the same identifier (`a_b` and `a/b`).
pub fn class_names<'a>(
    generator: &str,
    types: impl IntoIterator<Item = &'a String>,
) -> Result<IndexMap<&'a str, String>> {
    let mut by_ident: IndexMap<String, &'a str> = IndexMap::new();
    let mut names = IndexMap::new();
    for ty in types {
        let ident = pascal_case(ty);
        if ident.is_empty() {
            return Err(Error::render(
                generator,
                format!("object type '{ty}' has no usable identifier characters"),
            ));
        }
        if let Some(previous) = by_ident.insert(ident.clone(), ty.as_str()) {
            return Err(Error::render(
                generator,
                format!("object types '{previous}' and '{ty}' both map to identifier '{ident}'"),
            ));
        }
        names.insert(ty.as_str(), ident);
    }
    Ok(names)
}
