//! Generator trait and render input

use authz_schema::SchemaModel;

use crate::error::Result;

/// Everything a generator sees.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub model: &'a SchemaModel,
    /// File name of the schema, quoted in generated headers.
    pub source_name: &'a str,
}

impl<'a> RenderInput<'a> {
    pub fn new(model: &'a SchemaModel, source_name: &'a str) -> Self {
        Self { model, source_name }
    }
}

/// Trait for output generators.
///
/// Rendering is a pure function of the input: the same model and source
/// name always produce byte-identical text ending in exactly one newline.
pub trait Generator: Send + Sync {
    /// Identifier used in output mappings (`resources.py:python`).
    fn id(&self) -> &'static str;

    /// File extensions (without the dot) this generator is the default for.
    fn extensions(&self) -> &'static [&'static str];

    /// Render the model to source text.
    fn render(&self, input: &RenderInput<'_>) -> Result<String>;
}

/// Trim trailing blank lines and terminate with a single newline.
pub(crate) fn finish(mut text: String) -> String {
    let trimmed = text.trim_end().len();
    text.truncate(trimmed);
    text.push('\n');
    text
}

/// `"a", "b"` for a literal list.
pub(crate) fn quoted_list(names: &[String], separator: &str) -> String {
    names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_normalizes_trailing_newlines() {
        assert_eq!(finish("a\n\n\n".into()), "a\n");
        assert_eq!(finish("a".into()), "a\n");
        assert_eq!(finish(String::new()), "\n");
    }

    #[test]
    fn test_quoted_list() {
        let names = vec!["read".to_string(), "write".to_string()];
        assert_eq!(quoted_list(&names, ", "), r#""read", "write""#);
        assert_eq!(quoted_list(&[], " | "), "");
    }
}
