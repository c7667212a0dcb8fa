use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::{FieldDecl, ModelDeclaration, ModelReader, string_literals, strip_comment};

static CLASS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)class\s+([A-Za-z_]\w*)\s*(?:\([^)]*\))?\s*:").unwrap()
});

static ANNOTATED_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_]\w*)\s*:\s*(.+)$").unwrap());

static ASSIGNED_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_]\w*)\s*=\s*([^=].*)?$").unwrap());

static PROPERTY_DECORATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@(?:functools\.)?(?:property|cached_property)\s*$").unwrap()
});

static METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\(.*\)\s*(?:->\s*(.+?))?\s*:").unwrap()
});

static LITERAL_ARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Literal\[([^\]]*)\]").unwrap());

/// Reads class attributes from Python sources.
///
/// Only lines at the first indentation level of the class body count as
/// fields: annotated attributes, plain assignments and methods decorated
/// with `@property`. Docstrings, comments and other methods are skipped,
/// and nested classes are ignored along with everything else indented
/// deeper.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonModelReader;

impl ModelReader for PythonModelReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["py", "pyi"]
    }

    fn read(&self, source: &str, name: &str) -> Option<ModelDeclaration> {
        let lines: Vec<&str> = source.lines().collect();
        let (start, class_indent) = lines.iter().enumerate().find_map(|(i, line)| {
            let caps = CLASS_LINE.captures(line)?;
            (&caps[2] == name).then_some((i, caps[1].len()))
        })?;

        let mut fields = IndexMap::new();
        let mut body_indent: Option<usize> = None;
        let mut docstring: Option<&str> = None;
        let mut property_pending = false;

        for line in &lines[start + 1..] {
            let trimmed = line.trim_start();
            if let Some(delimiter) = docstring {
                if trimmed.contains(delimiter) {
                    docstring = None;
                }
                continue;
            }
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let indent = line.len() - trimmed.len();
            if indent <= class_indent {
                break;
            }
            if *body_indent.get_or_insert(indent) != indent {
                continue;
            }

            if let Some(delimiter) = ["\"\"\"", "'''"].into_iter().find(|d| trimmed.starts_with(d)) {
                if !trimmed[3..].contains(delimiter) {
                    docstring = Some(delimiter);
                }
                continue;
            }

            let code = strip_comment(trimmed, "#");
            if code.starts_with('@') {
                property_pending |= PROPERTY_DECORATOR.is_match(code);
                continue;
            }
            let decorated = std::mem::take(&mut property_pending);

            if let Some(caps) = METHOD.captures(code) {
                if decorated {
                    let annotation = caps.get(2).map_or("", |m| m.as_str());
                    fields.insert(caps[1].to_string(), field(annotation, false));
                }
            } else if let Some(caps) = ANNOTATED_FIELD.captures(code) {
                let (annotation, has_default) = split_default(&caps[2]);
                fields.insert(caps[1].to_string(), field(annotation, has_default));
            } else if let Some(caps) = ASSIGNED_FIELD.captures(code) {
                let name = &caps[1];
                if !(name.starts_with("__") && name.ends_with("__")) {
                    let value = caps.get(2).map_or("", |m| m.as_str());
                    fields.insert(name.to_string(), assigned(value));
                }
            }
        }

        Some(ModelDeclaration {
            name: name.to_string(),
            fields,
        })
    }
}

fn field(annotation: &str, has_default: bool) -> FieldDecl {
    let literals = LITERAL_ARGS
        .captures_iter(annotation)
        .flat_map(|caps| string_literals(&caps[1]))
        .collect();
    let optional = has_default
        || annotation.starts_with("Optional[")
        || annotation.split('|').any(|arm| arm.trim() == "None");
    FieldDecl {
        annotation: annotation.to_string(),
        literals,
        optional,
    }
}

/// A plain `name = value` attribute. It always has a value, so it is never
/// required to be passed; a string value counts as its only literal.
fn assigned(value: &str) -> FieldDecl {
    let value = value.trim();
    let quoted = ['"', '\''].into_iter().any(|q| {
        value.len() >= 2 && value.starts_with(q) && value.ends_with(q)
    });
    let mut literals = if quoted { string_literals(value) } else { Vec::new() };
    if literals.len() != 1 {
        literals.clear();
    }
    FieldDecl {
        annotation: String::new(),
        literals,
        optional: true,
    }
}

/// Split `Annotation = default` at the first `=` outside brackets and quotes.
fn split_default(text: &str) -> (&str, bool) {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(' | '{') => depth += 1,
            (None, ']' | ')' | '}') => depth = depth.saturating_sub(1),
            (None, '=') if depth == 0 => return (text[..i].trim(), true),
            _ => {}
        }
    }
    (text.trim(), false)
}
