use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::{FieldDecl, ModelDeclaration, ModelReader, string_literals, strip_comment};

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*(?:export\s+)?(?:declare\s+)?(?:interface\s+([A-Za-z_$][\w$]*)[^{]*\{|type\s+([A-Za-z_$][\w$]*)\s*(?:<[^>]*>)?\s*=\s*\{)",
    )
    .unwrap()
});

static MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:readonly\s+)?([A-Za-z_$][\w$]*|"[^"]+"|'[^']+')\s*(\?)?\s*:\s*(.+)$"#).unwrap()
});

/// Reads property signatures from TypeScript interfaces and object type
/// aliases.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptModelReader;

impl ModelReader for TypeScriptModelReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["ts", "mts", "cts"]
    }

    fn read(&self, source: &str, name: &str) -> Option<ModelDeclaration> {
        let source = strip_block_comments(source);
        let body_start = DECLARATION.captures_iter(&source).find_map(|caps| {
            let matched = caps.get(1).or_else(|| caps.get(2))?;
            (matched.as_str() == name).then(|| caps.get(0).map(|m| m.end()))?
        })?;
        let body = braced_body(&source[body_start..]);

        let mut fields = IndexMap::new();
        for member in split_members(body) {
            let Some(caps) = MEMBER.captures(&member) else {
                continue;
            };
            let field_name = caps[1].trim_matches(|c| c == '"' || c == '\'').to_string();
            let annotation = caps[3].trim().to_string();
            let optional = caps.get(2).is_some()
                || annotation.split('|').any(|arm| matches!(arm.trim(), "null" | "undefined"));
            fields.insert(
                field_name,
                FieldDecl {
                    literals: string_literals(&annotation),
                    annotation,
                    optional,
                },
            );
        }

        Some(ModelDeclaration {
            name: name.to_string(),
            fields,
        })
    }
}

fn strip_block_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Text up to the brace closing an already-opened body.
fn braced_body(text: &str) -> &str {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'' | '`') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => {
                depth -= 1;
                if depth == 0 {
                    return &text[..i];
                }
            }
            _ => {}
        }
    }
    text
}

/// Split a body into members at top-level `;`, `,` and line breaks.
///
/// Line comments are dropped first. A line break inside brackets, after a
/// dangling `:` or `|`, or before a line starting with `|` continues the
/// current member.
fn split_members(body: &str) -> Vec<String> {
    let lines: Vec<&str> = body
        .lines()
        .map(|line| strip_comment(line, "//").trim())
        .filter(|line| !line.is_empty())
        .collect();

    let mut members = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for (i, line) in lines.iter().enumerate() {
        if !current.is_empty() {
            current.push(' ');
        }
        for c in line.chars() {
            match c {
                '{' | '[' | '(' | '<' => depth += 1,
                '}' | ']' | ')' | '>' => depth = depth.saturating_sub(1),
                ';' | ',' if depth == 0 => {
                    push_member(&mut members, &mut current);
                    continue;
                }
                _ => {}
            }
            current.push(c);
        }
        let tail = current.trim_end();
        let continues = depth > 0
            || tail.ends_with('|')
            || tail.ends_with(':')
            || lines.get(i + 1).is_some_and(|next| next.starts_with('|'));
        if !continues {
            push_member(&mut members, &mut current);
        }
    }
    push_member(&mut members, &mut current);
    members
}

fn push_member(members: &mut Vec<String>, current: &mut String) {
    let member = current.trim();
    if !member.is_empty() {
        members.push(member.to_string());
    }
    current.clear();
}
