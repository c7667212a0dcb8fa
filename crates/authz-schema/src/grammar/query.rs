//! Structural queries over syntax trees
//!
//! Patterns use the S-expression notation of tree-sitter queries:
//!
//! ```text
//! (object_definition (type_identifier) @name)
//! (relation (field_identifier) @relation)
//! (_ (comment) @doc)        ; `_` matches any node kind
//! ```
//!
//! Child patterns match direct children in order, with any number of
//! unmatched siblings between them.

use std::cmp::Reverse;
use std::collections::HashSet;

use super::language::{Language, NodeKind};
use super::tree::{Node, NodeId, Tree};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct Pattern {
    /// `None` for the `_` wildcard.
    kind: Option<NodeKind>,
    capture: Option<usize>,
    children: Vec<Pattern>,
}

type Bindings = Vec<(usize, NodeId)>;

/// A compiled query.
#[derive(Debug, Clone)]
pub struct Query {
    patterns: Vec<Pattern>,
    capture_names: Vec<String>,
}

/// One node captured by a query.
#[derive(Debug, Clone, Copy)]
pub struct QueryCapture<'q, 't> {
    pub node: Node<'t>,
    pub name: &'q str,
    pub index: usize,
}

/// One successful match of a top-level pattern.
#[derive(Debug, Clone)]
pub struct QueryMatch<'q, 't> {
    pub pattern_index: usize,
    pub captures: Vec<QueryCapture<'q, 't>>,
}

impl Query {
    /// Compile query source against a language.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQuery`] for malformed syntax or unknown node
    /// kinds, with the byte offset of the problem.
    pub fn new(language: &Language, source: &str) -> Result<Self> {
        let mut compiler = Compiler {
            language,
            source,
            pos: 0,
            capture_names: Vec::new(),
        };
        let mut patterns = Vec::new();
        loop {
            compiler.skip_trivia();
            if compiler.pos >= source.len() {
                break;
            }
            patterns.push(compiler.pattern()?);
        }
        if patterns.is_empty() {
            return Err(Error::invalid_query(0, "query contains no patterns"));
        }
        Ok(Self {
            patterns,
            capture_names: compiler.capture_names,
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn capture_names(&self) -> &[String] {
        &self.capture_names
    }

    pub fn capture_index_for_name(&self, name: &str) -> Option<usize> {
        self.capture_names.iter().position(|n| n == name)
    }

    /// Every match of every pattern, in document order of the matched node.
    pub fn matches<'q, 't>(&'q self, tree: &'t Tree) -> Vec<QueryMatch<'q, 't>> {
        let mut out = Vec::new();
        for node in tree.preorder() {
            for (pattern_index, pattern) in self.patterns.iter().enumerate() {
                for bindings in match_node(pattern, node) {
                    let captures = bindings
                        .into_iter()
                        .map(|(index, id)| QueryCapture {
                            node: tree.node(id),
                            name: &self.capture_names[index],
                            index,
                        })
                        .collect();
                    out.push(QueryMatch {
                        pattern_index,
                        captures,
                    });
                }
            }
        }
        out
    }

    /// Every captured node, once per capture name, ordered by position.
    ///
    /// Outer nodes sort before the nodes they contain.
    pub fn captures<'q, 't>(&'q self, tree: &'t Tree) -> Vec<QueryCapture<'q, 't>> {
        let mut seen = HashSet::new();
        let mut out: Vec<(usize, QueryCapture<'q, 't>)> = Vec::new();
        for m in self.matches(tree) {
            for capture in m.captures {
                if seen.insert((capture.node.id(), capture.index)) {
                    out.push((m.pattern_index, capture));
                }
            }
        }
        out.sort_by_key(|(pattern_index, c)| {
            (
                c.node.start_byte(),
                Reverse(c.node.end_byte()),
                *pattern_index,
                c.index,
            )
        });
        out.into_iter().map(|(_, capture)| capture).collect()
    }
}

/// All ways `pattern` can match at `node`.
fn match_node(pattern: &Pattern, node: Node<'_>) -> Vec<Bindings> {
    if pattern.kind.is_some_and(|kind| kind != node.kind()) {
        return Vec::new();
    }
    let children: Vec<Node<'_>> = node.children().collect();
    let mut results = match_sequence(&pattern.children, &children);
    if let Some(capture) = pattern.capture {
        for bindings in &mut results {
            bindings.insert(0, (capture, node.id()));
        }
    }
    results
}

fn match_sequence(patterns: &[Pattern], nodes: &[Node<'_>]) -> Vec<Bindings> {
    let Some((first, rest)) = patterns.split_first() else {
        return vec![Vec::new()];
    };
    let mut out = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        for head in match_node(first, *node) {
            for tail in match_sequence(rest, &nodes[i + 1..]) {
                let mut bindings = head.clone();
                bindings.extend(tail);
                out.push(bindings);
            }
        }
    }
    out
}

struct Compiler<'a> {
    language: &'a Language,
    source: &'a str,
    pos: usize,
    capture_names: Vec<String>,
}

impl<'a> Compiler<'a> {
    fn rest(&self) -> &str {
        &self.source[self.pos..]
    }

    /// Skip whitespace and `;` line comments.
    fn skip_trivia(&mut self) {
        let source: &'a str = self.source;
        loop {
            let trimmed = source[self.pos..].trim_start();
            self.pos = source.len() - trimmed.len();
            if trimmed.starts_with(';') {
                self.pos += trimmed.find('\n').unwrap_or(trimmed.len());
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        self.skip_trivia();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(Error::invalid_query(self.pos, format!("expected '{c}'")))
        }
    }

    fn identifier(&mut self) -> Option<&'a str> {
        let len = self
            .rest()
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'))
            .unwrap_or(self.rest().len());
        if len == 0 {
            return None;
        }
        let source: &'a str = self.source;
        let start = self.pos;
        self.pos += len;
        Some(&source[start..self.pos])
    }

    fn pattern(&mut self) -> Result<Pattern> {
        self.expect('(')?;
        self.skip_trivia();

        let kind_offset = self.pos;
        let kind = match self.identifier() {
            Some("_") => None,
            Some(name) => match self.language.kind_for_name(name) {
                Some(kind) => Some(kind),
                None => {
                    return Err(Error::invalid_query(
                        kind_offset,
                        format!("unknown node kind '{name}'"),
                    ));
                }
            },
            None => return Err(Error::invalid_query(kind_offset, "expected node kind")),
        };

        let mut children = Vec::new();
        loop {
            self.skip_trivia();
            match self.rest().chars().next() {
                Some('(') => children.push(self.pattern()?),
                Some(')') => {
                    self.pos += 1;
                    break;
                }
                Some(other) => {
                    return Err(Error::invalid_query(
                        self.pos,
                        format!("unexpected '{other}'"),
                    ));
                }
                None => return Err(Error::invalid_query(self.pos, "unclosed pattern")),
            }
        }

        self.skip_trivia();
        let capture = if self.rest().starts_with('@') {
            self.pos += 1;
            let offset = self.pos;
            let name = self
                .identifier()
                .ok_or_else(|| Error::invalid_query(offset, "expected capture name"))?
                .to_string();
            Some(self.capture_index(name))
        } else {
            None
        };

        Ok(Pattern {
            kind,
            capture,
            children,
        })
    }

    fn capture_index(&mut self, name: String) -> usize {
        match self.capture_names.iter().position(|n| *n == name) {
            Some(index) => index,
            None => {
                self.capture_names.push(name);
                self.capture_names.len() - 1
            }
        }
    }
}
