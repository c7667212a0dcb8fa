//! Grammar and syntax tree layer
//!
//! A native, error-tolerant implementation of the permission schema grammar:
//!
//! - **language**: node kind and keyword tables, compiled once per process
//! - **lexer**: byte-span tokens, never fails
//! - **parser**: recursive descent producing a concrete syntax tree; syntax
//!   errors become `ERROR` nodes and parsing resumes
//! - **tree**: arena-backed tree with borrowed [`Node`] handles
//! - **query**: S-expression structural patterns with named captures

mod language;
mod lexer;
mod parser;
mod query;
mod tree;

pub use language::{Keyword, Language, NodeKind, language};
pub use parser::{MAX_SOURCE_BYTES, Parser};
pub use query::{Query, QueryCapture, QueryMatch};
pub use tree::{Node, NodeId, Point, Tree};
