//! Schema grammar, syntax tree queries and model extraction
//!
//! Turns permission schema text into a queryable syntax tree and extracts
//! the [`SchemaModel`] (object types, relations, permissions) from it.
//!
//! ```text
//! bytes --Parser--> Tree --SchemaExtractor--> SchemaModel
//!                    ^
//!                  Query
//! ```
//!
//! The grammar is compiled once per process by [`language()`]; every
//! component that needs it receives the returned handle by parameter.

pub mod error;
pub mod extract;
pub mod grammar;
pub mod model;

pub use error::{Error, Result};
pub use extract::{ParsedSchema, SchemaExtractor, load_schema};
pub use grammar::{
    Language, MAX_SOURCE_BYTES, Node, NodeKind, Parser, Point, Query, QueryCapture, QueryMatch,
    Tree, language,
};
pub use model::{SchemaModel, SchemaModelBuilder};
