//! Source generators for authz-sync
//!
//! Renders a [`SchemaModel`](authz_schema::SchemaModel) into checked-in
//! source artifacts. Each output format is a [`Generator`]; the
//! [`GeneratorRegistry`] resolves them by id or file extension.
//!
//! Built-in generators:
//!
//! - **python**: typed resource classes with `Literal` permission aliases
//! - **typescript**: discriminated permission/relation unions
//! - **json**: a manifest of the model

pub mod error;
pub mod generators;
pub mod naming;

pub use error::{Error, Result};
pub use generators::{
    Generator, GeneratorRegistry, JsonGenerator, PythonGenerator, RenderInput,
    TypeScriptGenerator,
};
