//! Generators - one per output format
//!
//! - **PythonGenerator**: `.py` / `.pyi` resource classes
//! - **TypeScriptGenerator**: `.ts` permission unions
//! - **JsonGenerator**: `.json` model manifest

mod json;
mod python;
mod registry;
mod traits;
mod typescript;

pub use json::JsonGenerator;
pub use python::PythonGenerator;
pub use registry::GeneratorRegistry;
pub use traits::{Generator, RenderInput};
pub use typescript::TypeScriptGenerator;

pub(crate) const GENERATED_BANNER: &str = "GENERATED CODE - DO NOT EDIT MANUALLY";
