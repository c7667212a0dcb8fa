//! JSON manifest generator

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::traits::finish;
use super::{GENERATED_BANNER, Generator, RenderInput};
use crate::error::Result;

/// Generator for a pretty-printed JSON manifest of the model.
pub struct JsonGenerator;

#[derive(Serialize)]
struct Manifest<'a> {
    #[serde(rename = "_generated")]
    generated: String,
    object_types: &'a IndexSet<String>,
    relations: &'a IndexMap<String, Vec<String>>,
    permissions: &'a IndexMap<String, Vec<String>>,
}

impl Generator for JsonGenerator {
    fn id(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn render(&self, input: &RenderInput<'_>) -> Result<String> {
        let manifest = Manifest {
            generated: format!("{GENERATED_BANNER} (source: {})", input.source_name),
            object_types: input.model.object_types(),
            relations: input.model.relations(),
            permissions: input.model.permissions(),
        };
        Ok(finish(serde_json::to_string_pretty(&manifest)?))
    }
}
