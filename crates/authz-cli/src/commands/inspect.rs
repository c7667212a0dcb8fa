//! Inspect command implementation
//!
//! Shows what the parser and extractor see in a schema file.

use std::fmt::Write as _;
use std::path::Path;

use colored::Colorize;

use authz_core::SyncConfig;
use authz_schema::{SchemaModel, load_schema};

use super::schema_path;
use crate::cli::InspectArgs;
use crate::error::Result;

/// Run the inspect command
pub fn run_inspect(cwd: &Path, config: &SyncConfig, args: &InspectArgs) -> Result<()> {
    let schema_path = schema_path(cwd, args.schema.as_ref(), config)?;
    let schema = load_schema(&schema_path)?;

    if args.tree {
        print!("{}", schema.tree.outline());
        if schema.tree.root().has_error() {
            eprintln!(
                "{} {} contains syntax errors; extraction is partial",
                "warning:".yellow().bold(),
                schema.source_name
            );
        }
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&schema.model)?);
    } else {
        print!("{}", render_model(&schema.model));
    }
    Ok(())
}

/// One block per object type listing its relations and permissions.
fn render_model(model: &SchemaModel) -> String {
    if model.is_empty() {
        return "No object types found\n".to_string();
    }
    let mut out = String::new();
    for object_type in model.object_types() {
        let _ = writeln!(out, "{}", object_type.bold());
        let _ = writeln!(out, "  relations:   {}", list(model.relations_of(object_type)));
        let _ = writeln!(out, "  permissions: {}", list(model.permissions_of(object_type)));
    }
    out
}

fn list(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}
