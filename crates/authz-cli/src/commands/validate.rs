//! Validate command implementation

use std::path::Path;

use colored::Colorize;

use authz_core::{FieldPresenceValidator, SyncConfig, ValidationError, load_declaration};
use authz_schema::load_schema;

use super::{resolve_input, schema_path};
use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};

/// Run the validate command
///
/// Prints every finding and fails when there is at least one.
pub fn run_validate(cwd: &Path, config: &SyncConfig, args: &ValidateArgs, verbose: bool) -> Result<()> {
    let section = config.validate_section();
    let schema_path = schema_path(cwd, args.schema.as_ref(), config)?;
    let models_path = resolve_input(
        cwd,
        args.models.as_ref(),
        section.models.as_deref(),
        "model file",
        "pass --models or set `models` under [validate] in the config file",
    )?;
    let class = args.class.as_deref().unwrap_or(&section.class);
    let open_world = section.open_world && !args.closed_world;

    let schema = load_schema(&schema_path)?;
    let declaration = load_declaration(&models_path, class)?;
    let errors = FieldPresenceValidator::new(open_world).validate(&schema.model, &declaration);

    if errors.is_empty() {
        if verbose {
            println!(
                "{} {} matches {}",
                "OK".green().bold(),
                class.cyan(),
                schema.source_name
            );
        }
        return Ok(());
    }

    println!(
        "{} {} does not match {}:",
        "INVALID".red().bold(),
        class.cyan(),
        schema.source_name
    );
    for error in &errors {
        println!("   {} {}", marker(error), error);
    }
    Err(CliError::user(format!(
        "{} validation error{} in {models_path}",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" }
    )))
}

fn marker(error: &ValidationError) -> colored::ColoredString {
    match error {
        ValidationError::MissingRequiredField { .. } => "!".red(),
        ValidationError::MissingObjectType { .. } | ValidationError::MissingRelation { .. } => {
            "-".yellow()
        }
    }
}
