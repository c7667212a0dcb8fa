//! Generators command implementation

use colored::Colorize;

use authz_codegen::GeneratorRegistry;

use crate::error::Result;

/// List every registered generator with the extensions it claims.
pub fn run_generators() -> Result<()> {
    let registry = GeneratorRegistry::with_builtins();
    println!("{}", "Available generators:".bold());
    for generator in registry.iter() {
        let extensions = generator
            .extensions()
            .iter()
            .map(|e| format!(".{e}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("   {} {}", format!("{:<12}", generator.id()).cyan(), extensions.dimmed());
    }
    Ok(())
}
