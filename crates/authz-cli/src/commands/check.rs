//! Check command implementation
//!
//! Regenerates every requested artifact in memory and compares it with the
//! file on disk, writing it back only with `--auto-fix`.

use std::path::Path;

use colored::Colorize;

use authz_codegen::GeneratorRegistry;
use authz_core::{DiskStore, OutputMapping, SyncConfig, SyncEngine, SyncOptions, SyncResult, SyncState};
use authz_schema::load_schema;

use super::schema_path;
use crate::cli::CheckArgs;
use crate::error::{CliError, Result};

/// Run the check command
///
/// Prints one line per artifact and any diffs to stderr. Fails unless every
/// artifact is in sync (or was updated) and no file had to be created.
pub fn run_check(cwd: &Path, config: &SyncConfig, args: &CheckArgs, verbose: bool) -> Result<()> {
    let schema_path = schema_path(cwd, args.schema.as_ref(), config)?;

    let mut mappings = if args.outputs.is_empty() {
        OutputMapping::from_entries(&config.outputs)?
    } else {
        OutputMapping::parse_all(&args.outputs)?
    };
    if mappings.is_empty() {
        return Err(CliError::user(
            "No outputs given; pass --outputs or add [[outputs]] to the config file",
        ));
    }
    for mapping in &mut mappings {
        mapping.path = authz_fs::NormalizedPath::new(cwd.join(mapping.path.to_native()));
    }

    let schema = load_schema(&schema_path)?;
    let options = SyncOptions {
        auto_fix: args.auto_fix || config.auto_fix.unwrap_or(false),
    };
    let colorize = args.colorized_diff.or(config.colorized_diff).unwrap_or(true);

    let registry = GeneratorRegistry::with_builtins();
    let report = SyncEngine::new(&registry, options).run(
        &schema.model,
        &schema.source_name,
        &mappings,
        &DiskStore,
    );

    for result in &report.results {
        print_result(result);
        if result.has_difference && result.visited(SyncState::Differs) {
            eprint!("{}", render_diff(&result.difference_detail, colorize));
        }
    }

    if report.is_success() {
        if verbose {
            println!("{}", "Schema and generated files are in sync".green());
        }
        Ok(())
    } else {
        let failed = report.failed().count();
        Err(CliError::user(format!(
            "{failed} of {} generated files need attention",
            report.results.len()
        )))
    }
}

fn print_result(result: &SyncResult) {
    let label = match result.state() {
        SyncState::Matches => "OK".green().bold(),
        SyncState::Applied if result.was_created => "CREATED".yellow().bold(),
        SyncState::Applied => "UPDATED".cyan().bold(),
        SyncState::Reported if result.visited(SyncState::TargetMissing) => {
            "MISSING".yellow().bold()
        }
        SyncState::Reported if result.io_error.is_none() => "DRIFTED".red().bold(),
        _ => "FAILED".red().bold(),
    };
    println!("{label} {}", result.message());
}

/// Colour a unified diff line by line, or return it unchanged.
fn render_diff(diff: &str, colorize: bool) -> String {
    if !colorize {
        return diff.to_string();
    }
    let mut out = String::with_capacity(diff.len());
    for line in diff.split_inclusive('\n') {
        let painted = if line.starts_with("---") || line.starts_with("+++") {
            line.bold()
        } else if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else {
            line.normal()
        };
        out.push_str(&painted.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use authz_test_utils::{TestWorkspace, fixtures};

    fn args(outputs: &[&str], auto_fix: bool) -> CheckArgs {
        CheckArgs {
            schema: Some("schema.zed".into()),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            auto_fix,
            colorized_diff: Some(false),
        }
    }

    #[test]
    fn test_render_diff_plain_is_unchanged() {
        let diff = "--- a\n+++ a (generated)\n@@ -1 +1 @@\n-x\n+y\n";
        assert_eq!(render_diff(diff, false), diff);
    }

    #[test]
    fn test_check_fails_then_passes_after_auto_fix() {
        let ws = TestWorkspace::new()
            .with_schema(fixtures::VALID_SCHEMA)
            .with_file("resources.py", "outdated\n");
        let config = SyncConfig::default();

        assert!(run_check(ws.root(), &config, &args(&["resources.py"], false), false).is_err());
        run_check(ws.root(), &config, &args(&["resources.py"], true), false).unwrap();
        run_check(ws.root(), &config, &args(&["resources.py"], false), true).unwrap();
    }

    #[test]
    fn test_created_file_still_fails() {
        let ws = TestWorkspace::new().with_schema(fixtures::VALID_SCHEMA);
        let err = run_check(
            ws.root(),
            &SyncConfig::default(),
            &args(&["out/types.ts"], true),
            false,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "1 of 1 generated files need attention");
        ws.assert_file_exists("out/types.ts");
    }

    #[test]
    fn test_outputs_come_from_config() {
        let ws = TestWorkspace::new()
            .with_schema(fixtures::VALID_SCHEMA)
            .with_file("resources.json", "{}\n");
        let config = SyncConfig {
            outputs: vec![authz_core::OutputEntry {
                path: "resources.json".into(),
                generator: None,
            }],
            auto_fix: Some(true),
            ..SyncConfig::default()
        };
        let no_flags = CheckArgs {
            outputs: Vec::new(),
            ..args(&[], false)
        };
        run_check(ws.root(), &config, &no_flags, false).unwrap();
        ws.assert_file_contains("resources.json", "\"object_types\"");
    }

    #[test]
    fn test_no_outputs_is_an_error() {
        let ws = TestWorkspace::new().with_schema(fixtures::VALID_SCHEMA);
        let err = run_check(ws.root(), &SyncConfig::default(), &args(&[], false), false).unwrap_err();
        assert!(err.to_string().starts_with("No outputs given"));
    }
}
