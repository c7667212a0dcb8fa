//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// authz-sync - Keep generated authorization types in sync with a permission schema
#[derive(Parser, Debug)]
#[command(name = "authz-sync")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./authz-sync.toml when present)
    #[arg(long, global = true, env = "AUTHZ_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Compare generated files with the schema, optionally fixing them
    ///
    /// Examples:
    ///   authz-sync check --schema schema.zed --outputs resources.py
    ///   authz-sync check --schema schema.zed --outputs types.ts out/authz.json --auto-fix
    ///   authz-sync check --schema schema.zed --outputs authz.txt:json
    Check(CheckArgs),

    /// Check a hand-written relationship model against the schema
    Validate(ValidateArgs),

    /// Show what the schema parser extracts
    Inspect(InspectArgs),

    /// List the available generators
    Generators,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CheckArgs {
    /// Schema file
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Output files as PATH or PATH:GENERATOR
    #[arg(short, long, num_args = 1..)]
    pub outputs: Vec<String>,

    /// Write generated content to missing or outdated files
    #[arg(long)]
    pub auto_fix: bool,

    /// Colorize diffs (true or false)
    #[arg(long)]
    pub colorized_diff: Option<bool>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ValidateArgs {
    /// Schema file
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Model file (.py, .pyi or .ts)
    #[arg(short, long)]
    pub models: Option<PathBuf>,

    /// Name of the declaration holding the relationship fields
    #[arg(long)]
    pub class: Option<String>,

    /// Report every schema type and relation when the model declares none
    #[arg(long)]
    pub closed_world: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct InspectArgs {
    /// Schema file
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Print the syntax tree instead of the extracted model
    #[arg(long, conflicts_with = "json")]
    pub tree: bool,

    /// Print the extracted model as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_about_comes_from_doc_comment() {
        let about = Cli::command().get_about().map(ToString::to_string);
        assert_eq!(
            about.as_deref(),
            Some("authz-sync - Keep generated authorization types in sync with a permission schema")
        );
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from([
            "authz-sync",
            "-v",
            "check",
            "--schema",
            "schema.zed",
            "--outputs",
            "a.py",
            "b.ts:typescript",
            "--auto-fix",
            "--colorized-diff",
            "false",
        ]);
        assert!(cli.verbose);
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.schema, Some(PathBuf::from("schema.zed")));
        assert_eq!(args.outputs, vec!["a.py", "b.ts:typescript"]);
        assert!(args.auto_fix);
        assert_eq!(args.colorized_diff, Some(false));
    }

    #[test]
    fn test_parse_validate_defaults() {
        let cli = Cli::parse_from(["authz-sync", "validate", "--models", "m.py"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.class, None);
        assert!(!args.closed_world);
    }

    #[test]
    fn test_inspect_tree_conflicts_with_json() {
        let result = Cli::try_parse_from(["authz-sync", "inspect", "--tree", "--json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["authz-sync", "generators", "--verbose", "--config", "c.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert_eq!(cli.command, Commands::Generators);
    }
}
