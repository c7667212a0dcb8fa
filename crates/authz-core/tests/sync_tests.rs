//! Sync runs against real files

use authz_codegen::GeneratorRegistry;
use authz_core::{DiskStore, Error, OutputMapping, SyncEngine, SyncOptions, SyncState};
use authz_schema::{SchemaModel, load_schema};
use authz_fs::NormalizedPath;
use authz_test_utils::{TestWorkspace, fixtures};
use pretty_assertions::assert_eq;

fn mappings(ws: &TestWorkspace, names: &[&str]) -> Vec<OutputMapping> {
    let specs: Vec<String> = names
        .iter()
        .map(|name| ws.path(name).display().to_string())
        .collect();
    OutputMapping::parse_all(&specs).unwrap()
}

fn run(ws: &TestWorkspace, names: &[&str], auto_fix: bool) -> authz_core::SyncReport {
    let schema = load_schema(&NormalizedPath::new(ws.path("schema.zed"))).unwrap();
    let registry = GeneratorRegistry::with_builtins();
    SyncEngine::new(&registry, SyncOptions { auto_fix }).run(
        &schema.model,
        &schema.source_name,
        &mappings(ws, names),
        &DiskStore,
    )
}

#[test]
fn test_missing_outputs_are_reported_without_auto_fix() {
    let ws = TestWorkspace::new().with_schema(fixtures::VALID_SCHEMA);

    let report = run(&ws, &["resources.py", "resources.ts"], false);

    assert!(!report.is_success());
    assert_eq!(report.writes(), 0);
    for result in &report.results {
        assert_eq!(result.state(), SyncState::Reported);
        assert!(result.visited(SyncState::TargetMissing));
        assert!(result.message().contains("Re-run with --auto-fix to create it"));
    }
    ws.assert_file_not_exists("resources.py");
}

#[test]
fn test_auto_fix_creates_then_second_run_is_clean() {
    let ws = TestWorkspace::new().with_schema(fixtures::VALID_SCHEMA);

    let first = run(&ws, &["gen/resources.py", "gen/manifest.json"], true);
    assert!(!first.is_success(), "created files still need review");
    assert_eq!(first.created().count(), 2);
    ws.assert_file_contains("gen/resources.py", "class Organization(");
    ws.assert_file_contains("gen/manifest.json", "\"edit_members\"");

    let second = run(&ws, &["gen/resources.py", "gen/manifest.json"], true);
    assert!(second.is_success());
    assert_eq!(second.writes(), 0);
    assert!(second.results.iter().all(|r| r.state() == SyncState::Matches));
}

#[test]
fn test_divergent_file_is_diffed_and_left_alone() {
    let ws = TestWorkspace::new()
        .with_schema(fixtures::VALID_SCHEMA)
        .with_file("resources.ts", "export type ResourceType = \"user\";\n");

    let report = run(&ws, &["resources.ts"], false);

    let result = &report.results[0];
    assert!(result.has_difference);
    assert!(result.difference_detail.contains("-export type ResourceType = \"user\";"));
    assert!(result.difference_detail.contains("+export type ResourceType"));
    assert_eq!(ws.read("resources.ts"), "export type ResourceType = \"user\";\n");
}

#[test]
fn test_auto_fix_updates_divergent_file() {
    let ws = TestWorkspace::new()
        .with_schema(fixtures::VALID_SCHEMA)
        .with_file("resources.ts", "stale\n");

    let report = run(&ws, &["resources.ts"], true);

    assert!(report.is_success());
    assert_eq!(report.updated().count(), 1);
    assert!(report.results[0].message().starts_with("Updated "));
    ws.assert_file_contains("resources.ts", "export type ResourceType");
}

#[test]
fn test_auto_fix_overwrites_file_that_is_not_utf8() {
    let ws = TestWorkspace::new().with_schema(fixtures::VALID_SCHEMA);
    std::fs::write(ws.path("resources.py"), b"stale \xff\xfe content\n").unwrap();

    let report = run(&ws, &["resources.py"], true);

    let result = &report.results[0];
    assert!(result.visited(SyncState::Differs));
    assert_eq!(result.state(), SyncState::Applied);
    assert!(result.was_updated);
    assert!(result.succeeded);
    assert!(result.io_error.is_none());
    ws.assert_file_contains("resources.py", "class Organization(");
}

#[test]
fn test_unknown_generator_does_not_stop_siblings() {
    let ws = TestWorkspace::new().with_schema(fixtures::VALID_SCHEMA);
    let schema = SchemaModel::load(&NormalizedPath::new(ws.path("schema.zed"))).unwrap();
    let specs = vec![
        format!("{}:rust", ws.path("out.rs").display()),
        ws.path("resources.py").display().to_string(),
    ];
    let mappings = OutputMapping::parse_all(&specs).unwrap();
    let registry = GeneratorRegistry::with_builtins();

    let report = SyncEngine::new(&registry, SyncOptions { auto_fix: true }).run(
        &schema,
        "schema.zed",
        &mappings,
        &DiskStore,
    );

    assert_eq!(report.results[0].state(), SyncState::GenerationFailed);
    assert!(report.results[0].message().starts_with("Failed to generate"));
    assert!(report.results[1].was_created);
    ws.assert_file_exists("resources.py");
    ws.assert_file_not_exists("out.rs");
}

#[test]
fn test_invalid_mappings_are_batched() {
    let err = OutputMapping::parse_all(&["a.txt", "b.py", "c", "b.py"]).unwrap_err();
    let Error::InvalidOutputMappings { problems } = err else {
        panic!("expected InvalidOutputMappings");
    };
    assert_eq!(problems.len(), 3);
    assert!(problems[0].contains("'.txt'"));
}

#[test]
fn test_generation_is_byte_identical_across_runs() {
    let ws = TestWorkspace::new().with_schema(fixtures::FULL_SCHEMA);
    run(&ws, &["a/resources.py"], true);
    run(&ws, &["b/resources.py"], true);
    assert_eq!(ws.read("a/resources.py"), ws.read("b/resources.py"));
}
