//! Scenario tests for drift detection, mapping rejection and idempotence

use authz_codegen::GeneratorRegistry;
use authz_core::{DiskStore, Error, OutputMapping, SyncEngine, SyncOptions, SyncState};
use authz_fs::NormalizedPath;
use authz_schema::load_schema;
use authz_test_utils::{TestWorkspace, fixtures};
use pretty_assertions::assert_eq;

/// A Python target written before `edit_members` existed.
const STALE_RESOURCES_PY: &str = r#"class Group:
    relations = ["organization", "member"]
"#;

fn sync(ws: &TestWorkspace, specs: &[String], auto_fix: bool) -> authz_core::Result<authz_core::SyncReport> {
    let mappings = OutputMapping::parse_all(specs)?;
    let schema = load_schema(&NormalizedPath::new(ws.path("schema.zed")))?;
    let registry = GeneratorRegistry::with_builtins();
    Ok(SyncEngine::new(&registry, SyncOptions { auto_fix }).run(
        &schema.model,
        &schema.source_name,
        &mappings,
        &DiskStore,
    ))
}

fn spec(ws: &TestWorkspace, name: &str) -> String {
    ws.path(name).display().to_string()
}

#[test]
fn scenario_divergent_target_without_auto_fix() {
    let ws = TestWorkspace::new()
        .with_schema(fixtures::VALID_SCHEMA)
        .with_file("resources.py", STALE_RESOURCES_PY);

    let report = sync(&ws, &[spec(&ws, "resources.py")], false).unwrap();

    assert!(!report.is_success());
    let result = &report.results[0];
    assert!(result.has_difference);
    assert_eq!(result.state(), SyncState::Reported);
    assert!(!result.difference_detail.is_empty());
    assert!(result.difference_detail.lines().any(|l| l.starts_with("-class Group:")));
    assert!(result.difference_detail.lines().any(|l| l.starts_with('+') && l.contains("edit_members")));
    assert_eq!(ws.read("resources.py"), STALE_RESOURCES_PY);
}

#[test]
fn scenario_unknown_extension_rejects_the_whole_run() {
    let ws = TestWorkspace::new().with_schema(fixtures::VALID_SCHEMA);
    let specs = [spec(&ws, "resources.py"), spec(&ws, "resources.rb")];

    let err = sync(&ws, &specs, true).unwrap_err();

    let Error::InvalidOutputMappings { problems } = err else {
        panic!("expected a batch of mapping problems, got {err:?}");
    };
    assert_eq!(problems.len(), 1);
    assert!(problems[0].contains("'.rb'"));
    ws.assert_file_not_exists("resources.py");
}

#[test]
fn scenario_explicit_generator_overrides_extension() {
    let ws = TestWorkspace::new().with_schema(fixtures::VALID_SCHEMA);
    let specs = [format!("{}:json", spec(&ws, "authz.txt"))];

    sync(&ws, &specs, true).unwrap();

    let manifest: serde_json::Value = serde_json::from_str(&ws.read("authz.txt")).unwrap();
    assert_eq!(manifest["object_types"][0], "user");
}

#[test]
fn scenario_second_auto_fix_run_writes_nothing() {
    let ws = TestWorkspace::new()
        .with_schema(fixtures::FULL_SCHEMA)
        .with_file("resources.ts", "// stale\n");
    let specs = [spec(&ws, "resources.ts"), spec(&ws, "resources.py")];

    let first = sync(&ws, &specs, true).unwrap();
    assert_eq!(first.updated().count(), 1);
    assert_eq!(first.created().count(), 1);
    let before = ws.modified("resources.ts");

    let second = sync(&ws, &specs, true).unwrap();
    assert_eq!(second.writes(), 0);
    assert!(second.is_success());
    assert_eq!(ws.modified("resources.ts"), before);
}

#[test]
fn scenario_schema_change_is_detected_as_drift() {
    let ws = TestWorkspace::new().with_schema(fixtures::VALID_SCHEMA);
    let specs = [spec(&ws, "resources.ts")];
    sync(&ws, &specs, true).unwrap();

    ws.write(
        "schema.zed",
        &fixtures::VALID_SCHEMA.replace("permission administrate", "permission manage"),
    );
    let report = sync(&ws, &specs, false).unwrap();

    let diff = &report.results[0].difference_detail;
    assert!(diff.contains("-export type OrganizationPermission = \"administrate\""));
    assert!(diff.contains("+export type OrganizationPermission = \"manage\""));
}
