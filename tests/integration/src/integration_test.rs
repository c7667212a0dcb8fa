//! End-to-end integration test for the full pipeline
//!
//! schema file -> parse -> extract -> render -> compare with disk -> apply,
//! plus the model validator on the same schema.

use authz_codegen::{GeneratorRegistry, RenderInput};
use authz_core::{
    DiskStore, FieldPresenceValidator, MemoryStore, OutputMapping, SyncEngine, SyncOptions,
    SyncState, compare, load_declaration,
};
use authz_fs::NormalizedPath;
use authz_schema::{SchemaExtractor, language, load_schema};
use authz_test_utils::{TestWorkspace, fixtures};
use pretty_assertions::assert_eq;

fn outputs(ws: &TestWorkspace, names: &[&str]) -> Vec<OutputMapping> {
    let specs: Vec<String> = names
        .iter()
        .map(|n| ws.path(n).display().to_string())
        .collect();
    OutputMapping::parse_all(&specs).unwrap()
}

#[test]
fn test_full_schema_pipeline() {
    let ws = TestWorkspace::new().with_schema(fixtures::FULL_SCHEMA);
    let schema = load_schema(&NormalizedPath::new(ws.path("schema.zed"))).unwrap();

    let extractor = SchemaExtractor::new(language().unwrap()).unwrap();
    assert_eq!(
        extractor.permissions_for(&schema.tree, "table_view"),
        vec!["view", "edit"]
    );
    assert_eq!(schema.model.permissions_of("table_view"), ["view", "edit"]);

    let registry = GeneratorRegistry::with_builtins();
    let engine = SyncEngine::new(&registry, SyncOptions { auto_fix: true });
    let names = ["out/resources.py", "out/resources.ts", "out/resources.json"];

    let first = engine.run(&schema.model, &schema.source_name, &outputs(&ws, &names), &DiskStore);
    assert_eq!(first.created().count(), 3);
    assert!(!first.is_success());

    let second = engine.run(&schema.model, &schema.source_name, &outputs(&ws, &names), &DiskStore);
    assert!(second.is_success());
    assert_eq!(second.writes(), 0);

    ws.assert_file_contains("out/resources.py", "class TableView(Resource[TableViewPermission]):");
    ws.assert_file_contains("out/resources.ts", "export type TableViewPermission = \"view\" | \"edit\";");
    let manifest: serde_json::Value = serde_json::from_str(&ws.read("out/resources.json")).unwrap();
    assert_eq!(manifest["relations"]["table_view"][1], "creator");
}

#[test]
fn test_generated_text_compares_identical_to_disk() {
    let ws = TestWorkspace::new().with_schema(fixtures::VALID_SCHEMA);
    let schema = load_schema(&NormalizedPath::new(ws.path("schema.zed"))).unwrap();
    let registry = GeneratorRegistry::with_builtins();
    let engine = SyncEngine::new(&registry, SyncOptions { auto_fix: true });
    engine.run(&schema.model, &schema.source_name, &outputs(&ws, &["types.ts"]), &DiskStore);

    let rendered = registry
        .render("typescript", &RenderInput::new(&schema.model, &schema.source_name))
        .unwrap();
    let comparison = compare(&ws.read("types.ts"), &rendered, "types.ts");
    assert!(!comparison.has_difference);
    assert_eq!(comparison.unified_diff, "");
}

#[test]
fn test_memory_store_matches_disk_behaviour() {
    let schema = authz_schema::SchemaModel::from_source(fixtures::VALID_SCHEMA.as_bytes()).unwrap();
    let registry = GeneratorRegistry::with_builtins();
    let store = MemoryStore::new();
    let mappings = OutputMapping::parse_all(&["gen/a.py"]).unwrap();

    let engine = SyncEngine::new(&registry, SyncOptions { auto_fix: true });
    let first = engine.run(&schema, "schema.zed", &mappings, &store);
    assert_eq!(first.results[0].state(), SyncState::Applied);
    let second = engine.run(&schema, "schema.zed", &mappings, &store);
    assert_eq!(second.results[0].state(), SyncState::Matches);
    assert_eq!(store.write_count(), 1);
}

#[test]
fn test_validation_against_partially_broken_schema() {
    let ws = TestWorkspace::new()
        .with_schema(fixtures::INVALID_SCHEMA)
        .with_file("models.py", fixtures::VALID_MODELS_PY);
    let schema = load_schema(&NormalizedPath::new(ws.path("schema.zed"))).unwrap();
    assert!(schema.tree.root().has_error());

    let declaration = load_declaration(&NormalizedPath::new(ws.path("models.py")), "Relation").unwrap();
    let errors = FieldPresenceValidator::default().validate(&schema.model, &declaration);

    // invalid_definition is the only type the model does not declare
    assert!(errors.iter().any(|e| e.to_string().contains("'invalid_definition'")));
    assert!(errors.iter().all(|e| !e.to_string().starts_with("Required field")));
}
