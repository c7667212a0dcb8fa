//! Rendering of the shared fixture schema through the built-in generators.

use authz_codegen::{Error, GeneratorRegistry, RenderInput};
use authz_schema::SchemaModel;
use authz_test_utils::fixtures;
use rstest::rstest;

fn render(id: &str) -> String {
    let model = SchemaModel::from_source(fixtures::FULL_SCHEMA.as_bytes()).unwrap();
    GeneratorRegistry::with_builtins()
        .render(id, &RenderInput::new(&model, "schema.zed"))
        .unwrap()
}

#[rstest]
#[case("GENERATED CODE - DO NOT EDIT MANUALLY")]
#[case("ResourceId = int | str")]
#[case("P = TypeVar(\"P\")")]
#[case("class Resource(Generic[P])")]
#[case("def __init__(self, id: ResourceId, resource_type: str)")]
#[case("UserPermission = Literal[\"read\", \"update\", \"make_admin\", \"revoke_admin\"]")]
#[case("GroupRelation = Literal[\"organization\", \"member\"]")]
#[case("class User(Resource[UserPermission])")]
#[case("class Group(Resource[GroupPermission])")]
#[case("class Organization(Resource[OrganizationPermission])")]
#[case("class TableView(Resource[TableViewPermission])")]
#[case("permission_type = TableViewPermission")]
#[case("super().__init__(id, \"table_view\")")]
#[case("def on_resource(resource: Resource[P]) -> ResourceCheck[P]:")]
fn test_python_output_contains(#[case] needle: &str) {
    let text = render("python");
    assert!(text.contains(needle), "missing {needle:?} in:\n{text}");
}

#[test]
fn test_python_uses_pascal_case_only() {
    let text = render("python");
    assert!(!text.contains("class Table_view"));
    assert!(!text.contains("class table_view"));
}

#[rstest]
#[case("GENERATED CODE - DO NOT EDIT MANUALLY")]
#[case("export type ResourcePermission =")]
#[case(r#"resource: "user"; permission: "read" | "update" | "make_admin" | "revoke_admin""#)]
#[case(r#"resource: "group"; permission: "edit_members""#)]
#[case(r#"resource: "organization"; permission: "administrate" | "read""#)]
#[case(r#"resource: "table_view"; relation: "organization" | "creator""#)]
#[case("resourceId: string | number")]
#[case("export type TableViewPermission = \"view\" | \"edit\";")]
fn test_typescript_output_contains(#[case] needle: &str) {
    let text = render("typescript");
    assert!(text.contains(needle), "missing {needle:?} in:\n{text}");
}

#[rstest]
#[case("python")]
#[case("typescript")]
#[case("json")]
fn test_rendering_is_deterministic(#[case] id: &str) {
    let first = render(id);
    let second = render(id);
    assert_eq!(first, second);
    assert!(first.ends_with('\n'));
    assert!(!first.ends_with("\n\n"));
}

#[rstest]
#[case("python")]
#[case("typescript")]
fn test_colliding_type_names_fail_render(#[case] id: &str) {
    let model = SchemaModel::from_source(b"definition a_b {}\ndefinition a/b {}").unwrap();
    let err = GeneratorRegistry::with_builtins()
        .render(id, &RenderInput::new(&model, "schema.zed"))
        .unwrap_err();
    assert!(matches!(err, Error::Render { .. }), "{err}");
}
