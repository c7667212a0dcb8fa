//! Python generator
//!
//! Emits one `Literal` alias per type for its permissions (and relations when
//! it has any), a generic `Resource` base and one subclass per object type,
//! plus the `on_resource(...).check_that(...).can(...)` request builder.

use std::fmt::Write as _;

use super::traits::{finish, quoted_list};
use super::{GENERATED_BANNER, Generator, RenderInput};
use crate::error::Result;
use crate::naming::class_names;

/// Generator for Python type definitions.
pub struct PythonGenerator;

const PRELUDE: &str = r#"from typing import Any, Generic, Literal, NamedTuple, Never, TypeVar

# Type aliases
ResourceId = int | str
Context = dict[str, Any] | None


class CheckRequest(NamedTuple):
    """A request to check a permission or relation."""

    subject_type: str
    subject_id: ResourceId
    subject_relation: str | None
    action: str
    resource_type: str
    resource_id: ResourceId
    context: Context = None
"#;

const BASE: &str = r#"# Type variable for permissions
P = TypeVar("P")


# Base resource class
class Resource(Generic[P]):
    """Base class for all resources with typed permissions."""

    def __init__(self, id: ResourceId, resource_type: str):
        self.id = id
        self.type = resource_type
"#;

const DSL: &str = r#"# Permission check builder
class ResourceCheck(Generic[P]):
    """First step in the permission check chain."""

    def __init__(self, resource: Resource[P]):
        self.resource = resource

    def check_that(
        self, subject: Resource, *, subject_relation: str | None = None
    ) -> "SubjectCheck[P]":
        return SubjectCheck(self.resource, subject, subject_relation)


class SubjectCheck(Generic[P]):
    """Second step in the permission check chain."""

    def __init__(
        self, resource: Resource[P], subject: Resource, subject_relation: str | None
    ):
        self.resource = resource
        self.subject = subject
        self.subject_relation = subject_relation

    def can(self, permission: P, context: Context = None) -> CheckRequest:
        return CheckRequest(
            subject_type=self.subject.type,
            subject_id=self.subject.id,
            subject_relation=self.subject_relation,
            action=str(permission),
            resource_type=self.resource.type,
            resource_id=self.resource.id,
            context=context,
        )


def on_resource(resource: Resource[P]) -> ResourceCheck[P]:
    """Start a permission check chain for the specified resource."""
    return ResourceCheck(resource)
"#;

impl Generator for PythonGenerator {
    fn id(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py", "pyi"]
    }

    fn render(&self, input: &RenderInput<'_>) -> Result<String> {
        let model = input.model;
        let classes = class_names(self.id(), model.object_types())?;
        let mut out = String::new();

        let _ = writeln!(out, "\"\"\"\n{GENERATED_BANNER}");
        let _ = writeln!(
            out,
            "This file is generated from {} and should not be modified directly.\n\"\"\"\n",
            input.source_name
        );
        out.push_str(PRELUDE);
        out.push_str("\n\n# Permissions and relations per object type\n");

        for (ty, ident) in &classes {
            let permissions = model.permissions_of(ty);
            if permissions.is_empty() {
                let _ = writeln!(out, "{ident}Permission = Never");
            } else {
                let _ = writeln!(
                    out,
                    "{ident}Permission = Literal[{}]",
                    quoted_list(permissions, ", ")
                );
            }
            let relations = model.relations_of(ty);
            if !relations.is_empty() {
                let _ = writeln!(
                    out,
                    "{ident}Relation = Literal[{}]",
                    quoted_list(relations, ", ")
                );
            }
        }

        out.push_str("\n\n");
        out.push_str(BASE);

        for (ty, ident) in &classes {
            let _ = write!(
                out,
                "\n\nclass {ident}(Resource[{ident}Permission]):\n    \
                 \"\"\"{ident} resource from {source}\"\"\"\n\n    \
                 permission_type = {ident}Permission\n\n    \
                 def __init__(self, id: ResourceId):\n        \
                 super().__init__(id, \"{ty}\")\n",
                source = input.source_name,
            );
        }

        out.push_str("\n\n");
        out.push_str(DSL);
        Ok(finish(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authz_schema::SchemaModel;

    #[test]
    fn test_type_without_permissions_uses_never() {
        let model = SchemaModel::builder().object_type("user").build();
        let text = PythonGenerator
            .render(&RenderInput::new(&model, "schema.zed"))
            .unwrap();
        assert!(text.contains("UserPermission = Never\n"));
        assert!(!text.contains("UserRelation"));
        assert!(text.contains("class User(Resource[UserPermission]):"));
    }

    #[test]
    fn test_header_names_source() {
        let model = SchemaModel::default();
        let text = PythonGenerator
            .render(&RenderInput::new(&model, "authz.zed"))
            .unwrap();
        assert!(text.starts_with("\"\"\"\nGENERATED CODE - DO NOT EDIT MANUALLY\n"));
        assert!(text.contains("generated from authz.zed"));
        assert!(text.ends_with("return ResourceCheck(resource)\n"));
    }
}
