//! Fixture texts.
//!
//! `VALID_SCHEMA` has the three core types; `FULL_SCHEMA` adds permissions
//! on `user` and a `table_view` type, which exercises multi-word names in
//! generated code.

/// `user`, `group`, `organization` with relations and permissions.
pub const VALID_SCHEMA: &str = r#"definition user {}

definition group {
    relation organization: organization
    relation member: user | group#member

    permission edit_members = organization->administrate
}

definition organization {
    relation admin: user

    permission administrate = admin
    permission read = admin
}
"#;

/// Superset of [`VALID_SCHEMA`] used by generator tests.
pub const FULL_SCHEMA: &str = r#"/** users of the system */
definition user {
    permission read = nil
    permission update = nil
    permission make_admin = nil
    permission revoke_admin = nil
}

definition group {
    relation organization: organization
    relation member: user | group#member

    permission edit_members = organization->administrate
}

definition organization {
    relation admin: user

    permission administrate = admin
    permission read = admin + member
}

definition table_view {
    relation organization: organization
    relation creator: user

    permission view = creator + organization->read
    permission edit = creator
}
"#;

/// Broken syntax around otherwise recognizable definitions.
pub const INVALID_SCHEMA: &str = r#"definition user {}

definition group {
    relation organization: organization
    relation member user
    permission edit_members = organization->administrate
}

definition organization {
    relation admin: user
    permission administrate = admin

definition invalid_definition {
    relation : user
    this is not a statement
}
"#;

/// A model class declaring every field with vocabularies matching [`VALID_SCHEMA`].
pub const VALID_MODELS_PY: &str = r#"from typing import Literal

from pydantic import BaseModel


class Relation(BaseModel):
    """A relationship between a subject and an object."""

    subject_type: Literal["user", "group", "organization"]
    subject_id: str
    subject_relation: Literal["member"] | None = None
    relation: Literal["member", "organization", "admin"]
    object_type: Literal["user", "group", "organization"]
    object_id: str
"#;

/// A model class with missing fields and mismatched vocabularies.
pub const INVALID_MODELS_PY: &str = r#"from typing import Literal

from pydantic import BaseModel


class Relation(BaseModel):
    # subject_type is missing
    subject_id: str
    relation: Literal["invalid_relation", "nonexistent_relation"]
    object_type: Literal["user", "group"]
    object_id: str
"#;

/// TypeScript counterpart of [`VALID_MODELS_PY`].
pub const VALID_MODELS_TS: &str = r#"export interface Relation {
  subject_type: "user" | "group" | "organization";
  subject_id: string;
  subject_relation?: "member";
  relation: "member" | "organization" | "admin";
  object_type: "user" | "group" | "organization";
  object_id: string;
}
"#;
