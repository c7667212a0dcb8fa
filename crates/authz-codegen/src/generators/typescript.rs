//! TypeScript generator

use std::fmt::Write as _;

use super::traits::{finish, quoted_list};
use super::{GENERATED_BANNER, Generator, RenderInput};
use crate::error::Result;
use crate::naming::class_names;

/// Generator for TypeScript permission and relation unions.
pub struct TypeScriptGenerator;

const CHECK_REQUEST: &str = r#"export interface CheckRequest {
  subjectType: string;
  subjectId: ResourceId;
  subjectRelation?: string;
  permission: string;
  resourceType: string;
  resourceId: string | number;
  context?: Record<string, unknown>;
}
"#;

impl TypeScriptGenerator {
    /// `export type <Name> =` followed by one union arm per entry, or `never`.
    fn union(out: &mut String, name: &str, arms: &[String]) {
        if arms.is_empty() {
            let _ = writeln!(out, "export type {name} = never;");
            return;
        }
        let _ = writeln!(out, "export type {name} =");
        for (i, arm) in arms.iter().enumerate() {
            let end = if i + 1 == arms.len() { ";" } else { "" };
            let _ = writeln!(out, "  | {{ {arm} }}{end}");
        }
    }
}

impl Generator for TypeScriptGenerator {
    fn id(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ts"]
    }

    fn render(&self, input: &RenderInput<'_>) -> Result<String> {
        let model = input.model;
        let classes = class_names(self.id(), model.object_types())?;
        let mut out = String::new();

        let _ = writeln!(out, "// {GENERATED_BANNER}");
        let _ = writeln!(
            out,
            "// This file is generated from {} and should not be modified directly.\n",
            input.source_name
        );
        out.push_str("export type ResourceId = string | number;\n\n");

        let mut permission_arms = Vec::new();
        let mut relation_arms = Vec::new();
        for (ty, ident) in &classes {
            let permissions = model.permissions_of(ty);
            if !permissions.is_empty() {
                let union = quoted_list(permissions, " | ");
                let _ = writeln!(out, "export type {ident}Permission = {union};");
                permission_arms.push(format!("resource: \"{ty}\"; permission: {union}"));
            }
            let relations = model.relations_of(ty);
            if !relations.is_empty() {
                let union = quoted_list(relations, " | ");
                let _ = writeln!(out, "export type {ident}Relation = {union};");
                relation_arms.push(format!("resource: \"{ty}\"; relation: {union}"));
            }
        }
        if !permission_arms.is_empty() || !relation_arms.is_empty() {
            out.push('\n');
        }

        Self::union(&mut out, "ResourcePermission", &permission_arms);
        out.push('\n');
        Self::union(&mut out, "ResourceRelation", &relation_arms);
        out.push('\n');

        let resource_types = if classes.is_empty() {
            "never".to_string()
        } else {
            classes
                .keys()
                .map(|ty| format!("\"{ty}\""))
                .collect::<Vec<_>>()
                .join(" | ")
        };
        let _ = writeln!(out, "export type ResourceType = {resource_types};\n");
        out.push_str(CHECK_REQUEST);

        Ok(finish(out))
    }
}
