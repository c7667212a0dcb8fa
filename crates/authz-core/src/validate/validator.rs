//! Field-presence checks of a model declaration against the schema

use indexmap::IndexSet;

use authz_schema::SchemaModel;

use super::contract::FieldContract;
use super::reader::ModelDeclaration;

/// One validation finding.
///
/// Findings are collected, never raised; a run reports all of them at once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Object type '{object_type}' is defined in the schema but not declared by the model")]
    MissingObjectType { object_type: String },

    #[error("Relation '{object_type}#{relation}' is defined in the schema but not declared by the model")]
    MissingRelation {
        object_type: String,
        relation: String,
    },

    #[error("Required field '{field}' is missing from the model")]
    MissingRequiredField { field: String },
}

/// Compares a hand-written relationship model with a schema model.
///
/// With `open_world` set, an empty declared vocabulary accepts every schema
/// type and relation. Without it, an empty vocabulary reports all of them.
#[derive(Debug, Clone)]
pub struct FieldPresenceValidator {
    open_world: bool,
    contract: FieldContract,
}

impl FieldPresenceValidator {
    pub fn new(open_world: bool) -> Self {
        Self {
            open_world,
            contract: FieldContract::standard(),
        }
    }

    pub fn with_contract(mut self, contract: FieldContract) -> Self {
        self.contract = contract;
        self
    }

    pub fn open_world(&self) -> bool {
        self.open_world
    }

    pub fn contract(&self) -> &FieldContract {
        &self.contract
    }

    fn accepts_anything(&self, declared: &IndexSet<String>) -> bool {
        self.open_world && declared.is_empty()
    }

    /// One finding per schema object type missing from `declared`, in
    /// schema order.
    pub fn validate_object_types(
        &self,
        model: &SchemaModel,
        declared: &IndexSet<String>,
    ) -> Vec<ValidationError> {
        if self.accepts_anything(declared) {
            return Vec::new();
        }
        model
            .object_types()
            .iter()
            .filter(|object_type| !declared.contains(object_type.as_str()))
            .map(|object_type| ValidationError::MissingObjectType {
                object_type: object_type.clone(),
            })
            .collect()
    }

    /// One finding per relation declaration whose name is missing from
    /// `declared`. A relation the schema repeats is reported once per
    /// occurrence.
    pub fn validate_relations(
        &self,
        model: &SchemaModel,
        declared: &IndexSet<String>,
    ) -> Vec<ValidationError> {
        if self.accepts_anything(declared) {
            return Vec::new();
        }
        model
            .relation_pairs()
            .filter(|(_, relation)| !declared.contains(*relation))
            .map(|(object_type, relation)| ValidationError::MissingRelation {
                object_type: object_type.to_string(),
                relation: relation.to_string(),
            })
            .collect()
    }

    /// One finding per required contract field absent from `declared`, in
    /// contract order. The open-world rule does not apply here.
    pub fn validate_required_fields(&self, declared: &IndexSet<String>) -> Vec<ValidationError> {
        self.contract
            .required()
            .iter()
            .filter(|field| !declared.contains(field.as_str()))
            .map(|field| ValidationError::MissingRequiredField {
                field: field.clone(),
            })
            .collect()
    }

    /// Object-type, relation and required-field findings, in that order.
    pub fn validate(
        &self,
        model: &SchemaModel,
        declaration: &ModelDeclaration,
    ) -> Vec<ValidationError> {
        let mut errors =
            self.validate_object_types(model, &declaration.declared_object_types());
        errors.extend(self.validate_relations(model, &declaration.declared_relations()));
        errors.extend(self.validate_required_fields(&declaration.field_names()));
        tracing::debug!(
            declaration = %declaration.name,
            findings = errors.len(),
            open_world = self.open_world,
            "validated model declaration"
        );
        errors
    }
}

impl Default for FieldPresenceValidator {
    fn default() -> Self {
        Self::new(true)
    }
}
