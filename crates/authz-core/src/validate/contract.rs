//! Required relationship fields

/// Field names a relationship model must declare, in reporting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldContract {
    required: Vec<String>,
    optional: Vec<String>,
}

impl FieldContract {
    /// `subject_type, subject_id, relation, object_type, object_id`, with
    /// `subject_relation` optional.
    pub fn standard() -> Self {
        Self::new(
            ["subject_type", "subject_id", "relation", "object_type", "object_id"],
            ["subject_relation"],
        )
    }

    pub fn new<R, O>(required: R, optional: O) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
            optional: optional.into_iter().map(Into::into).collect(),
        }
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn optional(&self) -> &[String] {
        &self.optional
    }
}

impl Default for FieldContract {
    fn default() -> Self {
        Self::standard()
    }
}
