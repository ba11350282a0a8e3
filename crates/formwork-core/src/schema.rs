//! The form schema and its structural invariants.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::FormField;

/// Name given to schemas created from scratch.
pub const UNTITLED_FORM_NAME: &str = "Untitled Form";

/// A complete form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub id: String,

    pub name: String,

    pub created_at: DateTime<Utc>,

    /// Display and tab order.
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl FormSchema {
    /// Creates an empty schema.
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at,
            fields: Vec::new(),
        }
    }

    /// Looks up a field by id.
    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Returns the position of a field by id.
    pub fn field_index(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Iterates over derived fields in schema order.
    pub fn derived_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(|f| f.derivation().is_some())
    }
}

/// A broken structural invariant in a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("schema id is empty")]
    EmptyId,

    #[error("field id is empty at position {0}")]
    EmptyFieldId(usize),

    #[error("duplicate field id: {0}")]
    DuplicateFieldId(String),

    #[error("field {0} is marked derived but has no derived config")]
    MissingDerivedConfig(String),

    #[error("field {0} has a derived config but is not marked derived")]
    UnexpectedDerivedConfig(String),

    #[error("field {0} needs at least one option")]
    MissingOptions(String),

    #[error("field {field} has a {rule} rule without a value")]
    MissingRuleValue { field: String, rule: String },

    #[error("field {field} derives from unknown field {parent}")]
    UnknownParent { field: String, parent: String },
}

/// Checks the invariants every stored schema must satisfy.
///
/// Returns the first problem found, in field order.
pub fn validate_schema(schema: &FormSchema) -> Result<(), SchemaError> {
    if schema.id.trim().is_empty() {
        return Err(SchemaError::EmptyId);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (i, field) in schema.fields.iter().enumerate() {
        if field.id.trim().is_empty() {
            return Err(SchemaError::EmptyFieldId(i));
        }
        if !seen.insert(field.id.as_str()) {
            return Err(SchemaError::DuplicateFieldId(field.id.clone()));
        }
    }

    for field in &schema.fields {
        match (field.is_derived, &field.derived_config) {
            (true, None) => return Err(SchemaError::MissingDerivedConfig(field.id.clone())),
            (false, Some(_)) => {
                return Err(SchemaError::UnexpectedDerivedConfig(field.id.clone()));
            }
            _ => {}
        }

        if field.field_type.has_options()
            && field.options.as_ref().is_none_or(|opts| opts.is_empty())
        {
            return Err(SchemaError::MissingOptions(field.id.clone()));
        }

        for rule in &field.validation_rules {
            if rule.rule_type.takes_value() && rule.value.is_none() {
                return Err(SchemaError::MissingRuleValue {
                    field: field.id.clone(),
                    rule: rule.rule_type.as_str().to_owned(),
                });
            }
        }

        if let Some(config) = field.derivation() {
            for parent in &config.parent_field_ids {
                if !seen.contains(parent.as_str()) {
                    return Err(SchemaError::UnknownParent {
                        field: field.id.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{FieldType, ValidationRuleType};
    use crate::field::{DerivedFieldConfig, FormFieldBuilder, ValidationRule};
    use pretty_assertions::assert_eq;

    fn schema(fields: Vec<FormField>) -> FormSchema {
        let mut s = FormSchema::new("form_test", "Test", Utc::now());
        s.fields = fields;
        s
    }

    #[test]
    fn valid_schema_passes() {
        let s = schema(vec![
            FormFieldBuilder::new("a", FieldType::Number).build(),
            FormFieldBuilder::new("b", FieldType::Number)
                .derived(DerivedFieldConfig::new(["a"], "{a} * 2"))
                .build(),
            FormFieldBuilder::new("c", FieldType::Radio)
                .options(["x", "y"])
                .build(),
        ]);
        assert_eq!(validate_schema(&s), Ok(()));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let s = schema(vec![
            FormFieldBuilder::new("a", FieldType::Text).build(),
            FormFieldBuilder::new("a", FieldType::Email).build(),
        ]);
        assert_eq!(
            validate_schema(&s),
            Err(SchemaError::DuplicateFieldId("a".into()))
        );
    }

    #[test]
    fn derived_flag_must_match_config() {
        let mut f = FormFieldBuilder::new("a", FieldType::Number).build();
        f.is_derived = true;
        assert_eq!(
            validate_schema(&schema(vec![f.clone()])),
            Err(SchemaError::MissingDerivedConfig("a".into()))
        );

        f.is_derived = false;
        f.derived_config = Some(DerivedFieldConfig::default());
        assert_eq!(
            validate_schema(&schema(vec![f])),
            Err(SchemaError::UnexpectedDerivedConfig("a".into()))
        );
    }

    #[test]
    fn select_needs_options() {
        let mut f = FormFieldBuilder::new("pick", FieldType::Select).build();
        f.options = Some(vec![]);
        assert_eq!(
            validate_schema(&schema(vec![f])),
            Err(SchemaError::MissingOptions("pick".into()))
        );
    }

    #[test]
    fn length_rule_needs_value() {
        let f = FormFieldBuilder::new("name", FieldType::Text)
            .rule(ValidationRule {
                rule_type: ValidationRuleType::MinLength,
                value: None,
            })
            .build();
        assert!(matches!(
            validate_schema(&schema(vec![f])),
            Err(SchemaError::MissingRuleValue { .. })
        ));
    }

    #[test]
    fn unknown_parent_rejected() {
        let f = FormFieldBuilder::new("total", FieldType::Number)
            .derived(DerivedFieldConfig::new(["ghost"], "{ghost}"))
            .build();
        assert_eq!(
            validate_schema(&schema(vec![f])),
            Err(SchemaError::UnknownParent {
                field: "total".into(),
                parent: "ghost".into(),
            })
        );
    }

    #[test]
    fn json_roundtrip_is_structurally_equal() {
        let s = schema(vec![
            FormFieldBuilder::new("dob", FieldType::Date).label("Birthday").build(),
            FormFieldBuilder::new("age", FieldType::Number)
                .label("Age")
                .derived(DerivedFieldConfig::new(["dob"], "AGE_FROM_DOB"))
                .build(),
            FormFieldBuilder::new("email", FieldType::Email)
                .required(true)
                .rule(ValidationRule::is_email())
                .build(),
        ]);
        let json = serde_json::to_string(&s).unwrap();
        let back: FormSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn parses_original_storage_format() {
        let json = r#"{
            "id": "form_1700000000000",
            "name": "Signup",
            "createdAt": "2023-11-14T22:13:20.000Z",
            "fields": [
                {"id": "field_1", "type": "Select", "label": "Plan", "required": false,
                 "options": ["Free", "Pro"], "validationRules": [], "isDerived": false}
            ]
        }"#;
        let s: FormSchema = serde_json::from_str(json).unwrap();
        assert_eq!(s.name, "Signup");
        assert_eq!(s.fields[0].field_type, FieldType::Select);
        assert_eq!(validate_schema(&s), Ok(()));
    }
}
