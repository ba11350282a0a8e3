//! Field definitions: the per-field part of a form schema.

use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{FieldType, ValidationRuleType};

/// Formula token that computes an age in whole years from a date of birth.
pub const AGE_FROM_DOB: &str = "AGE_FROM_DOB";

/// Options given to a freshly added select or radio field.
pub const DEFAULT_OPTIONS: [&str; 2] = ["Option 1", "Option 2"];

/// One validation check with its optional numeric argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub rule_type: ValidationRuleType,

    /// Length bound for `min_length` / `max_length`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_rule_value"
    )]
    pub value: Option<u32>,
}

impl ValidationRule {
    pub fn not_empty() -> Self {
        Self {
            rule_type: ValidationRuleType::NotEmpty,
            value: None,
        }
    }

    pub fn min_length(n: u32) -> Self {
        Self {
            rule_type: ValidationRuleType::MinLength,
            value: Some(n),
        }
    }

    pub fn max_length(n: u32) -> Self {
        Self {
            rule_type: ValidationRuleType::MaxLength,
            value: Some(n),
        }
    }

    pub fn is_email() -> Self {
        Self {
            rule_type: ValidationRuleType::IsEmail,
            value: None,
        }
    }

    pub fn custom_password() -> Self {
        Self {
            rule_type: ValidationRuleType::CustomPassword,
            value: None,
        }
    }
}

/// Accepts the rule value as a JSON number or a numeric string.
fn deserialize_rule_value<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Float(f64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Float(f)) if f.is_finite() && f >= 0.0 => Ok(Some(f as u32)),
        Some(Raw::Float(f)) => Err(serde::de::Error::custom(format!(
            "invalid rule value: {f}"
        ))),
        Some(Raw::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Str(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid rule value: '{s}'"))),
    }
}

/// How a derived field computes its value from other fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFieldConfig {
    /// Fields the formula reads, in declaration order.
    #[serde(default)]
    pub parent_field_ids: Vec<String>,

    /// `AGE_FROM_DOB` or an arithmetic expression using `{field_id}` placeholders.
    #[serde(default)]
    pub formula: String,
}

impl DerivedFieldConfig {
    pub fn new(parents: impl IntoIterator<Item = impl Into<String>>, formula: impl Into<String>) -> Self {
        Self {
            parent_field_ids: parents.into_iter().map(Into::into).collect(),
            formula: formula.into(),
        }
    }

    /// Returns `true` if this is the date-of-birth age formula.
    pub fn is_age_formula(&self) -> bool {
        self.formula == AGE_FROM_DOB
    }
}

/// A single input in a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Unique within the owning schema.
    pub id: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    pub label: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Choices for select and radio fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,

    #[serde(default)]
    pub is_derived: bool,

    /// Present iff `is_derived`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_config: Option<DerivedFieldConfig>,
}

impl FormField {
    /// Builds the field that the editor appends for a given type.
    pub fn new_of_type(id: impl Into<String>, field_type: FieldType) -> Self {
        let options = field_type
            .has_options()
            .then(|| DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect());
        Self {
            id: id.into(),
            field_type,
            label: format!("New {} Field", field_type.display_name()),
            required: false,
            default_value: None,
            placeholder: None,
            options,
            validation_rules: Vec::new(),
            is_derived: false,
            derived_config: None,
        }
    }

    /// Returns the derived config only when the field is actually derived.
    pub fn derivation(&self) -> Option<&DerivedFieldConfig> {
        if self.is_derived {
            self.derived_config.as_ref()
        } else {
            None
        }
    }

    /// Marks the field as derived (`Some`) or plain (`None`), keeping
    /// `is_derived` and `derived_config` in step.
    pub fn set_derivation(&mut self, config: Option<DerivedFieldConfig>) {
        self.is_derived = config.is_some();
        self.derived_config = config;
    }
}

/// Builder for [`FormField`], mostly useful in tests and tooling.
#[derive(Debug, Clone)]
pub struct FormFieldBuilder {
    field: FormField,
}

impl FormFieldBuilder {
    /// Starts a plain, optional field with an empty label.
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        let mut field = FormField::new_of_type(id, field_type);
        field.label = String::new();
        Self { field }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.field.label = label.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.field.required = required;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.field.default_value = Some(value.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.field.placeholder = Some(placeholder.into());
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.field.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.field.validation_rules.push(rule);
        self
    }

    pub fn derived(mut self, config: DerivedFieldConfig) -> Self {
        self.field.set_derivation(Some(config));
        self
    }

    pub fn build(self) -> FormField {
        self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_select_gets_default_options() {
        let f = FormField::new_of_type("field_1", FieldType::Select);
        assert_eq!(f.label, "New Select Field");
        assert_eq!(
            f.options,
            Some(vec!["Option 1".to_string(), "Option 2".to_string()])
        );
        assert!(!f.required);
        assert!(!f.is_derived);
    }

    #[test]
    fn new_text_has_no_options() {
        let f = FormField::new_of_type("field_1", FieldType::Text);
        assert_eq!(f.label, "New Text Field");
        assert!(f.options.is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let f = FormFieldBuilder::new("total", FieldType::Number)
            .label("Total")
            .derived(DerivedFieldConfig::new(["a", "b"], "{a} + {b}"))
            .build();
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["isDerived"], true);
        assert_eq!(json["derivedConfig"]["parentFieldIds"][1], "b");
        assert_eq!(json["validationRules"], serde_json::json!([]));
        assert!(json.get("options").is_none());
    }

    #[test]
    fn parses_legacy_field() {
        let json = r#"{
            "id": "field_1700000000000",
            "type": "Password",
            "label": "Password",
            "required": true,
            "validationRules": [
                {"type": "Minimum Length", "value": "8"},
                {"type": "Password Strength"}
            ],
            "isDerived": false
        }"#;
        let f: FormField = serde_json::from_str(json).unwrap();
        assert_eq!(f.field_type, FieldType::Password);
        assert_eq!(f.validation_rules[0], ValidationRule::min_length(8));
        assert_eq!(f.validation_rules[1], ValidationRule::custom_password());
    }

    #[test]
    fn rule_value_accepts_numbers() {
        let r: ValidationRule =
            serde_json::from_str(r#"{"type": "max_length", "value": 100}"#).unwrap();
        assert_eq!(r.value, Some(100));
        let bad = serde_json::from_str::<ValidationRule>(r#"{"type": "max_length", "value": "lots"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn derivation_requires_flag() {
        let mut f = FormFieldBuilder::new("x", FieldType::Number).build();
        f.derived_config = Some(DerivedFieldConfig::new(["a"], "{a}"));
        assert!(f.derivation().is_none());
        f.set_derivation(None);
        assert!(f.derived_config.is_none());
    }
}
