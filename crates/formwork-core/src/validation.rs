//! Field validation rules.
//!
//! Rules run in the order given and stop at the first failure. Length and
//! content rules only look at values that are present; an absent value can
//! only fail `not_empty`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::enums::ValidationRuleType;
use crate::field::{FormField, ValidationRule};
use crate::schema::FormSchema;
use crate::value::{FieldValue, ValueMap};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Minimum password length for the `custom_password` rule.
pub const PASSWORD_MIN_LEN: usize = 8;

/// A failed validation rule. The `Display` text is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("This field is required.")]
    Required,

    #[error("Must be at least {0} characters.")]
    TooShort(u32),

    #[error("Must be no more than {0} characters.")]
    TooLong(u32),

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Password must be at least 8 characters and include a number.")]
    WeakPassword,
}

/// Checks a value against rules in order, failing on the first broken rule.
pub fn check(value: &FieldValue, rules: &[ValidationRule]) -> Result<(), RuleViolation> {
    for rule in rules {
        check_rule(value, rule)?;
    }
    Ok(())
}

/// Returns the message of the first failing rule, or `None` if all pass.
pub fn validate(value: &FieldValue, rules: &[ValidationRule]) -> Option<String> {
    check(value, rules).err().map(|v| v.to_string())
}

fn check_rule(value: &FieldValue, rule: &ValidationRule) -> Result<(), RuleViolation> {
    if rule.rule_type == ValidationRuleType::NotEmpty {
        if value.is_blank() {
            return Err(RuleViolation::Required);
        }
        return Ok(());
    }

    if !value.is_present() {
        return Ok(());
    }
    let text = value.as_text();

    match rule.rule_type {
        ValidationRuleType::NotEmpty => Ok(()),
        ValidationRuleType::MinLength => match rule.value {
            Some(min) if char_len(&text) < min as usize => Err(RuleViolation::TooShort(min)),
            _ => Ok(()),
        },
        ValidationRuleType::MaxLength => match rule.value {
            Some(max) if char_len(&text) > max as usize => Err(RuleViolation::TooLong(max)),
            _ => Ok(()),
        },
        ValidationRuleType::IsEmail => {
            if is_email(&text) {
                Ok(())
            } else {
                Err(RuleViolation::InvalidEmail)
            }
        }
        ValidationRuleType::CustomPassword => {
            if is_strong_password(&text) {
                Ok(())
            } else {
                Err(RuleViolation::WeakPassword)
            }
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Returns `true` for `local@domain.tld`-shaped addresses.
pub fn is_email(s: &str) -> bool {
    EMAIL_PATTERN.is_match(s)
}

/// Returns `true` if the password has at least 8 characters, a letter and a digit.
pub fn is_strong_password(s: &str) -> bool {
    char_len(s) >= PASSWORD_MIN_LEN
        && s.chars().any(|c| c.is_ascii_alphabetic())
        && s.chars().any(|c| c.is_ascii_digit())
}

/// The rules applied to a field during a fill session.
///
/// Required fields get an implicit `not_empty` checked before their own rules.
pub fn effective_rules(field: &FormField) -> Vec<ValidationRule> {
    let mut rules = Vec::with_capacity(field.validation_rules.len() + 1);
    if field.required {
        rules.push(ValidationRule::not_empty());
    }
    rules.extend(field.validation_rules.iter().cloned());
    rules
}

/// Validates one field's current value from the session map.
pub fn validate_field(field: &FormField, values: &ValueMap) -> Option<String> {
    let value = values.get(&field.id).cloned().unwrap_or_default();
    validate(&value, &effective_rules(field))
}

/// Per-field validation results for a whole form, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    entries: Vec<(String, Option<String>)>,
}

impl FormErrors {
    /// Returns the error for a field, if it failed.
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == field_id)
            .and_then(|(_, err)| err.as_deref())
    }

    /// Iterates over `(field_id, error)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(id, err)| (id.as_str(), err.as_deref()))
    }

    /// Iterates over failing fields only.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(id, err)| err.as_deref().map(|e| (id.as_str(), e)))
    }

    pub fn error_count(&self) -> usize {
        self.failures().count()
    }

    /// Returns `true` when no field failed.
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }
}

/// Validates every field of a schema, as on submit.
pub fn validate_form(schema: &FormSchema, values: &ValueMap) -> FormErrors {
    let entries = schema
        .fields
        .iter()
        .map(|field| (field.id.clone(), validate_field(field, values)))
        .collect();
    FormErrors { entries }
}
