//! Runtime field values and the per-session value map.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::FieldType;
use crate::schema::FormSchema;

/// Mapping from field id to its current value for one fill session.
pub type ValueMap = HashMap<String, FieldValue>;

/// The current value of a single field.
///
/// Serializes as plain JSON: `null`, a string, a number or a boolean.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value at all.
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Builds a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns `true` if the field holds a usable value.
    ///
    /// Empty values, empty strings and unchecked checkboxes are absent.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Text(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::Number(_) => true,
        }
    }

    /// Returns `true` if the string form is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty | Self::Bool(false) => true,
            _ => self.as_text().trim().is_empty(),
        }
    }

    /// Returns the string form used by length and pattern checks.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
        }
    }

    /// Interprets the value as a finite number.
    ///
    /// Text is trimmed and must parse as a whole, so `"12px"` is not a
    /// number. Booleans, empty values and anything non-finite yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Empty | Self::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Returns the text if this is a non-empty string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            // NaN must equal itself or derived recomputation never settles.
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Formats a number the way it is substituted into formulas and shown to users.
///
/// Whole numbers carry no fractional part (`11`, not `11.0`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        // Avoid printing "-0".
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Builds the initial value map for a new fill session.
///
/// Every field starts from its default value (or the empty string);
/// checkboxes are seeded as booleans, checked only when the default is `"true"`.
pub fn seed_values(schema: &FormSchema) -> ValueMap {
    schema
        .fields
        .iter()
        .map(|field| {
            let value = if field.field_type == FieldType::Checkbox {
                FieldValue::Bool(field.default_value.as_deref() == Some("true"))
            } else {
                FieldValue::Text(field.default_value.clone().unwrap_or_default())
            };
            (field.id.clone(), value)
        })
        .collect()
}

/// Coerces raw user input into a value appropriate for the field type.
///
/// Checkboxes accept `true/false/yes/no/on/off/1/0`; anything else is kept
/// as text.
pub fn coerce_input(field_type: FieldType, raw: &str) -> FieldValue {
    if field_type.is_boolean() {
        let checked = matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "on" | "1"
        );
        return FieldValue::Bool(checked);
    }
    FieldValue::Text(raw.to_owned())
}
