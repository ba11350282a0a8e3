//! Enum types for form schemas.
//!
//! Each enum has:
//! - Serialize as its canonical snake_case string
//! - Deserialize from the canonical string or the legacy display name
//! - `as_str()`, `display_name()`, `ALL`, `Display` and `FromStr` impls

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

// ---------------------------------------------------------------------------
// Macro: defines a closed enum with a canonical string and a display name.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, kind = $kind:literal,
        variants: [
            $( ($variant:ident, $str:literal, $display:literal) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( Self::$variant, )+ ];

            /// Returns the canonical (serialized) string.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $str, )+
                }
            }

            /// Returns the human-readable name.
            pub fn display_name(&self) -> &'static str {
                match self {
                    $( Self::$variant => $display, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $str | $display => Ok(Self::$variant), )+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

define_enum! {
    /// The kind of input a field collects.
    FieldType, kind = "field type",
    variants: [
        (Text, "text", "Text"),
        (Email, "email", "Email"),
        (Password, "password", "Password"),
        (Number, "number", "Number"),
        (Textarea, "textarea", "Textarea"),
        (Select, "select", "Select"),
        (Radio, "radio", "Radio"),
        (Checkbox, "checkbox", "Checkbox"),
        (Date, "date", "Date"),
    ]
}

impl FieldType {
    /// Returns `true` for types that pick from a fixed list of options.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }

    /// Returns `true` for types whose values are booleans.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Checkbox)
    }
}

define_enum! {
    /// A single validation check that can be attached to a field.
    ValidationRuleType, kind = "validation rule",
    variants: [
        (NotEmpty, "not_empty", "Not Empty"),
        (MinLength, "min_length", "Minimum Length"),
        (MaxLength, "max_length", "Maximum Length"),
        (IsEmail, "is_email", "Email Format"),
        (CustomPassword, "custom_password", "Password Strength"),
    ]
}

impl ValidationRuleType {
    /// Returns `true` if the rule needs a numeric `value` to be meaningful.
    pub fn takes_value(&self) -> bool {
        matches!(self, Self::MinLength | Self::MaxLength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_type_serializes_canonical() {
        let json = serde_json::to_string(&FieldType::Textarea).unwrap();
        assert_eq!(json, "\"textarea\"");
    }

    #[test]
    fn field_type_accepts_display_name() {
        let t: FieldType = serde_json::from_str("\"Checkbox\"").unwrap();
        assert_eq!(t, FieldType::Checkbox);
        let t: FieldType = serde_json::from_str("\"checkbox\"").unwrap();
        assert_eq!(t, FieldType::Checkbox);
    }

    #[test]
    fn unknown_field_type_rejected() {
        let err = "slider".parse::<FieldType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown field type: 'slider'");
        assert!(serde_json::from_str::<FieldType>("\"slider\"").is_err());
    }

    #[test]
    fn rule_type_legacy_names() {
        assert_eq!(
            "Minimum Length".parse::<ValidationRuleType>().unwrap(),
            ValidationRuleType::MinLength
        );
        assert_eq!(
            "Password Strength".parse::<ValidationRuleType>().unwrap(),
            ValidationRuleType::CustomPassword
        );
    }

    #[test]
    fn all_lists_every_variant() {
        assert_eq!(FieldType::ALL.len(), 9);
        assert_eq!(ValidationRuleType::ALL.len(), 5);
        assert!(FieldType::Select.has_options());
        assert!(!FieldType::Text.has_options());
        assert!(ValidationRuleType::MaxLength.takes_value());
    }
}
