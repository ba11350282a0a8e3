//! Form schema model and field validation for formwork.
//!
//! A [`FormSchema`](schema::FormSchema) is pure data: an ordered list of
//! [`FormField`](field::FormField)s with their validation rules and optional
//! derived-value formulas. Runtime values live in a caller-owned
//! [`ValueMap`](value::ValueMap); nothing here keeps state between calls.

pub mod editor;
pub mod enums;
pub mod field;
pub mod idgen;
pub mod jsonl;
pub mod schema;
pub mod validation;
pub mod value;

pub use editor::SchemaEditor;
pub use enums::{FieldType, ValidationRuleType};
pub use field::{DerivedFieldConfig, FormField, FormFieldBuilder, ValidationRule};
pub use schema::{FormSchema, SchemaError, validate_schema};
pub use validation::{FormErrors, RuleViolation, validate, validate_form};
pub use value::{FieldValue, ValueMap};
