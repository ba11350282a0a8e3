//! Derived-field engine for formwork.
//!
//! A derived field's value is computed from its parent fields, either by the
//! `AGE_FROM_DOB` rule or by an arithmetic formula with `{fieldId}`
//! placeholders. Formulas are whitelisted and parsed by a small recursive
//! descent parser; nothing is ever handed to a general-purpose evaluator.

pub mod engine;
pub mod graph;
pub mod parser;
pub mod types;

pub use engine::{
    ERROR_SENTINEL, default_max_passes, evaluate_derived, evaluate_derived_at,
    recompute_derived_fields, recompute_derived_fields_at, recompute_to_fixed_point,
};
pub use graph::{dependency_order, detect_cycle, extract_placeholders, undeclared_placeholders};
pub use types::FormulaError;
