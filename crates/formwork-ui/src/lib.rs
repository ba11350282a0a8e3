//! Terminal rendering for formwork.
//!
//! Ayu-themed styling, terminal detection, and text layouts for schemas and
//! filled-in forms.

pub mod render;
pub mod styles;
pub mod terminal;
