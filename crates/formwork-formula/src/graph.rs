//! Dependency analysis over derived fields.

use std::collections::{HashMap, HashSet};

use formwork_core::field::DerivedFieldConfig;
use formwork_core::schema::FormSchema;

use crate::types::FormulaError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Orders derived field ids so that every derived parent precedes its children.
///
/// Ties keep schema order. Parents that are not derived are leaves and do not
/// appear in the result.
pub fn dependency_order(schema: &FormSchema) -> Result<Vec<String>, FormulaError> {
    let edges: HashMap<&str, &[String]> = schema
        .derived_fields()
        .filter_map(|f| f.derivation().map(|c| (f.id.as_str(), c.parent_field_ids.as_slice())))
        .collect();

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut order = Vec::with_capacity(edges.len());
    let mut path: Vec<&str> = Vec::new();

    for field in schema.derived_fields() {
        visit(&field.id, &edges, &mut marks, &mut path, &mut order)?;
    }
    Ok(order)
}

fn visit<'a>(
    id: &'a str,
    edges: &HashMap<&'a str, &'a [String]>,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
    order: &mut Vec<String>,
) -> Result<(), FormulaError> {
    match marks.get(id) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|p| *p == id).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(id.to_string());
            return Err(FormulaError::CycleDetected(cycle));
        }
        None => {}
    }
    let Some(&parents) = edges.get(id) else {
        return Ok(());
    };

    marks.insert(id, Mark::Visiting);
    path.push(id);
    for parent in parents {
        visit(parent, edges, marks, path, order)?;
    }
    path.pop();
    marks.insert(id, Mark::Done);
    order.push(id.to_string());
    Ok(())
}

/// Fails with [`FormulaError::CycleDetected`] if derived fields reference each other in a loop.
pub fn detect_cycle(schema: &FormSchema) -> Result<(), FormulaError> {
    dependency_order(schema).map(|_| ())
}

/// Returns the distinct `{name}` placeholders in a formula, in order of first appearance.
pub fn extract_placeholders(formula: &str) -> Vec<String> {
    let bytes = formula.as_bytes();
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && is_placeholder_byte(bytes[end]) {
                end += 1;
            }
            if end > start && end < bytes.len() && bytes[end] == b'}' {
                let name = &formula[start..end];
                if seen.insert(name) {
                    names.push(name.to_string());
                }
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    names
}

/// Placeholders a formula uses without declaring them as parents.
pub fn undeclared_placeholders(config: &DerivedFieldConfig) -> Vec<String> {
    extract_placeholders(&config.formula)
        .into_iter()
        .filter(|name| !config.parent_field_ids.iter().any(|p| p == name))
        .collect()
}

fn is_placeholder_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}
