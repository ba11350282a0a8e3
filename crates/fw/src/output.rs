//! Output helpers for the `fw` CLI.

use std::io::{self, Write};

use formwork_core::schema::FormSchema;
use formwork_core::validation::FormErrors;
use formwork_core::value::{FieldValue, ValueMap};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// One row of `fw list --json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub field_count: usize,
}

impl FormSummary {
    pub fn from_schema(schema: &FormSchema) -> Self {
        Self {
            id: schema.id.clone(),
            name: schema.name.clone(),
            created_at: schema.created_at.to_rfc3339(),
            field_count: schema.fields.len(),
        }
    }
}

/// Print a value as pretty JSON on stdout.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// JSON object of a filled form: values and errors keyed by field id.
pub fn fill_result_json(schema: &FormSchema, values: &ValueMap, errors: &FormErrors) -> Value {
    let mut value_map = Map::new();
    let mut error_map = Map::new();
    for field in &schema.fields {
        let value = values.get(&field.id).cloned().unwrap_or(FieldValue::Empty);
        value_map.insert(field.id.clone(), field_value_json(&value));
        if let Some(message) = errors.get(&field.id) {
            error_map.insert(field.id.clone(), Value::String(message.to_string()));
        }
    }
    json!({
        "id": schema.id,
        "valid": errors.is_valid(),
        "values": value_map,
        "errors": error_map,
    })
}

/// Numbers that JSON cannot represent (NaN, infinities) are emitted as text.
fn field_value_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Number(n) if !n.is_finite() => Value::String(value.to_string()),
        other => serde_json::to_value(other).unwrap_or(Value::Null),
    }
}
