//! Reading and writing single schema files in JSON or TOML.

use std::fs;
use std::path::Path;

use formwork_core::schema::FormSchema;
use tracing::debug;

use crate::error::{Result, StorageError};

/// On-disk encoding of a schema file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Toml,
}

impl SchemaFormat {
    /// Picks the format from a file extension, if it is a known one.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Decodes a schema from JSON text.
pub fn parse_json(text: &str) -> Result<FormSchema> {
    Ok(serde_json::from_str(text)?)
}

/// Decodes a schema from TOML text.
pub fn parse_toml(text: &str) -> Result<FormSchema> {
    Ok(toml::from_str(text)?)
}

/// Loads a schema file, choosing the decoder by extension.
///
/// Files with an unknown extension are tried as JSON, then as TOML.
pub fn load_schema_file(path: impl AsRef<Path>) -> Result<FormSchema> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    debug!(?path, bytes = text.len(), "loading schema file");

    let parsed = match SchemaFormat::from_path(path) {
        Some(SchemaFormat::Json) => parse_json(&text),
        Some(SchemaFormat::Toml) => parse_toml(&text),
        None => parse_json(&text).or_else(|_| parse_toml(&text)),
    };
    parsed.map_err(|e| StorageError::parse(path, e))
}

/// Writes a schema file. `.toml` paths get TOML; anything else gets pretty JSON.
pub fn write_schema_file(path: impl AsRef<Path>, schema: &FormSchema) -> Result<()> {
    let path = path.as_ref();
    let text = match SchemaFormat::from_path(path) {
        Some(SchemaFormat::Toml) => toml::to_string_pretty(schema)?,
        _ => {
            let mut json = serde_json::to_string_pretty(schema)?;
            json.push('\n');
            json
        }
    };
    fs::write(path, text).map_err(|e| StorageError::io(path, e))?;
    debug!(?path, id = %schema.id, "wrote schema file");
    Ok(())
}
