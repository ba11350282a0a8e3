//! Command handlers, one module per subcommand.

pub mod check;
pub mod completion;
pub mod create;
pub mod delete;
pub mod export;
pub mod field;
pub mod fill;
pub mod import;
pub mod init;
pub mod list;
pub mod preview;
pub mod rename;
pub mod show;

use anyhow::{Context, Result, bail};
use formwork_core::schema::{FormSchema, validate_schema};
use formwork_formula::{detect_cycle, undeclared_placeholders};
use formwork_storage::{SchemaStore, SqliteStore};
use tracing::debug;

use crate::context::RuntimeContext;

/// Form reference that names the preview copy instead of a saved form.
pub const CURRENT_PREVIEW: &str = "current";

/// Loads a saved form by id, or the preview for `current`.
pub fn load_form(store: &SqliteStore, id: &str) -> Result<FormSchema> {
    if id == CURRENT_PREVIEW {
        return store
            .get_preview()
            .context("failed to read preview")?
            .context("no form is being previewed. Run 'fw preview <id>' first.");
    }
    store
        .get_form(id)
        .with_context(|| format!("failed to read form {id}"))?
        .with_context(|| format!("form not found: {id}"))
}

/// Checks a schema's structure, including cycles among derived fields when
/// `engine.reject-cycles` is on.
pub fn check_schema(ctx: &RuntimeContext, schema: &FormSchema) -> Result<()> {
    validate_schema(schema).with_context(|| format!("form {} is invalid", schema.id))?;
    if ctx.config.engine.reject_cycles {
        detect_cycle(schema).with_context(|| format!("form {} is invalid", schema.id))?;
    }
    Ok(())
}

/// Warnings that do not block saving: formulas referencing undeclared fields.
pub fn schema_warnings(schema: &FormSchema) -> Vec<String> {
    schema
        .derived_fields()
        .filter_map(|field| {
            let config = field.derivation()?;
            let missing = undeclared_placeholders(config);
            (!missing.is_empty()).then(|| {
                format!(
                    "field {} uses undeclared placeholder(s): {}",
                    field.id,
                    missing.join(", ")
                )
            })
        })
        .collect()
}

/// Validates, then upserts a schema. Warnings go to stderr unless quiet.
pub fn save_checked(ctx: &RuntimeContext, store: &SqliteStore, schema: &FormSchema) -> Result<()> {
    check_schema(ctx, schema)?;
    if !ctx.quiet {
        for warning in schema_warnings(schema) {
            eprintln!("Warning: {warning}");
        }
    }
    debug!(id = %schema.id, fields = schema.fields.len(), "saving form");
    store
        .save_form(schema)
        .with_context(|| format!("failed to save form {}", schema.id))
}

/// Refuses write operations on the preview copy.
pub fn ensure_saved_form(id: &str) -> Result<()> {
    if id == CURRENT_PREVIEW {
        bail!("the preview is read-only; edit the saved form and run 'fw preview' again");
    }
    Ok(())
}
