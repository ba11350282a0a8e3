//! `fw delete` -- delete saved forms.

use anyhow::{Context, Result, bail};
use formwork_storage::SchemaStore;
use serde_json::json;

use crate::cli::DeleteArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `fw delete` command.
pub fn run(ctx: &RuntimeContext, args: &DeleteArgs) -> Result<()> {
    let store = ctx.open_store()?;

    let mut deleted: Vec<&str> = Vec::new();
    for id in &args.ids {
        if store
            .delete_form(id)
            .with_context(|| format!("failed to delete form {id}"))?
        {
            deleted.push(id);
        } else {
            eprintln!("Form {} not found", id);
        }
    }

    if deleted.is_empty() {
        bail!("no forms deleted");
    }

    if ctx.json {
        output_json(&json!({ "deleted": deleted }));
    } else if !ctx.quiet {
        for id in &deleted {
            println!("Deleted form {}", id);
        }
    }
    Ok(())
}
