//! `fw preview` -- store a copy of a form as the current preview.

use anyhow::{Context, Result};
use formwork_storage::SchemaStore;

use crate::cli::FormRef;
use crate::commands::{ensure_saved_form, load_form};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `fw preview` command.
pub fn run(ctx: &RuntimeContext, args: &FormRef) -> Result<()> {
    ensure_saved_form(&args.id)?;
    let store = ctx.open_store()?;
    let schema = load_form(&store, &args.id)?;
    store
        .save_preview(&schema)
        .context("failed to store preview")?;

    if ctx.json {
        output_json(&schema);
    } else if !ctx.quiet {
        println!("Previewing form {}: {}", schema.id, schema.name);
        println!("Run `fw fill current` to fill it in.");
    }
    Ok(())
}
