//! `fw rename` -- rename a form.

use anyhow::{Result, bail};
use formwork_core::editor::SchemaEditor;

use crate::cli::RenameArgs;
use crate::commands::{ensure_saved_form, load_form, save_checked};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `fw rename` command.
pub fn run(ctx: &RuntimeContext, args: &RenameArgs) -> Result<()> {
    ensure_saved_form(&args.id)?;
    if args.name.trim().is_empty() {
        bail!("form name cannot be empty");
    }

    let store = ctx.open_store()?;
    let mut editor = SchemaEditor::from_schema(load_form(&store, &args.id)?);
    editor.rename(args.name.clone());
    let schema = editor.into_schema();
    save_checked(ctx, &store, &schema)?;

    if ctx.json {
        output_json(&schema);
    } else if !ctx.quiet {
        println!("Renamed form {} to {}", schema.id, schema.name);
    }
    Ok(())
}
