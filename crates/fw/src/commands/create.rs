//! `fw create` -- create a new, empty form.

use anyhow::Result;
use formwork_core::editor::SchemaEditor;

use crate::cli::CreateArgs;
use crate::commands::save_checked;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `fw create` command.
pub fn run(ctx: &RuntimeContext, args: &CreateArgs) -> Result<()> {
    let store = ctx.open_store()?;

    let mut editor = SchemaEditor::new();
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| ctx.config.editor.default_form_name.clone());
    editor.rename(name);

    let schema = editor.into_schema();
    save_checked(ctx, &store, &schema)?;

    if ctx.json {
        output_json(&schema);
    } else if ctx.quiet {
        println!("{}", schema.id);
    } else {
        println!("Created form {}: {}", schema.id, schema.name);
    }
    Ok(())
}
