//! `fw show` -- show a form's fields.

use anyhow::Result;
use formwork_ui::render::render_schema;

use crate::cli::FormRef;
use crate::commands::load_form;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `fw show` command.
pub fn run(ctx: &RuntimeContext, args: &FormRef) -> Result<()> {
    let store = ctx.open_store()?;
    let schema = load_form(&store, &args.id)?;

    if ctx.json {
        output_json(&schema);
    } else {
        println!("{}", render_schema(&schema));
    }
    Ok(())
}
