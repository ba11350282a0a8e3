//! `fw list` -- list saved forms.

use anyhow::{Context, Result};
use formwork_storage::SchemaStore;
use formwork_ui::render::render_schema_line;

use crate::context::RuntimeContext;
use crate::output::{FormSummary, output_json};

/// Execute the `fw list` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let store = ctx.open_store()?;
    let forms = store.all_forms().context("failed to read forms")?;

    if ctx.json {
        let rows: Vec<FormSummary> = forms.iter().map(FormSummary::from_schema).collect();
        output_json(&rows);
        return Ok(());
    }

    if forms.is_empty() {
        if !ctx.quiet {
            println!("No forms found.");
        }
        return Ok(());
    }
    for form in &forms {
        println!("{}", render_schema_line(form));
    }
    Ok(())
}
