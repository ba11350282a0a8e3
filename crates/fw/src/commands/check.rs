//! `fw check` -- check a form's structure.

use anyhow::{Result, bail};
use formwork_core::schema::validate_schema;
use formwork_formula::{dependency_order, detect_cycle};
use formwork_ui::styles::{ICON_FAIL, ICON_PASS, ICON_WARN, render_fail, render_pass, render_warn};
use serde_json::json;

use crate::cli::FormRef;
use crate::commands::{load_form, schema_warnings};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `fw check` command.
///
/// Problems fail the command; warnings are reported but do not.
pub fn run(ctx: &RuntimeContext, args: &FormRef) -> Result<()> {
    let store = ctx.open_store()?;
    let schema = load_form(&store, &args.id)?;

    let mut problems = Vec::new();
    if let Err(e) = validate_schema(&schema) {
        problems.push(e.to_string());
    }
    if let Err(e) = detect_cycle(&schema) {
        problems.push(e.to_string());
    }
    let warnings = schema_warnings(&schema);
    let order = dependency_order(&schema).unwrap_or_default();

    if ctx.json {
        output_json(&json!({
            "id": schema.id,
            "ok": problems.is_empty(),
            "problems": problems,
            "warnings": warnings,
            "derivedOrder": order,
        }));
    } else {
        for problem in &problems {
            println!("{} {}", render_fail(ICON_FAIL), problem);
        }
        for warning in &warnings {
            println!("{} {}", render_warn(ICON_WARN), warning);
        }
        if problems.is_empty() && !ctx.quiet {
            println!(
                "{} form {} is valid ({} field(s), {} derived)",
                render_pass(ICON_PASS),
                schema.id,
                schema.fields.len(),
                order.len()
            );
        }
    }

    if !problems.is_empty() {
        bail!("form {} has {} problem(s)", schema.id, problems.len());
    }
    Ok(())
}
