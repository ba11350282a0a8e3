//! `fw fill` -- fill in a form from the command line.
//!
//! Seeds every field from its default, applies `--set` values, recomputes
//! derived fields until they settle, then validates the result. Exits with
//! an error when any field fails validation.

use anyhow::{Context, Result, bail};
use chrono::Local;
use formwork_core::schema::FormSchema;
use formwork_core::validation::validate_form;
use formwork_core::value::{ValueMap, coerce_input, seed_values};
use formwork_formula::engine::parse_date;
use formwork_formula::recompute_to_fixed_point;
use formwork_ui::render::render_filled_field;
use formwork_ui::styles::{ICON_FAIL, ICON_PASS, render_fail, render_pass};
use tracing::debug;

use crate::cli::FillArgs;
use crate::commands::load_form;
use crate::context::RuntimeContext;
use crate::output::{fill_result_json, output_json};

/// Execute the `fw fill` command.
pub fn run(ctx: &RuntimeContext, args: &FillArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let schema = load_form(&store, &args.id)?;

    let today = match &args.today {
        Some(s) => parse_date(s).with_context(|| format!("invalid --today date: {s}"))?,
        None => Local::now().date_naive(),
    };

    let mut values = seed_values(&schema);
    apply_assignments(&schema, &mut values, &args.set)?;

    let max_passes = ctx.max_passes(&schema);
    let (values, passes) = recompute_to_fixed_point(&schema, &values, today, max_passes)
        .with_context(|| format!("derived fields of form {} did not settle", schema.id))?;
    debug!(passes, "derived fields settled");

    let errors = validate_form(&schema, &values);

    if ctx.json {
        output_json(&fill_result_json(&schema, &values, &errors));
    } else {
        for field in &schema.fields {
            let value = values.get(&field.id).cloned().unwrap_or_default();
            println!("{}", render_filled_field(field, &value, errors.get(&field.id)));
        }
        if errors.is_valid() && !ctx.quiet {
            println!();
            println!("{} all fields valid", render_pass(ICON_PASS));
        } else if !errors.is_valid() && !ctx.quiet {
            println!();
            println!(
                "{} {} field(s) failed validation",
                render_fail(ICON_FAIL),
                errors.error_count()
            );
        }
    }

    if !errors.is_valid() {
        bail!("{} field(s) failed validation", errors.error_count());
    }
    Ok(())
}

/// Parses `field=value` pairs and stores them, coerced to each field's type.
fn apply_assignments(schema: &FormSchema, values: &mut ValueMap, pairs: &[String]) -> Result<()> {
    for pair in pairs {
        let Some((id, raw)) = pair.split_once('=') else {
            bail!("expected FIELD=VALUE, got '{pair}'");
        };
        let id = id.trim();
        let field = schema
            .field(id)
            .with_context(|| format!("form {} has no field {id}", schema.id))?;
        if field.derivation().is_some() {
            bail!("field {id} is derived and cannot be set");
        }
        values.insert(field.id.clone(), coerce_input(field.field_type, raw));
    }
    Ok(())
}
