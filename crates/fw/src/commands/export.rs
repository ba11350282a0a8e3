//! `fw export` and `fw export-all` -- write forms out as files.

use std::fs::File;
use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use formwork_core::jsonl::write_jsonl;
use formwork_storage::{SchemaStore, write_schema_file};

use crate::cli::{ExportAllArgs, ExportArgs};
use crate::commands::load_form;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `fw export` command.
pub fn run(ctx: &RuntimeContext, args: &ExportArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let schema = load_form(&store, &args.id)?;

    match &args.output {
        Some(path) => {
            write_schema_file(path, &schema)?;
            if !ctx.quiet {
                eprintln!("Exported form {} to {}", schema.id, path.display());
            }
        }
        None => output_json(&schema),
    }
    Ok(())
}

/// Execute the `fw export-all` command.
pub fn run_all(ctx: &RuntimeContext, args: &ExportAllArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let forms = store.all_forms().context("failed to read forms")?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_jsonl(&mut BufWriter::new(file), &forms)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !ctx.quiet {
                eprintln!("Exported {} form(s) to {}", forms.len(), path.display());
            }
        }
        None => {
            let stdout = io::stdout();
            write_jsonl(&mut stdout.lock(), &forms).context("failed to write forms")?;
        }
    }
    Ok(())
}
