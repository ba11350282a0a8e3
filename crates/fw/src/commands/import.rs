//! `fw import` -- import forms from JSON, TOML or JSONL files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use formwork_core::jsonl::read_jsonl;
use formwork_core::schema::FormSchema;
use formwork_storage::load_schema_file;
use serde_json::json;
use tracing::info;

use crate::cli::ImportArgs;
use crate::commands::{check_schema, save_checked};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `fw import` command.
///
/// Every schema is checked before any is saved, so a bad file imports nothing.
pub fn run(ctx: &RuntimeContext, args: &ImportArgs) -> Result<()> {
    let schemas = read_schemas(&args.file)?;
    let store = ctx.open_store()?;

    for schema in &schemas {
        check_schema(ctx, schema)?;
    }
    for schema in &schemas {
        save_checked(ctx, &store, schema)?;
    }
    info!(count = schemas.len(), file = %args.file.display(), "imported forms");

    let ids: Vec<&str> = schemas.iter().map(|s| s.id.as_str()).collect();
    if ctx.json {
        output_json(&json!({ "imported": ids }));
    } else if !ctx.quiet {
        println!("Imported {} form(s) from {}", ids.len(), args.file.display());
        for id in ids {
            println!("  {id}");
        }
    }
    Ok(())
}

fn read_schemas(path: &Path) -> Result<Vec<FormSchema>> {
    let is_jsonl = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jsonl"));

    if !is_jsonl {
        let schema = load_schema_file(path)?;
        return Ok(vec![schema]);
    }

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_jsonl(BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to read {}", path.display()))
}
