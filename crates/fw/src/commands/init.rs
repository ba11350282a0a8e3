//! `fw init` -- initialize a formwork project in the current directory.

use std::env;
use std::fs;

use anyhow::{Context, Result, bail};
use formwork_config::formwork_dir::DEFAULT_DB_NAME;
use formwork_config::{ensure_formwork_dir, save_config};
use formwork_storage::SqliteStore;
use serde_json::json;

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

const GITIGNORE_CONTENT: &str = r#"# formwork database files
*.db
*.db-journal
*.db-wal
*.db-shm
"#;

/// Execute the `fw init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    let formwork_dir = cwd.join(formwork_config::formwork_dir::FORMWORK_DIR_NAME);
    let db_path = formwork_dir.join(DEFAULT_DB_NAME);

    if !args.force && db_path.exists() {
        bail!(
            "Found existing database in {}\n\n\
            This directory is already initialized.\n\
            Use --force to re-initialize (saved forms are kept).",
            formwork_dir.display()
        );
    }

    let formwork_dir = ensure_formwork_dir(&cwd)
        .with_context(|| format!("failed to create directory: {}", formwork_dir.display()))?;

    let gitignore_path = formwork_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(&gitignore_path, GITIGNORE_CONTENT).with_context(|| {
            format!("failed to create .gitignore: {}", gitignore_path.display())
        })?;
    }

    let config_path = formwork_dir.join(formwork_config::config::CONFIG_FILE_NAME);
    if !config_path.exists() {
        save_config(&formwork_dir, &ctx.config)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
    }

    SqliteStore::open(&db_path)
        .with_context(|| format!("failed to create database: {}", db_path.display()))?;

    if ctx.json {
        output_json(&json!({
            "directory": formwork_dir.display().to_string(),
            "database": db_path.display().to_string(),
        }));
    } else if !ctx.quiet {
        println!("fw initialized successfully!");
        println!();
        println!("  Database: {}", db_path.display());
        println!("  Config:   {}", config_path.display());
        println!();
        println!("Run `fw create --name \"My form\"` to get started.");
    }

    Ok(())
}
