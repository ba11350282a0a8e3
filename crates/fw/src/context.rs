//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds everything a command handler needs: global
//! flags, the discovered `.formwork/` directory and the loaded configuration.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use formwork_config::{FormworkConfig, find_formwork_dir, load_config, resolve_db_path};
use formwork_core::schema::FormSchema;
use formwork_formula::default_max_passes;
use formwork_storage::SqliteStore;
use tracing::debug;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Explicit `--db` path, if given.
    pub db_override: Option<PathBuf>,

    /// The `.formwork/` directory found from the working directory.
    pub formwork_dir: Option<PathBuf>,

    /// Merged file and environment configuration.
    pub config: FormworkConfig,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// A broken `config.yaml` is an error; a missing one means defaults.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let cwd = env::current_dir().context("failed to get current directory")?;
        let formwork_dir = find_formwork_dir(&cwd);

        let config = match &formwork_dir {
            Some(dir) => load_config(dir)
                .with_context(|| format!("failed to load config from {}", dir.display()))?,
            None => FormworkConfig::default(),
        };

        Ok(Self {
            db_override: global.db.as_ref().map(PathBuf::from),
            json: global.json || config.json,
            formwork_dir,
            config,
            quiet: global.quiet,
        })
    }

    /// Returns the database path: `--db`, else the configured or default
    /// path inside `.formwork/`.
    pub fn db_path(&self) -> Option<PathBuf> {
        if let Some(p) = &self.db_override {
            return Some(p.clone());
        }
        self.formwork_dir
            .as_deref()
            .map(|dir| resolve_db_path(dir, self.config.db.as_deref()))
    }

    /// Opens the schema store, failing with a hint if nothing is initialized.
    pub fn open_store(&self) -> Result<SqliteStore> {
        let Some(path) = self.db_path() else {
            bail!("no .formwork directory found. Run 'fw init' to create one.");
        };
        debug!(path = %path.display(), "opening schema store");
        SqliteStore::open(&path)
            .with_context(|| format!("failed to open database: {}", path.display()))
    }

    /// Recomputation bound for a schema: configured, or one pass per field plus one.
    pub fn max_passes(&self, schema: &FormSchema) -> usize {
        self.config
            .engine
            .max_passes
            .unwrap_or_else(|| default_max_passes(schema))
    }
}
