//! Clap CLI definitions for the `fw` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use formwork_core::enums::FieldType;

/// fw -- build, check and fill form schemas.
#[derive(Parser, Debug)]
#[command(
    name = "fw",
    about = "Build, check and fill form schemas",
    long_about = "Define forms as ordered fields with validation rules and derived values, \
                  store them in a local database, and fill them in from the command line.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Database path (default: .formwork/formwork.db, auto-discovered).
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a .formwork directory in the current directory.
    Init(InitArgs),

    /// Create a new, empty form.
    #[command(alias = "new")]
    Create(CreateArgs),

    /// List saved forms.
    #[command(alias = "ls")]
    List,

    /// Show a form's fields.
    Show(FormRef),

    /// Delete saved forms.
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Rename a form.
    Rename(RenameArgs),

    /// Add, change, remove or reorder fields.
    Field(FieldArgs),

    /// Check a form's structure (ids, options, rules, derived fields).
    Check(FormRef),

    /// Store a copy of a form as the current preview.
    Preview(FormRef),

    /// Fill in a form: seed defaults, apply values, compute derived fields, validate.
    Fill(FillArgs),

    /// Import forms from a JSON, TOML or JSONL file.
    Import(ImportArgs),

    /// Export one form as JSON or TOML.
    Export(ExportArgs),

    /// Export every form as JSONL.
    ExportAll(ExportAllArgs),

    /// Generate shell completions.
    Completion(CompletionArgs),
}

/// Arguments for `fw init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if a database already exists.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `fw create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Form name (default: editor.default-form-name from config).
    #[arg(short, long)]
    pub name: Option<String>,
}

/// A single form, by id. `current` names the preview copy.
#[derive(Args, Debug)]
pub struct FormRef {
    /// Form id, or `current` for the preview.
    pub id: String,
}

/// Arguments for `fw delete`.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Ids of the forms to delete.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// Arguments for `fw rename`.
#[derive(Args, Debug)]
pub struct RenameArgs {
    pub id: String,
    pub name: String,
}

/// Arguments for `fw field`.
#[derive(Args, Debug)]
pub struct FieldArgs {
    #[command(subcommand)]
    pub command: FieldCommands,
}

/// Field subcommands.
#[derive(Subcommand, Debug)]
pub enum FieldCommands {
    /// Append a new field to a form.
    Add(FieldAddArgs),

    /// Change an existing field.
    #[command(alias = "edit")]
    Update(FieldUpdateArgs),

    /// Remove a field.
    #[command(alias = "rm")]
    Delete(FieldDeleteArgs),

    /// Move a field to a new position.
    Move(FieldMoveArgs),
}

/// Settings shared by `field add` and `field update`.
#[derive(Args, Debug, Default)]
pub struct FieldSettings {
    /// Field label.
    #[arg(short, long)]
    pub label: Option<String>,

    /// Whether a value is required.
    #[arg(long)]
    pub required: Option<bool>,

    /// Default value used when the form is filled.
    #[arg(long = "default")]
    pub default_value: Option<String>,

    /// Placeholder text.
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Choices for select and radio fields (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub options: Option<Vec<String>>,

    /// Add a "not empty" rule.
    #[arg(long)]
    pub not_empty: bool,

    /// Add a minimum length rule.
    #[arg(long)]
    pub min_length: Option<u32>,

    /// Add a maximum length rule.
    #[arg(long)]
    pub max_length: Option<u32>,

    /// Add an email format rule.
    #[arg(long)]
    pub email: bool,

    /// Add a password strength rule.
    #[arg(long)]
    pub password: bool,

    /// Remove all validation rules before adding new ones.
    #[arg(long)]
    pub clear_rules: bool,

    /// Make the field derived from these fields (comma-separated ids).
    #[arg(long, value_delimiter = ',')]
    pub derive_from: Option<Vec<String>>,

    /// Formula for a derived field: AGE_FROM_DOB or arithmetic over {field_id}.
    #[arg(long)]
    pub formula: Option<String>,

    /// Turn a derived field back into a plain one.
    #[arg(long, conflicts_with_all = ["derive_from", "formula"])]
    pub not_derived: bool,
}

/// Arguments for `fw field add`.
#[derive(Args, Debug)]
pub struct FieldAddArgs {
    /// Form id.
    pub form: String,

    /// Field type (text, email, password, number, textarea, select, radio, checkbox, date).
    #[arg(value_name = "TYPE")]
    pub field_type: FieldType,

    #[command(flatten)]
    pub settings: FieldSettings,
}

/// Arguments for `fw field update`.
#[derive(Args, Debug)]
pub struct FieldUpdateArgs {
    /// Form id.
    pub form: String,

    /// Field id.
    pub field: String,

    #[command(flatten)]
    pub settings: FieldSettings,
}

/// Arguments for `fw field delete`.
#[derive(Args, Debug)]
pub struct FieldDeleteArgs {
    pub form: String,
    pub field: String,
}

/// Arguments for `fw field move`.
#[derive(Args, Debug)]
pub struct FieldMoveArgs {
    pub form: String,
    pub field: String,

    /// Zero-based destination position.
    pub to: usize,
}

/// Arguments for `fw fill`.
#[derive(Args, Debug)]
pub struct FillArgs {
    /// Form id, or `current` for the preview.
    pub id: String,

    /// Set a field value (repeatable): --set field_id=value.
    #[arg(short, long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Date used for age calculations (YYYY-MM-DD, default: today).
    #[arg(long)]
    pub today: Option<String>,
}

/// Arguments for `fw import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// File to import (.json, .toml or .jsonl).
    pub file: PathBuf,
}

/// Arguments for `fw export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Form id, or `current` for the preview.
    pub id: String,

    /// Write to this file instead of stdout (.toml writes TOML).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `fw export-all`.
#[derive(Args, Debug)]
pub struct ExportAllArgs {
    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `fw completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

/// Completion subcommands.
#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Generate Bash completions.
    Bash,
    /// Generate Zsh completions.
    Zsh,
    /// Generate Fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}
