//! Configuration types and loading.
//!
//! The main entry point is [`FormworkConfig`], which represents the contents
//! of `.formwork/config.yaml` layered with `FORMWORK_*` environment
//! variables. Configuration is loaded with [`load_config`] and saved with
//! [`save_config`].

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use formwork_core::field::DEFAULT_OPTIONS;
use formwork_core::schema::UNTITLED_FORM_NAME;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file inside `.formwork/`.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Prefix of environment variables that override file settings.
///
/// Nested keys use a double underscore and dashes become single
/// underscores: `FORMWORK_ENGINE__MAX_PASSES` sets `engine.max-passes`.
pub const ENV_PREFIX: &str = "FORMWORK_";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Merging the file with the environment produced an invalid value.
    #[error("invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// The `.formwork/` directory was not found.
    #[error("no .formwork directory found (run 'fw init' first)")]
    FormworkDirNotFound,
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Derived-field engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on recomputation passes. Unset means one per field, plus one.
    #[serde(default, rename = "max-passes", skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<usize>,

    /// Refuse to save schemas whose derived fields depend on each other in a loop.
    #[serde(default = "default_true", rename = "reject-cycles")]
    pub reject_cycles: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_passes: None,
            reject_cycles: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Defaults used when creating forms and fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_form_name", rename = "default-form-name")]
    pub default_form_name: String,

    /// Initial choices for new select and radio fields.
    #[serde(default = "default_options", rename = "default-options")]
    pub default_options: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_form_name: default_form_name(),
            default_options: default_options(),
        }
    }
}

fn default_form_name() -> String {
    UNTITLED_FORM_NAME.to_string()
}

fn default_options() -> Vec<String> {
    DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect()
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FormworkConfig {
    /// Database path, relative to the `.formwork/` directory unless absolute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,

    /// Emit JSON instead of text by default.
    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub editor: EditorConfig,
}

/// Load configuration from `config.yaml` inside the given `.formwork/`
/// directory, then apply `FORMWORK_*` environment overrides.
///
/// A missing or empty file yields the defaults.
pub fn load_config(formwork_dir: &Path) -> Result<FormworkConfig> {
    let figment = file_figment(formwork_dir)?.merge(env_provider());
    extract(figment)
}

/// Load configuration from the file alone, ignoring the environment.
pub fn load_config_file(formwork_dir: &Path) -> Result<FormworkConfig> {
    extract(file_figment(formwork_dir)?)
}

fn file_figment(formwork_dir: &Path) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(FormworkConfig::default()));

    let config_path = formwork_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if !content.trim().is_empty() {
            // Surface YAML syntax errors with serde_yaml's messages.
            serde_yaml::from_str::<serde_yaml::Value>(&content)?;
            figment = figment.merge(Yaml::string(&content));
        }
    }
    Ok(figment)
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .ignore(&["dir"])
        .map(|key| env_key_to_path(key.as_str()).into())
}

/// Maps an environment key (prefix already stripped) to a config path.
pub fn env_key_to_path(key: &str) -> String {
    key.to_ascii_lowercase()
        .split("__")
        .map(|part| part.replace('_', "-"))
        .collect::<Vec<_>>()
        .join(".")
}

fn extract(figment: Figment) -> Result<FormworkConfig> {
    figment.extract().map_err(|e| ConfigError::Extract(Box::new(e)))
}

/// Save configuration to `config.yaml` inside the given `.formwork/` directory.
///
/// The directory is created if it does not exist.
pub fn save_config(formwork_dir: &Path, config: &FormworkConfig) -> Result<()> {
    std::fs::create_dir_all(formwork_dir)?;

    let config_path = formwork_dir.join(CONFIG_FILE_NAME);
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(config_path, yaml)?;
    Ok(())
}
