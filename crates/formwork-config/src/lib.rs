//! Configuration management for formwork.
//!
//! Loads and saves `.formwork/config.yaml`, layers `FORMWORK_*` environment
//! overrides on top, and discovers the `.formwork/` directory.

pub mod config;
pub mod formwork_dir;

pub use config::{ConfigError, EditorConfig, EngineConfig, FormworkConfig, load_config, save_config};
pub use formwork_dir::{ensure_formwork_dir, find_formwork_dir, resolve_db_path};
