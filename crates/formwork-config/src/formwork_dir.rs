//! Discovery and creation of the `.formwork/` directory.
//!
//! The `.formwork/` directory holds a project's database and `config.yaml`.
//! It is found by walking up from the working directory, unless the
//! `FORMWORK_DIR` environment variable points somewhere else.

use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// The name of the formwork metadata directory.
pub const FORMWORK_DIR_NAME: &str = ".formwork";

/// Environment variable that overrides directory discovery.
pub const FORMWORK_DIR_ENV: &str = "FORMWORK_DIR";

/// Default database file name inside `.formwork/`.
pub const DEFAULT_DB_NAME: &str = "formwork.db";

/// Walk up the directory tree from `start` looking for a `.formwork/` directory.
///
/// `FORMWORK_DIR` wins if it names an existing directory.
pub fn find_formwork_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(FORMWORK_DIR_ENV) {
        let env_path = PathBuf::from(env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }
    find_formwork_dir_from(start)
}

/// Like [`find_formwork_dir`], without consulting the environment.
pub fn find_formwork_dir_from(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(FORMWORK_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Walk up looking for `.formwork/`, returning an error if not found.
pub fn find_formwork_dir_or_error(start: &Path) -> Result<PathBuf, ConfigError> {
    find_formwork_dir(start).ok_or(ConfigError::FormworkDirNotFound)
}

/// Ensure a `.formwork/` directory exists at (or under) `path`.
///
/// Returns the path to the `.formwork/` directory.
pub fn ensure_formwork_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let dir = if path.ends_with(FORMWORK_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(FORMWORK_DIR_NAME)
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Resolves the database path: `db` from config if set (relative paths are
/// taken from the `.formwork/` directory), else `formwork.db`.
pub fn resolve_db_path(formwork_dir: &Path, db: Option<&str>) -> PathBuf {
    match db {
        Some(p) if Path::new(p).is_absolute() => PathBuf::from(p),
        Some(p) => formwork_dir.join(p),
        None => formwork_dir.join(DEFAULT_DB_NAME),
    }
}
