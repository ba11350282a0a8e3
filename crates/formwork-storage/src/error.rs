//! Storage error types.

use std::path::PathBuf;

/// Errors raised while opening, migrating or reading a schema store, or a
/// schema file on disk.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The database could not be opened or configured.
    #[error("cannot open database {location}: {source}")]
    Open {
        /// File path, or `:memory:`.
        location: String,
        source: rusqlite::Error,
    },

    /// Upgrading the database to a newer layout failed.
    #[error("database migration to version {version} failed: {source}")]
    Migration {
        version: i32,
        source: rusqlite::Error,
    },

    /// The database was written by a newer version of formwork.
    #[error("database version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: i32, supported: i32 },

    /// A statement failed after the database was opened.
    #[error("query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("TOML error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// A schema file could not be decoded.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Reading or writing a schema file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A thread panicked while holding the store's lock.
    #[error("{0} lock poisoned")]
    Poisoned(&'static str),
}

/// Convenience alias used throughout the storage crate.
pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub(crate) fn open(location: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Open {
            location: location.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the error came from a schema file rather than the database.
    pub fn is_file_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::Io { .. } | Self::TomlDecode(_) | Self::TomlEncode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages() {
        assert_eq!(
            StorageError::parse("form.toml", "expected `=`").to_string(),
            "failed to parse form.toml: expected `=`"
        );
        assert_eq!(
            StorageError::UnsupportedVersion {
                found: 3,
                supported: 1
            }
            .to_string(),
            "database version 3 is newer than supported version 1"
        );
        assert_eq!(
            StorageError::Poisoned("connection").to_string(),
            "connection lock poisoned"
        );
    }

    #[test]
    fn file_errors_are_distinguished() {
        let io = StorageError::io("missing.json", std::io::ErrorKind::NotFound.into());
        assert!(io.is_file_error());
        assert!(!StorageError::Poisoned("entries").is_file_error());
    }
}
