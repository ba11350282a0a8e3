//! Schema persistence for formwork.
//!
//! Provides the [`SchemaStore`] trait with a SQLite implementation
//! ([`SqliteStore`]) and an in-memory one ([`MemoryStore`]), plus helpers for
//! single schema files.

pub mod error;
pub mod file;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use error::StorageError;
pub use file::{SchemaFormat, load_schema_file, parse_json, parse_toml, write_schema_file};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ALL_FORMS_KEY, PREVIEW_KEY, SchemaStore};
