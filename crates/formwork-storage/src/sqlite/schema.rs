//! Database layout, as an ordered list of migrations.
//!
//! Schemas are stored as JSON text under well-known keys in a single `kv`
//! table. The layout version lives in SQLite's `user_version` pragma; entry
//! `i` of [`MIGRATIONS`] upgrades a database from version `i` to `i + 1`.

pub const MIGRATIONS: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS kv (
        key        TEXT PRIMARY KEY,
        value      TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );
    "#];

/// Layout version after every migration has run.
pub const CURRENT_SCHEMA_VERSION: i32 = MIGRATIONS.len() as i32;
