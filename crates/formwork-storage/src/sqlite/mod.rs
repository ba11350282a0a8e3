//! SQLite-backed storage implementation.

mod kv;
pub mod schema;
mod store;

pub use store::SqliteStore;
