//! Key-value operations for [`SqliteStore`].

use formwork_core::schema::FormSchema;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use crate::error::Result;
use crate::sqlite::store::SqliteStore;
use crate::traits::{ALL_FORMS_KEY, SchemaStore, decode_forms, remove_form, upsert_form};

fn read_value(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
        row.get::<_, String>(0)
    })
    .optional()
}

fn write_value(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value, updated_at)
         VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
        params![key, value],
    )?;
    Ok(())
}

impl SqliteStore {
    /// Lists every stored key, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }

    /// Removes a key. Returns `false` if it was not set.
    pub fn remove_raw(&self, key: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        let n = conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }

    /// Reads, edits and writes back the form list inside one write
    /// transaction, so concurrent writers cannot drop each other's changes.
    /// The list is written only when `edit` returns `true`.
    fn modify_forms(&self, edit: impl FnOnce(&mut Vec<FormSchema>) -> bool) -> Result<bool> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut forms = decode_forms(read_value(&tx, ALL_FORMS_KEY)?.as_deref());
        if !edit(&mut forms) {
            return Ok(false);
        }
        write_value(&tx, ALL_FORMS_KEY, &serde_json::to_string(&forms)?)?;
        tx.commit()?;
        Ok(true)
    }
}

impl SchemaStore for SqliteStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock_conn()?;
        Ok(read_value(&conn, key)?)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        Ok(write_value(&conn, key, value)?)
    }

    fn save_form(&self, schema: &FormSchema) -> Result<()> {
        self.modify_forms(|forms| {
            upsert_form(forms, schema);
            true
        })?;
        Ok(())
    }

    fn delete_form(&self, id: &str) -> Result<bool> {
        self.modify_forms(|forms| remove_form(forms, id))
    }
}
