//! The [`SchemaStore`] trait: the public API for schema persistence.
//!
//! Backends only provide a string key-value surface ([`get_raw`] and
//! [`set_raw`]); every schema operation is built on top of it, so all
//! backends share one storage layout:
//!
//! - `all_forms`: JSON array of every saved [`FormSchema`]
//! - `current_form_preview`: JSON object of the schema being previewed
//!
//! Stored JSON that no longer decodes is logged and read as empty, so a
//! corrupted key never blocks the caller.
//!
//! [`get_raw`]: SchemaStore::get_raw
//! [`set_raw`]: SchemaStore::set_raw

use formwork_core::schema::FormSchema;
use tracing::{debug, warn};

use crate::error::Result;

/// Key holding the list of saved schemas.
pub const ALL_FORMS_KEY: &str = "all_forms";

/// Key holding the schema currently being previewed.
pub const PREVIEW_KEY: &str = "current_form_preview";

/// Persistence for form schemas.
pub trait SchemaStore {
    /// Reads the raw value stored under `key`.
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_raw(&self, key: &str, value: &str) -> Result<()>;

    /// Returns every saved schema in save order.
    fn all_forms(&self) -> Result<Vec<FormSchema>> {
        Ok(decode_forms(self.get_raw(ALL_FORMS_KEY)?.as_deref()))
    }

    /// Looks up a saved schema by id.
    fn get_form(&self, id: &str) -> Result<Option<FormSchema>> {
        Ok(self.all_forms()?.into_iter().find(|f| f.id == id))
    }

    /// Inserts a schema, or replaces the saved schema with the same id in place.
    fn save_form(&self, schema: &FormSchema) -> Result<()> {
        let mut forms = self.all_forms()?;
        upsert_form(&mut forms, schema);
        self.set_raw(ALL_FORMS_KEY, &serde_json::to_string(&forms)?)
    }

    /// Removes a saved schema. Returns `false` if no schema had that id.
    fn delete_form(&self, id: &str) -> Result<bool> {
        let mut forms = self.all_forms()?;
        if !remove_form(&mut forms, id) {
            return Ok(false);
        }
        self.set_raw(ALL_FORMS_KEY, &serde_json::to_string(&forms)?)?;
        Ok(true)
    }

    /// Stores a copy of `schema` as the current preview.
    fn save_preview(&self, schema: &FormSchema) -> Result<()> {
        self.set_raw(PREVIEW_KEY, &serde_json::to_string(schema)?)
    }

    /// Returns the current preview, if one was stored and is readable.
    fn get_preview(&self) -> Result<Option<FormSchema>> {
        let Some(raw) = self.get_raw(PREVIEW_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(schema) => Ok(Some(schema)),
            Err(e) => {
                warn!(key = PREVIEW_KEY, error = %e, "stored preview is unreadable, ignoring");
                Ok(None)
            }
        }
    }
}

/// Decodes the stored form list. Missing or unreadable data is an empty list.
pub(crate) fn decode_forms(raw: Option<&str>) -> Vec<FormSchema> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(key = ALL_FORMS_KEY, error = %e, "stored forms are unreadable, treating as empty");
        Vec::new()
    })
}

/// Replaces the form with the same id in place, or appends it.
pub(crate) fn upsert_form(forms: &mut Vec<FormSchema>, schema: &FormSchema) {
    match forms.iter_mut().find(|f| f.id == schema.id) {
        Some(slot) => {
            debug!(id = %schema.id, "replacing saved form");
            *slot = schema.clone();
        }
        None => {
            debug!(id = %schema.id, "appending new form");
            forms.push(schema.clone());
        }
    }
}

/// Drops the form with the given id. Returns `false` if there was none.
pub(crate) fn remove_form(forms: &mut Vec<FormSchema>, id: &str) -> bool {
    let before = forms.len();
    forms.retain(|f| f.id != id);
    if forms.len() == before {
        return false;
    }
    debug!(id, "deleting form");
    true
}
