//! In-memory editing of a form schema.
//!
//! [`SchemaEditor`] owns the schema being edited; its methods are the only
//! mutators. Every operation is total: unknown ids and out-of-range indices
//! leave the schema untouched.

use chrono::{DateTime, Utc};

use crate::enums::FieldType;
use crate::field::FormField;
use crate::idgen::{self, FIELD_PREFIX, FORM_PREFIX};
use crate::schema::{FormSchema, UNTITLED_FORM_NAME};

/// Owner of the schema under edit.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEditor {
    schema: FormSchema,
}

impl Default for SchemaEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaEditor {
    /// Starts editing a fresh, empty, untitled schema.
    pub fn new() -> Self {
        Self {
            schema: empty_schema(Utc::now()),
        }
    }

    /// Starts editing an existing schema.
    pub fn from_schema(schema: FormSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Ends the edit, returning the schema.
    pub fn into_schema(self) -> FormSchema {
        self.schema
    }

    /// Sets the form's display name.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.schema.name = name.into();
    }

    /// Appends a new field of the given type and returns it.
    pub fn add_field(&mut self, field_type: FieldType) -> &FormField {
        self.add_field_at(field_type, Utc::now())
    }

    /// Like [`add_field`](Self::add_field) with an explicit timestamp for id generation.
    pub fn add_field_at(&mut self, field_type: FieldType, now: DateTime<Utc>) -> &FormField {
        let schema = &self.schema;
        let id = idgen::generate_unique_id(FIELD_PREFIX, now, |candidate| {
            schema.field(candidate).is_some()
        });
        self.schema.fields.push(FormField::new_of_type(id, field_type));
        let last = self.schema.fields.len() - 1;
        &self.schema.fields[last]
    }

    /// Replaces the field with the same id. Returns `false` if no such field exists.
    pub fn update_field(&mut self, field: FormField) -> bool {
        match self.schema.fields.iter_mut().find(|f| f.id == field.id) {
            Some(slot) => {
                *slot = field;
                true
            }
            None => false,
        }
    }

    /// Removes a field by id. Returns `false` if no such field exists.
    pub fn delete_field(&mut self, id: &str) -> bool {
        let before = self.schema.fields.len();
        self.schema.fields.retain(|f| f.id != id);
        self.schema.fields.len() != before
    }

    /// Moves the field at `start` so that it ends up at `end`.
    ///
    /// `end` is interpreted after the field has been removed (list splice
    /// semantics) and is clamped to the list length. An out-of-range `start`
    /// is a no-op.
    pub fn reorder(&mut self, start: usize, end: usize) -> bool {
        let fields = &mut self.schema.fields;
        if start >= fields.len() {
            return false;
        }
        let moved = fields.remove(start);
        let end = end.min(fields.len());
        fields.insert(end, moved);
        start != end
    }

    /// Replaces the whole schema.
    pub fn load(&mut self, schema: FormSchema) {
        self.schema = schema;
    }

    /// Discards the current schema and starts a new untitled one.
    pub fn reset(&mut self) {
        self.schema = empty_schema(Utc::now());
    }
}

/// Builds an empty untitled schema with a fresh id.
pub fn empty_schema(now: DateTime<Utc>) -> FormSchema {
    FormSchema::new(
        idgen::generate_id(FORM_PREFIX, now, 0),
        UNTITLED_FORM_NAME,
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FormFieldBuilder;
    use pretty_assertions::assert_eq;

    fn editor_with(ids: &[&str]) -> SchemaEditor {
        let mut schema = empty_schema(Utc::now());
        schema.fields = ids
            .iter()
            .map(|id| FormFieldBuilder::new(*id, FieldType::Text).build())
            .collect();
        SchemaEditor::from_schema(schema)
    }

    fn ids(editor: &SchemaEditor) -> Vec<&str> {
        editor.schema().fields.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn new_editor_is_untitled_and_empty() {
        let editor = SchemaEditor::new();
        assert_eq!(editor.schema().name, "Untitled Form");
        assert!(editor.schema().fields.is_empty());
        assert!(editor.schema().id.starts_with("form_"));
    }

    #[test]
    fn add_field_appends_with_defaults() {
        let mut editor = editor_with(&["a"]);
        let added = editor.add_field(FieldType::Radio).clone();
        assert_eq!(editor.schema().fields.len(), 2);
        assert_eq!(editor.schema().fields[1], added);
        assert_eq!(added.label, "New Radio Field");
        assert_eq!(added.options.as_ref().map(Vec::len), Some(2));
        assert!(added.id.starts_with("field_"));
    }

    #[test]
    fn add_field_same_instant_gets_distinct_ids() {
        let mut editor = SchemaEditor::new();
        let now = Utc::now();
        let a = editor.add_field_at(FieldType::Text, now).id.clone();
        let b = editor.add_field_at(FieldType::Text, now).id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn update_replaces_by_id() {
        let mut editor = editor_with(&["a", "b"]);
        let mut b = editor.schema().fields[1].clone();
        b.label = "Changed".into();
        assert!(editor.update_field(b));
        assert_eq!(editor.schema().fields[1].label, "Changed");

        let ghost = FormFieldBuilder::new("ghost", FieldType::Text).build();
        let before = editor.clone();
        assert!(!editor.update_field(ghost));
        assert_eq!(editor, before);
    }

    #[test]
    fn delete_by_id() {
        let mut editor = editor_with(&["a", "b", "c"]);
        assert!(editor.delete_field("b"));
        assert_eq!(ids(&editor), vec!["a", "c"]);
        assert!(!editor.delete_field("b"));
        assert_eq!(ids(&editor), vec!["a", "c"]);
    }

    #[test]
    fn reorder_uses_splice_semantics() {
        let mut editor = editor_with(&["A", "B", "C"]);
        editor.reorder(0, 2);
        assert_eq!(ids(&editor), vec!["B", "C", "A"]);

        let mut editor = editor_with(&["A", "B", "C"]);
        editor.reorder(2, 0);
        assert_eq!(ids(&editor), vec!["C", "A", "B"]);

        let mut editor = editor_with(&["A", "B", "C"]);
        editor.reorder(0, 1);
        assert_eq!(ids(&editor), vec!["B", "A", "C"]);
    }

    #[test]
    fn reorder_out_of_range() {
        let mut editor = editor_with(&["A", "B", "C"]);
        assert!(!editor.reorder(5, 0));
        assert_eq!(ids(&editor), vec!["A", "B", "C"]);

        editor.reorder(0, 99);
        assert_eq!(ids(&editor), vec!["B", "C", "A"]);
    }

    #[test]
    fn load_and_reset() {
        let mut editor = SchemaEditor::new();
        let other = editor_with(&["x"]).into_schema();
        editor.load(other.clone());
        assert_eq!(editor.schema(), &other);

        editor.rename("Survey");
        editor.reset();
        assert_eq!(editor.schema().name, "Untitled Form");
        assert!(editor.schema().fields.is_empty());
    }
}
