//! JSON Lines support for exporting and importing many schemas at once.
//!
//! Each line is one complete [`FormSchema`] object.

use std::io::{self, BufRead, Write};

use crate::schema::FormSchema;

/// Error type for JSONL operations.
#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error at line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
}

/// Result alias for JSONL operations.
pub type Result<T> = std::result::Result<T, JsonlError>;

/// Writes schemas as JSONL, one per line.
pub fn write_jsonl<W: Write>(writer: &mut W, schemas: &[FormSchema]) -> Result<()> {
    for (i, schema) in schemas.iter().enumerate() {
        serde_json::to_writer(&mut *writer, schema)
            .map_err(|e| JsonlError::Json { line: i + 1, source: e })?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Returns an iterator over the schemas in a JSONL reader. Blank lines are skipped.
pub fn read_jsonl<R: BufRead>(reader: R) -> JsonlIter<R> {
    JsonlIter {
        reader,
        line_number: 0,
    }
}

/// Iterator over JSONL-encoded schemas.
pub struct JsonlIter<R> {
    reader: R,
    line_number: usize,
}

impl<R: BufRead> Iterator for JsonlIter<R> {
    type Item = Result<FormSchema>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    return Some(serde_json::from_str::<FormSchema>(trimmed).map_err(|e| {
                        JsonlError::Json {
                            line: self.line_number,
                            source: e,
                        }
                    }));
                }
                Err(e) => return Some(Err(JsonlError::Io(e))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::SchemaEditor;
    use crate::enums::FieldType;
    use std::io::BufReader;

    #[test]
    fn write_and_read_back() {
        let mut first = SchemaEditor::new();
        first.rename("First");
        first.add_field(FieldType::Email);
        let mut second = SchemaEditor::new();
        second.rename("Second");
        let schemas = vec![first.into_schema(), second.into_schema()];

        let mut buf = Vec::new();
        write_jsonl(&mut buf, &schemas).unwrap();
        assert_eq!(buf.iter().filter(|b| **b == b'\n').count(), 2);

        let read_back: Vec<FormSchema> = read_jsonl(BufReader::new(buf.as_slice()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(read_back, schemas);
    }

    #[test]
    fn reports_line_number_on_error() {
        let good = serde_json::to_string(SchemaEditor::new().schema()).unwrap();
        let data = format!("{good}\n\nnot-json\n");
        let results: Vec<_> = read_jsonl(BufReader::new(data.as_bytes())).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(JsonlError::Json { line, .. }) => assert_eq!(*line, 3),
            other => panic!("expected JSON error, got {:?}", other),
        }
    }
}
