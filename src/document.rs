//! Documents and the product collection loader.
//!
//! A [`Document`] is a flat map from field name to raw text. The raw values
//! are what the index stores for result rendering; the analyzed terms
//! derived from them are what it matches against.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{JavelinError, Result};

/// An immutable record with named text fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: HashMap<String, String>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Document {
            fields: HashMap::new(),
        }
    }

    /// Start building a document.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder {
            doc: Document::new(),
        }
    }

    /// Get a field's raw text.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(|s| s.as_str())
    }

    /// Check whether the document carries a field.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields in the document.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over (field, text) pairs.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Builder for [`Document`].
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    /// Add a text field.
    pub fn add_text<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.doc.fields.insert(name.into(), value.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> Document {
        self.doc
    }
}

/// Load a product collection from a JSON file.
///
/// The file must hold a JSON array of objects. String values are taken
/// verbatim; numbers and booleans are stringified; null and nested values
/// are skipped. Keys outside the index schema are carried along harmlessly
/// — the index builder only looks at declared fields.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).map_err(|e| {
        JavelinError::storage(format!("cannot read {}: {e}", path.display()))
    })?;

    let values: Vec<serde_json::Map<String, Value>> = serde_json::from_str(&data)?;

    let mut records = Vec::with_capacity(values.len());
    for object in values {
        let mut builder = Document::builder();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            builder = builder.add_text(key, text);
        }
        records.push(builder.build());
    }

    log::debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
