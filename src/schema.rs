//! Schema management: which fields exist and how each is analyzed.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::{Analyzer, StemmingAnalyzer};
use crate::error::{JavelinError, Result};

/// The product catalog's field names.
pub const PRODUCT_FIELDS: &[&str] = &["description", "title", "merchant"];

/// Persisted description of a schema field.
///
/// Analyzers are not serializable, so the schema stores each field's
/// analyzer by name and rebuilds it on open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Field name.
    pub name: String,
    /// Name of the analyzer bound to the field.
    pub analyzer: String,
}

/// A schema defines the fields available in an index and how their text is
/// processed.
#[derive(Clone)]
pub struct Schema {
    /// Ordered list of field names (declaration order).
    field_names: Vec<String>,
    /// Map of field names to their analyzers.
    analyzers: HashMap<String, Arc<dyn Analyzer>>,
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<String> = self
            .field_names
            .iter()
            .map(|name| format!("{name}<{}>", self.analyzers[name].name()))
            .collect();
        f.debug_struct("Schema").field("fields", &fields).finish()
    }
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Schema {
            field_names: Vec::new(),
            analyzers: HashMap::new(),
        }
    }

    /// Add a text field analyzed by the given analyzer.
    pub fn add_text_field<S: Into<String>>(
        &mut self,
        name: S,
        analyzer: Arc<dyn Analyzer>,
    ) -> Result<()> {
        let name = name.into();

        if name.is_empty() {
            return Err(JavelinError::schema("field name cannot be empty"));
        }
        if self.analyzers.contains_key(&name) {
            return Err(JavelinError::schema(format!(
                "field '{name}' already exists"
            )));
        }

        self.field_names.push(name.clone());
        self.analyzers.insert(name, analyzer);
        Ok(())
    }

    /// Check whether a field is declared.
    pub fn has_field(&self, name: &str) -> bool {
        self.analyzers.contains_key(name)
    }

    /// Get the analyzer bound to a field.
    pub fn analyzer(&self, name: &str) -> Option<&Arc<dyn Analyzer>> {
        self.analyzers.get(name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.field_names.len()
    }

    /// Check whether the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.field_names.is_empty()
    }

    /// The persisted form of this schema.
    pub fn to_meta(&self) -> Vec<FieldMeta> {
        self.field_names
            .iter()
            .map(|name| FieldMeta {
                name: name.clone(),
                analyzer: self.analyzers[name].name().to_string(),
            })
            .collect()
    }

    /// Rebuild a schema from its persisted form.
    ///
    /// `stem_cache_size` configures the stemming analyzer's memo cache for
    /// fields that use it.
    pub fn from_meta(meta: &[FieldMeta], stem_cache_size: Option<usize>) -> Result<Self> {
        let mut schema = Schema::new();
        for field in meta {
            let analyzer: Arc<dyn Analyzer> = match field.analyzer.as_str() {
                "stemming" => Arc::new(StemmingAnalyzer::with_cache_size(stem_cache_size)?),
                other => {
                    return Err(JavelinError::schema(format!(
                        "unknown analyzer '{other}' for field '{}'",
                        field.name
                    )));
                }
            };
            schema.add_text_field(&field.name, analyzer)?;
        }
        Ok(schema)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

/// The product catalog schema: `description`, `title` and `merchant`, all
/// run through the stemming analyzer.
pub fn product_schema(stem_cache_size: Option<usize>) -> Result<Schema> {
    let mut schema = Schema::new();
    for field in PRODUCT_FIELDS {
        let analyzer = Arc::new(StemmingAnalyzer::with_cache_size(stem_cache_size)?);
        schema.add_text_field(*field, analyzer)?;
    }
    Ok(schema)
}
