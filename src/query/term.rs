//! Term query: exact match on a single normalized term in one field.

use crate::error::Result;
use crate::index::IndexReader;
use crate::query::matcher::{EmptyMatcher, Matcher, PostingMatcher};
use crate::query::scorer::Bm25Scorer;
use crate::query::Query;

/// A query that matches documents containing a specific term in a field.
///
/// The term must already be normalized — term queries do not analyze their
/// input. The query parser runs query text through the field's analyzer
/// before building term queries, which is what keeps query terms aligned
/// with indexed terms.
#[derive(Debug, Clone)]
pub struct TermQuery {
    field: String,
    term: String,
    boost: f32,
}

impl TermQuery {
    /// Create a new term query.
    pub fn new<F, T>(field: F, term: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        TermQuery {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the boost factor.
    pub fn boost(&self) -> f32 {
        self.boost
    }
}

impl Query for TermQuery {
    fn matcher(&self, reader: &IndexReader) -> Result<Box<dyn Matcher>> {
        match reader.postings(&self.field, &self.term) {
            Some(postings) => {
                let avg_length = reader
                    .field_stats(&self.field)
                    .map(|s| s.avg_length())
                    .unwrap_or(0.0);
                let scorer = Bm25Scorer::new(
                    postings.len() as u64,
                    reader.doc_count(),
                    avg_length,
                    self.boost,
                );
                Ok(Box::new(PostingMatcher::new(postings, scorer)))
            }
            None => Ok(Box::new(EmptyMatcher::new())),
        }
    }

    fn description(&self) -> String {
        if self.boost == 1.0 {
            format!("{}:{}", self.field, self.term)
        } else {
            format!("{}:{}^{}", self.field, self.term, self.boost)
        }
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }
}
