//! Index reader: a stable snapshot of the committed index state.

use std::collections::HashMap;

use crate::error::Result;
use crate::index::segment::{FieldStats, Posting, Segment};
use crate::index::IndexMetadata;
use crate::storage::Storage;

/// Summary statistics for one term in one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermInfo {
    /// Number of documents containing the term.
    pub doc_freq: u64,

    /// Total occurrences of the term across documents.
    pub total_freq: u64,
}

/// A read-only view over the segments committed at construction time.
///
/// The reader materializes every referenced segment, so later commits do
/// not affect it: one reader is one snapshot. Acquire a fresh reader per
/// search request, drop it when the request finishes.
#[derive(Debug)]
pub struct IndexReader {
    segments: Vec<Segment>,
    doc_count: u64,
    fields: Vec<String>,
}

impl IndexReader {
    pub(crate) fn open(storage: &dyn Storage, meta: &IndexMetadata) -> Result<Self> {
        let segments = meta
            .segments
            .iter()
            .map(|name| Segment::read_from(storage, name))
            .collect::<Result<Vec<_>>>()?;

        Ok(IndexReader {
            segments,
            doc_count: meta.doc_count,
            fields: meta.fields.iter().map(|f| f.name.clone()).collect(),
        })
    }

    /// Total number of committed documents.
    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }

    /// Declared field names.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The postings for a (field, term) pair, merged across segments in
    /// ascending document-id order. `None` when the term does not occur.
    pub fn postings(&self, field: &str, term: &str) -> Option<Vec<Posting>> {
        let mut merged: Vec<Posting> = Vec::new();
        for segment in &self.segments {
            if let Some(list) = segment.postings.get(field).and_then(|t| t.get(term)) {
                merged.extend_from_slice(list);
            }
        }

        if merged.is_empty() { None } else { Some(merged) }
    }

    /// Document/total frequency for a (field, term) pair.
    pub fn term_info(&self, field: &str, term: &str) -> Option<TermInfo> {
        let mut doc_freq = 0u64;
        let mut total_freq = 0u64;
        for segment in &self.segments {
            if let Some(list) = segment.postings.get(field).and_then(|t| t.get(term)) {
                doc_freq += list.len() as u64;
                total_freq += list.iter().map(|p| u64::from(p.term_freq)).sum::<u64>();
            }
        }

        if doc_freq == 0 {
            None
        } else {
            Some(TermInfo {
                doc_freq,
                total_freq,
            })
        }
    }

    /// Aggregate statistics for a field across segments.
    pub fn field_stats(&self, field: &str) -> Option<FieldStats> {
        let mut merged = FieldStats::default();
        for segment in &self.segments {
            if let Some(stats) = segment.field_stats.get(field) {
                merged.merge(stats);
            }
        }

        if merged.doc_count == 0 { None } else { Some(merged) }
    }

    /// The stored raw field values for a document.
    pub fn stored_fields(&self, doc_id: u64) -> Option<&HashMap<String, String>> {
        self.segments
            .iter()
            .find(|segment| segment.contains(doc_id))
            .and_then(|segment| segment.stored.get((doc_id - segment.doc_offset) as usize))
    }
}
