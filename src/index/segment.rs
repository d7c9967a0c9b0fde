//! Immutable index segments.
//!
//! A segment is the unit of commit: postings, stored fields and field
//! statistics for one batch of documents. Segment files are
//! bincode-encoded with a magic header and a CRC32 over the payload.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{JavelinError, Result};
use crate::storage::Storage;

/// Magic bytes at the start of every segment file.
const SEGMENT_MAGIC: &[u8; 4] = b"jvsg";

/// A single posting: one document's occurrences of one term in one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Global document id.
    pub doc_id: u64,

    /// Number of occurrences of the term in this field of this document.
    pub term_freq: u32,

    /// Token positions of the occurrences, ascending.
    pub positions: Vec<u32>,
}

/// Per-field aggregate statistics, used for scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Number of documents with at least one indexed token in this field.
    pub doc_count: u64,

    /// Total number of indexed tokens in this field across documents.
    pub total_tokens: u64,
}

impl FieldStats {
    /// Average indexed field length in tokens.
    pub fn avg_length(&self) -> f64 {
        if self.doc_count == 0 {
            0.0
        } else {
            self.total_tokens as f64 / self.doc_count as f64
        }
    }

    /// Fold another stats value into this one.
    pub fn merge(&mut self, other: &FieldStats) {
        self.doc_count += other.doc_count;
        self.total_tokens += other.total_tokens;
    }
}

/// One committed batch of documents.
///
/// Posting lists are ordered by ascending document id; segments never
/// overlap in document id ranges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Segment {
    /// First global document id in this segment.
    pub doc_offset: u64,

    /// Number of documents in this segment.
    pub doc_count: u64,

    /// field → term → postings.
    pub postings: HashMap<String, HashMap<String, Vec<Posting>>>,

    /// Raw field values per document, indexed by `doc_id - doc_offset`.
    pub stored: Vec<HashMap<String, String>>,

    /// Per-field statistics for the documents in this segment.
    pub field_stats: HashMap<String, FieldStats>,
}

impl Segment {
    /// Segment file name for a commit generation.
    pub fn file_name(generation: u64) -> String {
        format!("segment_{generation:010}.seg")
    }

    /// Check whether `doc_id` falls in this segment's range.
    pub fn contains(&self, doc_id: u64) -> bool {
        doc_id >= self.doc_offset && doc_id < self.doc_offset + self.doc_count
    }

    /// Serialize this segment into a storage file.
    pub fn write_to(&self, storage: &dyn Storage, name: &str) -> Result<()> {
        let payload = bincode::serialize(self)
            .map_err(|e| JavelinError::index(format!("failed to encode segment: {e}")))?;
        let checksum = crc32fast::hash(&payload);

        let mut data = Vec::with_capacity(payload.len() + 8);
        data.extend_from_slice(SEGMENT_MAGIC);
        data.extend_from_slice(&checksum.to_le_bytes());
        data.extend_from_slice(&payload);

        crate::storage::write_all(storage, name, &data)
    }

    /// Deserialize a segment from a storage file, verifying its checksum.
    pub fn read_from(storage: &dyn Storage, name: &str) -> Result<Segment> {
        let data = crate::storage::read_to_vec(storage, name)?;

        if data.len() < 8 || &data[0..4] != SEGMENT_MAGIC {
            return Err(JavelinError::corrupt(format!(
                "{name}: not a segment file"
            )));
        }

        let stored_checksum = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        let payload = &data[8..];
        let checksum = crc32fast::hash(payload);
        if checksum != stored_checksum {
            return Err(JavelinError::corrupt(format!(
                "{name}: checksum mismatch (expected {stored_checksum:#010x}, got {checksum:#010x})"
            )));
        }

        bincode::deserialize(payload)
            .map_err(|e| JavelinError::corrupt(format!("{name}: failed to decode segment: {e}")))
    }
}
