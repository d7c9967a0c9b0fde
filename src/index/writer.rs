//! Index writer: buffered document ingestion and atomic commit.

use std::collections::HashMap;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::document::Document;
use crate::error::{JavelinError, Result};
use crate::index::segment::{FieldStats, Posting, Segment};
use crate::index::IndexMetadata;
use crate::schema::Schema;
use crate::storage::Storage;

/// Writes documents into an index.
///
/// Added documents are buffered in memory and invisible to readers until
/// [`commit`](IndexWriter::commit), which writes one segment file and then
/// atomically republishes the manifest. Document ids are global, sequential
/// and zero-based, assigned at add time.
pub struct IndexWriter {
    storage: Arc<dyn Storage>,
    schema: Arc<Schema>,
    meta: Arc<RwLock<IndexMetadata>>,

    // Buffered state for the pending segment.
    postings: AHashMap<String, AHashMap<String, Vec<Posting>>>,
    stored: Vec<HashMap<String, String>>,
    field_stats: AHashMap<String, FieldStats>,
    doc_offset: u64,
    buffered_docs: u64,
}

impl std::fmt::Debug for IndexWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriter")
            .field("doc_offset", &self.doc_offset)
            .field("buffered_docs", &self.buffered_docs)
            .finish()
    }
}

impl IndexWriter {
    pub(crate) fn new(
        storage: Arc<dyn Storage>,
        schema: Arc<Schema>,
        meta: Arc<RwLock<IndexMetadata>>,
    ) -> Self {
        let doc_offset = meta.read().doc_count;
        IndexWriter {
            storage,
            schema,
            meta,
            postings: AHashMap::new(),
            stored: Vec::new(),
            field_stats: AHashMap::new(),
            doc_offset,
            buffered_docs: 0,
        }
    }

    /// Number of documents added since the last commit.
    pub fn buffered_docs(&self) -> u64 {
        self.buffered_docs
    }

    /// Analyze and buffer one document, returning its assigned id.
    ///
    /// Every schema field is processed. A field the document does not carry
    /// is treated as empty text — it stores as empty and produces no
    /// postings. This lenient policy is deliberate; see DESIGN.md.
    pub fn add_document(&mut self, doc: &Document) -> Result<u64> {
        let doc_id = self.doc_offset + self.buffered_docs;
        let mut stored_fields = HashMap::new();

        for field in self.schema.field_names() {
            let raw = doc.get(field).unwrap_or("");
            stored_fields.insert(field.clone(), raw.to_string());

            if raw.is_empty() {
                continue;
            }

            let analyzer = self.schema.analyzer(field).ok_or_else(|| {
                JavelinError::schema(format!("field '{field}' has no analyzer"))
            })?;

            let mut positions_by_term: AHashMap<String, Vec<u32>> = AHashMap::new();
            let mut token_count = 0u64;
            for token in analyzer.analyze(raw)? {
                token_count += 1;
                positions_by_term
                    .entry(token.text)
                    .or_default()
                    .push(token.position as u32);
            }

            if token_count == 0 {
                continue;
            }

            let stats = self.field_stats.entry(field.clone()).or_default();
            stats.doc_count += 1;
            stats.total_tokens += token_count;

            let field_postings = self.postings.entry(field.clone()).or_default();
            for (term, positions) in positions_by_term {
                field_postings.entry(term).or_default().push(Posting {
                    doc_id,
                    term_freq: positions.len() as u32,
                    positions,
                });
            }
        }

        self.stored.push(stored_fields);
        self.buffered_docs += 1;
        Ok(doc_id)
    }

    /// Atomically publish all buffered documents.
    ///
    /// Writes the segment file first, then replaces the manifest. A crash
    /// between the two leaves an orphan segment file that no manifest
    /// references, which readers never see.
    pub fn commit(&mut self) -> Result<()> {
        if self.buffered_docs == 0 {
            log::debug!("commit with no buffered documents is a no-op");
            return Ok(());
        }

        let mut meta = self.meta.write();
        let generation = meta.generation + 1;
        let segment_name = Segment::file_name(generation);

        let segment = Segment {
            doc_offset: self.doc_offset,
            doc_count: self.buffered_docs,
            postings: self
                .postings
                .drain()
                .map(|(field, terms)| (field, terms.into_iter().collect()))
                .collect(),
            stored: std::mem::take(&mut self.stored),
            field_stats: self.field_stats.drain().collect(),
        };
        segment.write_to(self.storage.as_ref(), &segment_name)?;

        let mut new_meta = meta.clone();
        new_meta.generation = generation;
        new_meta.doc_count += self.buffered_docs;
        new_meta.segments.push(segment_name.clone());
        new_meta.store(self.storage.as_ref())?;

        log::info!(
            "committed segment {} ({} documents, {} total)",
            segment_name,
            self.buffered_docs,
            new_meta.doc_count
        );

        *meta = new_meta;
        self.doc_offset += self.buffered_docs;
        self.buffered_docs = 0;
        Ok(())
    }
}
