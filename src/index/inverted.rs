//! Index lifecycle: create, open, readers and writers.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{JavelinError, Result};
use crate::index::reader::IndexReader;
use crate::index::writer::IndexWriter;
use crate::index::{IndexMetadata, METADATA_FILE};
use crate::schema::Schema;
use crate::storage::{FileStorage, Storage};

/// Configuration for opening an index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Capacity of the stemming memo cache rebuilt with the schema
    /// (`None` = unbounded).
    pub stem_cache_size: Option<usize>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            stem_cache_size: Some(crate::analysis::DEFAULT_STEM_CACHE_SIZE),
        }
    }
}

/// A persistent inverted index over a storage backend.
///
/// Created once with a schema, reopened read/write thereafter. Commits are
/// atomic: a reader opened at any point sees a complete committed state.
pub struct InvertedIndex {
    storage: Arc<dyn Storage>,
    schema: Arc<Schema>,
    meta: Arc<RwLock<IndexMetadata>>,
}

impl std::fmt::Debug for InvertedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let meta = self.meta.read();
        f.debug_struct("InvertedIndex")
            .field("doc_count", &meta.doc_count)
            .field("generation", &meta.generation)
            .field("schema", &self.schema)
            .finish()
    }
}

impl InvertedIndex {
    /// Create a new index in the given storage.
    ///
    /// Fails with [`JavelinError::AlreadyExists`] if the storage already
    /// holds an index manifest.
    pub fn create(storage: Arc<dyn Storage>, schema: Schema) -> Result<Self> {
        if storage.file_exists(METADATA_FILE) {
            return Err(JavelinError::AlreadyExists(
                "storage already holds an index manifest".to_string(),
            ));
        }

        let meta = IndexMetadata::new(&schema);
        meta.store(storage.as_ref())?;
        log::info!("created index with fields {:?}", schema.field_names());

        Ok(InvertedIndex {
            storage,
            schema: Arc::new(schema),
            meta: Arc::new(RwLock::new(meta)),
        })
    }

    /// Open an existing index from the given storage.
    ///
    /// Fails with [`JavelinError::EmptyIndex`] when the storage location
    /// exists but holds no committed manifest — the caller should `create`.
    pub fn open(storage: Arc<dyn Storage>, config: IndexConfig) -> Result<Self> {
        if !storage.file_exists(METADATA_FILE) {
            return Err(JavelinError::EmptyIndex(
                "no index manifest in storage".to_string(),
            ));
        }

        let meta = IndexMetadata::load(storage.as_ref())?;
        let schema = Schema::from_meta(&meta.fields, config.stem_cache_size)?;

        Ok(InvertedIndex {
            storage,
            schema: Arc::new(schema),
            meta: Arc::new(RwLock::new(meta)),
        })
    }

    /// Create an index in a directory.
    pub fn create_in_dir<P: AsRef<Path>>(dir: P, schema: Schema) -> Result<Self> {
        let storage = Arc::new(FileStorage::new(dir)?);
        Self::create(storage, schema)
    }

    /// Open an index from a directory.
    pub fn open_in_dir<P: AsRef<Path>>(dir: P, config: IndexConfig) -> Result<Self> {
        let storage = Arc::new(FileStorage::new(dir)?);
        Self::open(storage, config)
    }

    /// Check whether a directory holds a committed index.
    pub fn exists_in_dir<P: AsRef<Path>>(dir: P) -> bool {
        dir.as_ref().join(METADATA_FILE).is_file()
    }

    /// The storage backend.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// The index schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Number of committed documents.
    pub fn doc_count(&self) -> u64 {
        self.meta.read().doc_count
    }

    /// Open a snapshot reader over the currently committed state.
    pub fn reader(&self) -> Result<IndexReader> {
        let meta = self.meta.read().clone();
        IndexReader::open(self.storage.as_ref(), &meta)
    }

    /// Get a writer for this index.
    pub fn writer(&self) -> IndexWriter {
        IndexWriter::new(
            Arc::clone(&self.storage),
            Arc::clone(&self.schema),
            Arc::clone(&self.meta),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::schema::product_schema;
    use crate::storage::MemoryStorage;
    use tempfile::TempDir;

    #[test]
    fn test_create_then_already_exists() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

        InvertedIndex::create(Arc::clone(&storage), product_schema(None).unwrap()).unwrap();

        match InvertedIndex::create(storage, product_schema(None).unwrap()) {
            Err(JavelinError::AlreadyExists(_)) => {}
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
    }

    #[test]
    fn test_open_empty_location() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

        match InvertedIndex::open(storage, IndexConfig::default()) {
            Err(JavelinError::EmptyIndex(_)) => {}
            other => panic!("expected EmptyIndex, got {other:?}"),
        }
    }

    #[test]
    fn test_durability_across_reopen() {
        let dir = TempDir::new().unwrap();

        {
            let index =
                InvertedIndex::create_in_dir(dir.path(), product_schema(None).unwrap()).unwrap();
            let mut writer = index.writer();
            let doc = Document::builder()
                .add_text("title", "Blue Jeans")
                .add_text("merchant", "Denim Co")
                .build();
            writer.add_document(&doc).unwrap();
            writer.commit().unwrap();
        }

        let reopened = InvertedIndex::open_in_dir(dir.path(), IndexConfig::default()).unwrap();
        assert_eq!(reopened.doc_count(), 1);
        assert_eq!(reopened.schema().field_names().len(), 3);

        let reader = reopened.reader().unwrap();
        assert!(reader.postings("title", "jean").is_some());
        assert_eq!(reader.stored_fields(0).unwrap()["title"], "Blue Jeans");
    }

    #[test]
    fn test_exists_in_dir() {
        let dir = TempDir::new().unwrap();
        assert!(!InvertedIndex::exists_in_dir(dir.path()));

        InvertedIndex::create_in_dir(dir.path(), product_schema(None).unwrap()).unwrap();
        assert!(InvertedIndex::exists_in_dir(dir.path()));
    }

    #[test]
    fn test_open_after_create_without_commit() {
        let dir = TempDir::new().unwrap();
        InvertedIndex::create_in_dir(dir.path(), product_schema(None).unwrap()).unwrap();

        // A created-but-never-committed index opens fine with zero docs.
        let index = InvertedIndex::open_in_dir(dir.path(), IndexConfig::default()).unwrap();
        assert_eq!(index.doc_count(), 0);
    }
}
