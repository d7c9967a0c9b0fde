//! Bulk index construction.

use crate::document::Document;
use crate::error::Result;
use crate::index::inverted::InvertedIndex;

/// One-shot bulk ingestion of a document collection.
///
/// Every record is added through the index writer and a single commit
/// publishes the whole batch at the end — there is no partial visibility
/// if the build fails midway. Records missing a declared field index that
/// field as empty text (the writer's lenient policy); the builder never
/// raises for it.
///
/// The builder itself is happy to run against a non-empty index (it just
/// appends another committed batch); invoking it exactly once per fresh
/// index is the caller's job.
#[derive(Debug)]
pub struct IndexBuilder<'a> {
    index: &'a InvertedIndex,
}

impl<'a> IndexBuilder<'a> {
    /// Create a builder over the given index.
    pub fn new(index: &'a InvertedIndex) -> Self {
        IndexBuilder { index }
    }

    /// Ingest the whole record collection and commit once.
    ///
    /// Returns the number of documents ingested.
    pub fn build<I>(&self, records: I) -> Result<u64>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut writer = self.index.writer();

        let mut count = 0u64;
        for record in records {
            writer.add_document(&record)?;
            count += 1;
        }
        writer.commit()?;

        log::info!("bulk build ingested {count} documents");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::product_schema;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn records() -> Vec<Document> {
        vec![
            Document::builder()
                .add_text("title", "Blue Jeans")
                .add_text("description", "Classic denim")
                .add_text("merchant", "Denim Co")
                .build(),
            Document::builder()
                .add_text("title", "Jean Jacket")
                .add_text("merchant", "Outerwear Ltd")
                .build(),
            // Record with an extra, undeclared key.
            Document::builder()
                .add_text("title", "Running Shoes")
                .add_text("price", "49.99")
                .build(),
        ]
    }

    #[test]
    fn test_bulk_build() {
        let index = InvertedIndex::create(
            Arc::new(MemoryStorage::new()),
            product_schema(None).unwrap(),
        )
        .unwrap();

        let count = IndexBuilder::new(&index).build(records()).unwrap();
        assert_eq!(count, 3);
        assert_eq!(index.doc_count(), 3);

        let reader = index.reader().unwrap();
        // "jeans" and "jean" stem together; "running" stems to "run".
        assert_eq!(reader.postings("title", "jean").unwrap().len(), 2);
        assert_eq!(reader.postings("title", "run").unwrap().len(), 1);
        // The undeclared "price" key was ignored.
        assert!(reader.postings("price", "49").is_none());
    }

    #[test]
    fn test_build_is_one_commit() {
        let index = InvertedIndex::create(
            Arc::new(MemoryStorage::new()),
            product_schema(None).unwrap(),
        )
        .unwrap();

        IndexBuilder::new(&index).build(records()).unwrap();

        // One commit: exactly one segment file beside the manifest.
        let segment_files: Vec<String> = index
            .storage()
            .list_files()
            .unwrap()
            .into_iter()
            .filter(|name| name.starts_with("segment_"))
            .collect();
        assert_eq!(segment_files.len(), 1);
    }

    #[test]
    fn test_build_empty_collection() {
        let index = InvertedIndex::create(
            Arc::new(MemoryStorage::new()),
            product_schema(None).unwrap(),
        )
        .unwrap();

        let count = IndexBuilder::new(&index).build(Vec::new()).unwrap();
        assert_eq!(count, 0);
        assert_eq!(index.doc_count(), 0);
    }
}
