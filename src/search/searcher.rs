//! Query evaluation against a reader snapshot.

use std::time::Instant;

use crate::error::{JavelinError, Result};
use crate::index::IndexReader;
use crate::query::Query;
use crate::search::collector::{Collector, CountCollector, TopDocsCollector};
use crate::search::ResultSet;

/// Evaluates queries against one index snapshot.
///
/// A searcher owns its [`IndexReader`]: its view of the index is stable for
/// its whole lifetime. Evaluation is a single bounded pass over the query's
/// matcher.
#[derive(Debug)]
pub struct Searcher {
    reader: IndexReader,
}

impl Searcher {
    /// Create a searcher over a reader snapshot.
    pub fn new(reader: IndexReader) -> Self {
        Searcher { reader }
    }

    /// The underlying reader.
    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    /// Evaluate a query, returning the best `limit` hits plus statistics.
    ///
    /// Fails with `InvalidLimit` when `limit` is zero. `estimated_length`
    /// in the result is the exact number of matching documents.
    pub fn search(&self, query: &dyn Query, limit: usize) -> Result<ResultSet> {
        if limit == 0 {
            return Err(JavelinError::invalid_limit("limit must be at least 1"));
        }

        let started = Instant::now();
        let mut matcher = query.matcher(&self.reader)?;
        let mut collector = TopDocsCollector::new(limit);

        while !matcher.is_exhausted() {
            collector.collect(matcher.doc_id(), matcher.score());
            matcher.next()?;
        }

        let estimated_length = collector.total_hits();
        let result = ResultSet {
            hits: collector.into_sorted_hits(),
            estimated_length,
            elapsed: started.elapsed(),
        };

        log::debug!(
            "query {} matched {} documents in {:?}",
            query.description(),
            result.estimated_length,
            result.elapsed
        );
        Ok(result)
    }

    /// Count the documents matching a query.
    pub fn count(&self, query: &dyn Query) -> Result<u64> {
        let mut matcher = query.matcher(&self.reader)?;
        let mut collector = CountCollector::new();

        while !matcher.is_exhausted() {
            collector.collect(matcher.doc_id(), matcher.score());
            matcher.next()?;
        }

        Ok(collector.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::index::InvertedIndex;
    use crate::query::TermQuery;
    use crate::schema::product_schema;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn searcher_over(titles: &[&str]) -> Searcher {
        let index = InvertedIndex::create(
            Arc::new(MemoryStorage::new()),
            product_schema(None).unwrap(),
        )
        .unwrap();
        let mut writer = index.writer();
        for title in titles {
            let doc = Document::builder().add_text("title", *title).build();
            writer.add_document(&doc).unwrap();
        }
        writer.commit().unwrap();
        Searcher::new(index.reader().unwrap())
    }

    #[test]
    fn test_search_ranks_by_score() {
        let searcher = searcher_over(&["jean", "jean jean jean", "jacket"]);
        let query = TermQuery::new("title", "jean");

        let results = searcher.search(&query, 10).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results.estimated_length, 2);
        // Doc 1 has a higher term frequency, so it ranks first.
        assert_eq!(results.hits[0].doc_id, 1);
        assert_eq!(results.hits[1].doc_id, 0);
        assert!(results.hits[0].score > results.hits[1].score);
    }

    #[test]
    fn test_limit_truncates_but_count_is_exact() {
        let searcher = searcher_over(&["jean", "jeans", "jean jacket", "denim jean"]);
        let query = TermQuery::new("title", "jean");

        let results = searcher.search(&query, 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results.estimated_length, 4);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let searcher = searcher_over(&["jean"]);
        let query = TermQuery::new("title", "jean");

        match searcher.search(&query, 0) {
            Err(JavelinError::InvalidLimit(_)) => {}
            other => panic!("expected InvalidLimit, got {other:?}"),
        }
    }

    #[test]
    fn test_tie_order_is_stable_across_runs() {
        // Identical single-occurrence titles tie exactly.
        let searcher = searcher_over(&["jean", "jean", "jean"]);
        let query = TermQuery::new("title", "jean");

        let first = searcher.search(&query, 2).unwrap();
        let second = searcher.search(&query, 2).unwrap();

        let first_ids: Vec<u64> = first.hits.iter().map(|h| h.doc_id).collect();
        let second_ids: Vec<u64> = second.hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(first_ids, vec![0, 1]);
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn test_count() {
        let searcher = searcher_over(&["jean", "jacket", "jeans"]);

        assert_eq!(searcher.count(&TermQuery::new("title", "jean")).unwrap(), 2);
        assert_eq!(searcher.count(&TermQuery::new("title", "sofa")).unwrap(), 0);
    }

    #[test]
    fn test_search_empty_index() {
        let searcher = searcher_over(&[]);
        let query = TermQuery::new("title", "jean");

        let results = searcher.search(&query, 3).unwrap();
        assert!(results.is_empty());
        assert_eq!(results.estimated_length, 0);
    }
}
