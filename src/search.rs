//! Search execution: collectors, the searcher, and the engine facade.

pub mod collector;
pub mod engine;
pub mod searcher;

use std::time::Duration;

pub use collector::{Collector, CountCollector, TopDocsCollector};
pub use engine::SearchEngine;
pub use searcher::Searcher;

/// One ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    /// The document id.
    pub doc_id: u64,
    /// The relevance score.
    pub score: f32,
}

/// The outcome of one search: ranked hits plus evaluation statistics.
#[derive(Debug, Clone)]
pub struct ResultSet {
    /// Hits ordered by descending score, ties by ascending document id,
    /// truncated to the requested limit.
    pub hits: Vec<SearchHit>,

    /// Total number of matching documents before truncation. Exact — it
    /// never undercounts.
    pub estimated_length: u64,

    /// Wall-clock evaluation time.
    pub elapsed: Duration,
}

impl ResultSet {
    /// Check whether the search produced no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Number of returned hits (after truncation).
    pub fn len(&self) -> usize {
        self.hits.len()
    }
}
