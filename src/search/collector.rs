//! Collector implementations for gathering search results.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::search::SearchHit;

/// Trait for collecting matching documents during evaluation.
pub trait Collector: Send + std::fmt::Debug {
    /// Record one matching document.
    fn collect(&mut self, doc_id: u64, score: f32);

    /// Total number of matching documents seen so far.
    fn total_hits(&self) -> u64;
}

/// A scored document in the collector heap.
#[derive(Debug, Clone, Copy)]
struct ScoredDoc {
    doc_id: u64,
    score: f32,
}

impl ScoredDoc {
    /// True when `self` ranks strictly better than `other`: higher score,
    /// or equal score and lower document id.
    fn beats(&self, other: &ScoredDoc) -> bool {
        match self.score.partial_cmp(&other.score) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.doc_id < other.doc_id,
            _ => false,
        }
    }
}

impl PartialEq for ScoredDoc {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.doc_id == other.doc_id
    }
}

impl Eq for ScoredDoc {}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; make the heap top the worst-ranked
        // document (lowest score, then highest doc id) so it is the one
        // evicted.
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

/// Keeps the best `limit` documents by score.
///
/// Ranking is deterministic: descending score, ties broken by ascending
/// document id, for both eviction and the final ordering.
#[derive(Debug)]
pub struct TopDocsCollector {
    limit: usize,
    heap: BinaryHeap<ScoredDoc>,
    total_hits: u64,
}

impl TopDocsCollector {
    /// Create a collector that retains at most `limit` documents.
    pub fn new(limit: usize) -> Self {
        TopDocsCollector {
            limit,
            heap: BinaryHeap::with_capacity(limit + 1),
            total_hits: 0,
        }
    }

    /// Drain into hits ordered best-first.
    pub fn into_sorted_hits(self) -> Vec<SearchHit> {
        let mut docs: Vec<ScoredDoc> = self.heap.into_vec();
        docs.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        docs.into_iter()
            .map(|d| SearchHit {
                doc_id: d.doc_id,
                score: d.score,
            })
            .collect()
    }
}

impl Collector for TopDocsCollector {
    fn collect(&mut self, doc_id: u64, score: f32) {
        self.total_hits += 1;
        let candidate = ScoredDoc { doc_id, score };

        if self.heap.len() < self.limit {
            self.heap.push(candidate);
        } else if let Some(worst) = self.heap.peek() {
            if candidate.beats(worst) {
                self.heap.pop();
                self.heap.push(candidate);
            }
        }
    }

    fn total_hits(&self) -> u64 {
        self.total_hits
    }
}

/// Counts matching documents without retaining them.
#[derive(Debug, Default)]
pub struct CountCollector {
    count: u64,
}

impl CountCollector {
    /// Create a new count collector.
    pub fn new() -> Self {
        CountCollector { count: 0 }
    }

    /// The current count.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Collector for CountCollector {
    fn collect(&mut self, _doc_id: u64, _score: f32) {
        self.count += 1;
    }

    fn total_hits(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_top_k() {
        let mut collector = TopDocsCollector::new(2);
        collector.collect(0, 1.0);
        collector.collect(1, 3.0);
        collector.collect(2, 2.0);

        assert_eq!(collector.total_hits(), 3);

        let hits = collector.into_sorted_hits();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_id, 1);
        assert_eq!(hits[1].doc_id, 2);
    }

    #[test]
    fn test_ties_break_by_ascending_doc_id() {
        let mut collector = TopDocsCollector::new(3);
        collector.collect(5, 1.0);
        collector.collect(1, 1.0);
        collector.collect(3, 1.0);

        let hits = collector.into_sorted_hits();
        let ids: Vec<u64> = hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_tied_eviction_keeps_lower_doc_ids() {
        // Four equal-scored docs into a 2-slot collector: the two lowest
        // ids must survive regardless of arrival order.
        let mut collector = TopDocsCollector::new(2);
        for doc_id in [7, 2, 9, 4] {
            collector.collect(doc_id, 1.0);
        }

        let ids: Vec<u64> = collector
            .into_sorted_hits()
            .iter()
            .map(|h| h.doc_id)
            .collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_total_hits_counts_past_limit() {
        let mut collector = TopDocsCollector::new(1);
        for doc_id in 0..10 {
            collector.collect(doc_id, doc_id as f32);
        }

        assert_eq!(collector.total_hits(), 10);
        let hits = collector.into_sorted_hits();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].doc_id, 9);
    }

    #[test]
    fn test_count_collector() {
        let mut collector = CountCollector::new();
        collector.collect(0, 1.0);
        collector.collect(1, 0.5);

        assert_eq!(collector.count(), 2);
    }
}
