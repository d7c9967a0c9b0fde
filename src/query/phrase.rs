//! Phrase query: terms at fixed relative positions in one field.

use ahash::AHashMap;

use crate::error::Result;
use crate::index::IndexReader;
use crate::query::matcher::{EmptyMatcher, Matcher, PrecomputedMatcher};
use crate::query::scorer::Bm25Scorer;
use crate::query::Query;

/// A query that matches documents containing the given terms at the given
/// relative positions in a field.
///
/// Positions come from the analyzer, so a stop word inside the source
/// phrase leaves a gap that the match respects: the indexed text must have
/// the same gap. Terms must already be normalized, like
/// [`TermQuery`](crate::query::TermQuery).
#[derive(Debug, Clone)]
pub struct PhraseQuery {
    field: String,
    /// (term, relative position) pairs, ascending by position.
    terms: Vec<(String, u32)>,
    boost: f32,
}

impl PhraseQuery {
    /// Create a phrase of consecutive terms.
    pub fn new<F: Into<String>>(field: F, terms: Vec<String>) -> Self {
        let terms = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t, i as u32))
            .collect();
        PhraseQuery {
            field: field.into(),
            terms,
            boost: 1.0,
        }
    }

    /// Create a phrase with explicit relative positions.
    pub fn with_positions<F: Into<String>>(field: F, terms: Vec<(String, u32)>) -> Self {
        PhraseQuery {
            field: field.into(),
            terms,
            boost: 1.0,
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The (term, relative position) pairs of this phrase.
    pub fn terms(&self) -> &[(String, u32)] {
        &self.terms
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Count phrase occurrences in one document given each term's position
    /// list (aligned with `self.terms`).
    fn phrase_freq(&self, position_lists: &[&Vec<u32>]) -> u32 {
        let base_offset = self.terms[0].1;
        let mut freq = 0u32;

        'starts: for &start in position_lists[0] {
            for (i, (_, offset)) in self.terms.iter().enumerate().skip(1) {
                let wanted = start + (offset - base_offset);
                if !position_lists[i].contains(&wanted) {
                    continue 'starts;
                }
            }
            freq += 1;
        }

        freq
    }
}

impl Query for PhraseQuery {
    fn matcher(&self, reader: &IndexReader) -> Result<Box<dyn Matcher>> {
        if self.terms.is_empty() {
            return Ok(Box::new(EmptyMatcher::new()));
        }

        // Every term must occur somewhere, or the phrase cannot match.
        let mut per_term: Vec<AHashMap<u64, Vec<u32>>> = Vec::with_capacity(self.terms.len());
        for (term, _) in &self.terms {
            match reader.postings(&self.field, term) {
                Some(postings) => {
                    let positions: AHashMap<u64, Vec<u32>> = postings
                        .into_iter()
                        .map(|p| (p.doc_id, p.positions))
                        .collect();
                    per_term.push(positions);
                }
                None => return Ok(Box::new(EmptyMatcher::new())),
            }
        }

        // Candidates: docs containing the rarest term, checked against all.
        let mut candidates: Vec<u64> = per_term
            .iter()
            .min_by_key(|m| m.len())
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        candidates.sort_unstable();

        let mut matches: Vec<(u64, u32)> = Vec::new();
        'docs: for doc_id in candidates {
            let mut position_lists: Vec<&Vec<u32>> = Vec::with_capacity(per_term.len());
            for positions in &per_term {
                match positions.get(&doc_id) {
                    Some(list) => position_lists.push(list),
                    None => continue 'docs,
                }
            }
            let freq = self.phrase_freq(&position_lists);
            if freq > 0 {
                matches.push((doc_id, freq));
            }
        }

        if matches.is_empty() {
            return Ok(Box::new(EmptyMatcher::new()));
        }

        let avg_length = reader
            .field_stats(&self.field)
            .map(|s| s.avg_length())
            .unwrap_or(0.0);
        let scorer = Bm25Scorer::new(
            matches.len() as u64,
            reader.doc_count(),
            avg_length,
            self.boost,
        );
        let hits: Vec<(u64, f32)> = matches
            .into_iter()
            .map(|(doc_id, freq)| (doc_id, scorer.score(freq)))
            .collect();

        Ok(Box::new(PrecomputedMatcher::new(hits)))
    }

    fn description(&self) -> String {
        let words: Vec<&str> = self.terms.iter().map(|(t, _)| t.as_str()).collect();
        format!("{}:\"{}\"", self.field, words.join(" "))
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::index::InvertedIndex;
    use crate::schema::product_schema;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn reader_over(titles: &[&str]) -> IndexReader {
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
        index.reader().unwrap()
    }

    fn matched_docs(query: &PhraseQuery, reader: &IndexReader) -> Vec<u64> {
        let mut matcher = query.matcher(reader).unwrap();
        let mut docs = Vec::new();
        while !matcher.is_exhausted() {
            docs.push(matcher.doc_id());
            matcher.next().unwrap();
        }
        docs
    }

    #[test]
    fn test_phrase_matches_adjacent_terms() {
        let reader = reader_over(&[
            "blue jean jacket",
            "jacket over blue trousers",
            "jean blue jacket",
        ]);

        let query = PhraseQuery::new("title", vec!["blue".into(), "jean".into()]);
        assert_eq!(matched_docs(&query, &reader), vec![0]);
    }

    #[test]
    fn test_phrase_respects_order() {
        let reader = reader_over(&["jean blue"]);

        let query = PhraseQuery::new("title", vec!["blue".into(), "jean".into()]);
        assert!(matched_docs(&query, &reader).is_empty());
    }

    #[test]
    fn test_phrase_with_positional_gap() {
        // "of" is a stop word: indexed positions are house@0, denim@2.
        let reader = reader_over(&["house of denim"]);

        let gapped = PhraseQuery::with_positions(
            "title",
            vec![("hous".to_string(), 0), ("denim".to_string(), 2)],
        );
        assert_eq!(matched_docs(&gapped, &reader), vec![0]);

        let adjacent = PhraseQuery::new("title", vec!["hous".into(), "denim".into()]);
        assert!(matched_docs(&adjacent, &reader).is_empty());
    }

    #[test]
    fn test_phrase_missing_term() {
        let reader = reader_over(&["blue jean jacket"]);

        let query = PhraseQuery::new("title", vec!["blue".into(), "sofa".into()]);
        assert!(matched_docs(&query, &reader).is_empty());
    }

    #[test]
    fn test_phrase_counts_repeats() {
        let reader = reader_over(&["blue jean blue jean"]);

        let query = PhraseQuery::new("title", vec!["blue".into(), "jean".into()]);
        let matcher = query.matcher(&reader).unwrap();
        assert_eq!(matcher.doc_id(), 0);
        assert!(matcher.score() > 0.0);
    }

    #[test]
    fn test_phrase_description() {
        let query = PhraseQuery::new("title", vec!["blue".into(), "jean".into()]);
        assert_eq!(query.description(), "title:\"blue jean\"");
    }
}
