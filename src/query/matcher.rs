//! Matcher implementations for query execution.
//!
//! A matcher is a cursor over the documents matching a query node, in
//! ascending document-id order, exposing the score of the current document.
//! Composite matchers combine child cursors: conjunction by leapfrog
//! intersection, disjunction by advancing the minimum.

use crate::error::Result;
use crate::index::Posting;
use crate::query::scorer::Bm25Scorer;

/// Sentinel document id reported by exhausted matchers.
pub const NO_MORE_DOCS: u64 = u64::MAX;

/// Trait for document matchers.
pub trait Matcher: Send + std::fmt::Debug {
    /// The current document id, or [`NO_MORE_DOCS`] when exhausted.
    fn doc_id(&self) -> u64;

    /// The score of the current document.
    fn score(&self) -> f32;

    /// Move to the next matching document. Returns false when exhausted.
    fn next(&mut self) -> Result<bool>;

    /// Skip to the first document with id >= `target`. Returns false when
    /// exhausted.
    fn skip_to(&mut self, target: u64) -> Result<bool>;

    /// Upper bound on the number of documents this matcher can produce.
    fn cost(&self) -> u64;

    /// Check whether this matcher is exhausted.
    fn is_exhausted(&self) -> bool {
        self.doc_id() == NO_MORE_DOCS
    }
}

/// A matcher that matches no documents.
#[derive(Debug, Default)]
pub struct EmptyMatcher;

impl EmptyMatcher {
    /// Create a new empty matcher.
    pub fn new() -> Self {
        EmptyMatcher
    }
}

impl Matcher for EmptyMatcher {
    fn doc_id(&self) -> u64 {
        NO_MORE_DOCS
    }

    fn score(&self) -> f32 {
        0.0
    }

    fn next(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn skip_to(&mut self, _target: u64) -> Result<bool> {
        Ok(false)
    }

    fn cost(&self) -> u64 {
        0
    }
}

/// A matcher over one term's posting list.
#[derive(Debug)]
pub struct PostingMatcher {
    postings: Vec<Posting>,
    scorer: Bm25Scorer,
    pos: usize,
}

impl PostingMatcher {
    /// Create a matcher positioned at the first posting.
    pub fn new(postings: Vec<Posting>, scorer: Bm25Scorer) -> Self {
        PostingMatcher {
            postings,
            scorer,
            pos: 0,
        }
    }
}

impl Matcher for PostingMatcher {
    fn doc_id(&self) -> u64 {
        self.postings
            .get(self.pos)
            .map_or(NO_MORE_DOCS, |p| p.doc_id)
    }

    fn score(&self) -> f32 {
        self.postings
            .get(self.pos)
            .map_or(0.0, |p| self.scorer.score(p.term_freq))
    }

    fn next(&mut self) -> Result<bool> {
        if self.pos < self.postings.len() {
            self.pos += 1;
        }
        Ok(self.pos < self.postings.len())
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        // Postings are sorted by doc id; binary search the remainder.
        let offset = self.postings[self.pos..].partition_point(|p| p.doc_id < target);
        self.pos += offset;
        Ok(self.pos < self.postings.len())
    }

    fn cost(&self) -> u64 {
        self.postings.len() as u64
    }
}

/// A matcher over a precomputed (doc id, score) list.
///
/// Used by queries that resolve their matches eagerly, such as phrase
/// queries.
#[derive(Debug)]
pub struct PrecomputedMatcher {
    hits: Vec<(u64, f32)>,
    pos: usize,
}

impl PrecomputedMatcher {
    /// Create a matcher over hits sorted by ascending doc id.
    pub fn new(hits: Vec<(u64, f32)>) -> Self {
        debug_assert!(hits.windows(2).all(|w| w[0].0 < w[1].0));
        PrecomputedMatcher { hits, pos: 0 }
    }
}

impl Matcher for PrecomputedMatcher {
    fn doc_id(&self) -> u64 {
        self.hits.get(self.pos).map_or(NO_MORE_DOCS, |h| h.0)
    }

    fn score(&self) -> f32 {
        self.hits.get(self.pos).map_or(0.0, |h| h.1)
    }

    fn next(&mut self) -> Result<bool> {
        if self.pos < self.hits.len() {
            self.pos += 1;
        }
        Ok(self.pos < self.hits.len())
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        let offset = self.hits[self.pos..].partition_point(|h| h.0 < target);
        self.pos += offset;
        Ok(self.pos < self.hits.len())
    }

    fn cost(&self) -> u64 {
        self.hits.len() as u64
    }
}

/// Intersection of child matchers: a document matches when every child
/// matches it. The score is the sum of the children's scores.
#[derive(Debug)]
pub struct ConjunctionMatcher {
    children: Vec<Box<dyn Matcher>>,
    exhausted: bool,
}

impl ConjunctionMatcher {
    /// Create a conjunction, aligning the children on their first common
    /// document.
    pub fn new(children: Vec<Box<dyn Matcher>>) -> Result<Self> {
        let mut matcher = ConjunctionMatcher {
            exhausted: children.is_empty(),
            children,
        };
        if !matcher.exhausted {
            matcher.align()?;
        }
        Ok(matcher)
    }

    /// Leapfrog the children until they agree on a document id.
    fn align(&mut self) -> Result<()> {
        loop {
            let mut max = 0u64;
            for child in &self.children {
                let doc = child.doc_id();
                if doc == NO_MORE_DOCS {
                    self.exhausted = true;
                    return Ok(());
                }
                max = max.max(doc);
            }

            let mut moved = false;
            for child in &mut self.children {
                if child.doc_id() < max {
                    child.skip_to(max)?;
                    moved = true;
                }
            }
            if !moved {
                return Ok(());
            }
        }
    }
}

impl Matcher for ConjunctionMatcher {
    fn doc_id(&self) -> u64 {
        if self.exhausted {
            NO_MORE_DOCS
        } else {
            self.children[0].doc_id()
        }
    }

    fn score(&self) -> f32 {
        if self.exhausted {
            0.0
        } else {
            self.children.iter().map(|c| c.score()).sum()
        }
    }

    fn next(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        self.children[0].next()?;
        self.align()?;
        Ok(!self.exhausted)
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        for child in &mut self.children {
            if child.doc_id() < target {
                child.skip_to(target)?;
            }
        }
        self.align()?;
        Ok(!self.exhausted)
    }

    fn cost(&self) -> u64 {
        self.children.iter().map(|c| c.cost()).min().unwrap_or(0)
    }
}

/// Union of child matchers: a document matches when any child matches it.
/// The score is the sum of the scores of the children that match it.
#[derive(Debug)]
pub struct DisjunctionMatcher {
    children: Vec<Box<dyn Matcher>>,
}

impl DisjunctionMatcher {
    /// Create a disjunction over the given children.
    pub fn new(children: Vec<Box<dyn Matcher>>) -> Self {
        DisjunctionMatcher { children }
    }
}

impl Matcher for DisjunctionMatcher {
    fn doc_id(&self) -> u64 {
        self.children
            .iter()
            .map(|c| c.doc_id())
            .min()
            .unwrap_or(NO_MORE_DOCS)
    }

    fn score(&self) -> f32 {
        let current = self.doc_id();
        if current == NO_MORE_DOCS {
            return 0.0;
        }
        self.children
            .iter()
            .filter(|c| c.doc_id() == current)
            .map(|c| c.score())
            .sum()
    }

    fn next(&mut self) -> Result<bool> {
        let current = self.doc_id();
        if current == NO_MORE_DOCS {
            return Ok(false);
        }
        for child in &mut self.children {
            if child.doc_id() == current {
                child.next()?;
            }
        }
        Ok(self.doc_id() != NO_MORE_DOCS)
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        for child in &mut self.children {
            if child.doc_id() < target {
                child.skip_to(target)?;
            }
        }
        Ok(self.doc_id() != NO_MORE_DOCS)
    }

    fn cost(&self) -> u64 {
        self.children.iter().map(|c| c.cost()).sum()
    }
}
