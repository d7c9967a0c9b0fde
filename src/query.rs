//! Query system: structured queries and the query-string parser.
//!
//! A query is an immutable expression tree of [`TermQuery`],
//! [`PhraseQuery`] and [`BooleanQuery`] nodes, each tagged with the field it
//! targets. Queries build [`Matcher`]s against an
//! [`IndexReader`](crate::index::IndexReader) snapshot; matchers drive both
//! matching and scoring.

pub mod boolean;
pub mod matcher;
pub mod parser;
pub mod phrase;
pub mod scorer;
pub mod term;

use crate::error::Result;
use crate::index::IndexReader;

pub use boolean::{BooleanClause, BooleanQuery, BooleanQueryBuilder, Occur};
pub use matcher::{
    ConjunctionMatcher, DisjunctionMatcher, EmptyMatcher, Matcher, PostingMatcher,
    PrecomputedMatcher, NO_MORE_DOCS,
};
pub use parser::{ParsedQuery, QueryParser};
pub use phrase::PhraseQuery;
pub use scorer::Bm25Scorer;
pub use term::TermQuery;

/// Trait for executable queries.
pub trait Query: Send + Sync + std::fmt::Debug {
    /// Build a matcher for this query over the given reader snapshot.
    fn matcher(&self, reader: &IndexReader) -> Result<Box<dyn Matcher>>;

    /// Human-readable description for logs and debugging.
    fn description(&self) -> String;

    /// Clone this query as a boxed trait object.
    fn clone_box(&self) -> Box<dyn Query>;
}

impl Clone for Box<dyn Query> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
