//! Boolean combination of queries.

use crate::error::Result;
use crate::index::IndexReader;
use crate::query::matcher::{ConjunctionMatcher, DisjunctionMatcher, EmptyMatcher, Matcher};
use crate::query::Query;

/// How a clause participates in the boolean combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// The clause must match.
    Must,
    /// The clause may match; when no `Must` clauses are present, at least
    /// one `Should` clause must match.
    Should,
}

/// A sub-query with its occurrence requirement.
#[derive(Debug, Clone)]
pub struct BooleanClause {
    /// The occurrence requirement.
    pub occur: Occur,
    /// The sub-query.
    pub query: Box<dyn Query>,
}

/// A boolean combination of sub-queries.
///
/// Matching: all `Must` clauses are intersected; when there are no `Must`
/// clauses, the `Should` clauses are unioned. With no clauses at all the
/// query matches nothing. Scores accumulate over the matching clauses, so
/// documents satisfying more (or rarer) clauses rank higher.
#[derive(Debug, Clone, Default)]
pub struct BooleanQuery {
    clauses: Vec<BooleanClause>,
}

impl BooleanQuery {
    /// Create an empty boolean query (matches nothing).
    pub fn new() -> Self {
        BooleanQuery {
            clauses: Vec::new(),
        }
    }

    /// The clauses of this query.
    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    /// Add a clause.
    pub fn push(&mut self, occur: Occur, query: Box<dyn Query>) {
        self.clauses.push(BooleanClause { occur, query });
    }
}

impl Query for BooleanQuery {
    fn matcher(&self, reader: &IndexReader) -> Result<Box<dyn Matcher>> {
        if self.clauses.is_empty() {
            return Ok(Box::new(EmptyMatcher::new()));
        }

        let mut musts: Vec<Box<dyn Matcher>> = Vec::new();
        let mut shoulds: Vec<Box<dyn Matcher>> = Vec::new();
        for clause in &self.clauses {
            let matcher = clause.query.matcher(reader)?;
            match clause.occur {
                Occur::Must => musts.push(matcher),
                Occur::Should => shoulds.push(matcher),
            }
        }

        if musts.is_empty() {
            if shoulds.len() == 1 {
                return Ok(shoulds.remove(0));
            }
            return Ok(Box::new(DisjunctionMatcher::new(shoulds)));
        }

        if musts.len() == 1 && shoulds.is_empty() {
            return Ok(musts.remove(0));
        }
        Ok(Box::new(ConjunctionMatcher::new(musts)?))
    }

    fn description(&self) -> String {
        let parts: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| match clause.occur {
                Occur::Must => format!("+{}", clause.query.description()),
                Occur::Should => clause.query.description(),
            })
            .collect();
        format!("({})", parts.join(" "))
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }
}

/// Builder for [`BooleanQuery`].
#[derive(Debug, Default)]
pub struct BooleanQueryBuilder {
    query: BooleanQuery,
}

impl BooleanQueryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        BooleanQueryBuilder {
            query: BooleanQuery::new(),
        }
    }

    /// Add a required clause.
    pub fn must(mut self, query: Box<dyn Query>) -> Self {
        self.query.push(Occur::Must, query);
        self
    }

    /// Add an optional clause.
    pub fn should(mut self, query: Box<dyn Query>) -> Self {
        self.query.push(Occur::Should, query);
        self
    }

    /// Build the boolean query.
    pub fn build(self) -> BooleanQuery {
        self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::index::InvertedIndex;
    use crate::query::term::TermQuery;
    use crate::schema::product_schema;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn reader_over(docs: &[(&str, &str)]) -> IndexReader {
        let index = InvertedIndex::create(
            Arc::new(MemoryStorage::new()),
            product_schema(None).unwrap(),
        )
        .unwrap();
        let mut writer = index.writer();
        for (title, merchant) in docs {
            let doc = Document::builder()
                .add_text("title", *title)
                .add_text("merchant", *merchant)
                .build();
            writer.add_document(&doc).unwrap();
        }
        writer.commit().unwrap();
        index.reader().unwrap()
    }

    fn matched_docs(query: &dyn Query, reader: &IndexReader) -> Vec<u64> {
        let mut matcher = query.matcher(reader).unwrap();
        let mut docs = Vec::new();
        while !matcher.is_exhausted() {
            docs.push(matcher.doc_id());
            matcher.next().unwrap();
        }
        docs
    }

    #[test]
    fn test_empty_boolean_matches_nothing() {
        let reader = reader_over(&[("blue jeans", "Denim Co")]);
        let query = BooleanQuery::new();

        assert!(matched_docs(&query, &reader).is_empty());
    }

    #[test]
    fn test_must_intersects() {
        let reader = reader_over(&[
            ("blue jeans", "Denim Co"),
            ("blue jacket", "Outerwear Ltd"),
            ("jean jacket", "Denim Co"),
        ]);

        let query = BooleanQueryBuilder::new()
            .must(Box::new(TermQuery::new("title", "blue")))
            .must(Box::new(TermQuery::new("title", "jean")))
            .build();

        assert_eq!(matched_docs(&query, &reader), vec![0]);
    }

    #[test]
    fn test_should_unions() {
        let reader = reader_over(&[
            ("blue jeans", "Denim Co"),
            ("leather jacket", "Outerwear Ltd"),
            ("wool coat", "Coats R Us"),
        ]);

        let query = BooleanQueryBuilder::new()
            .should(Box::new(TermQuery::new("title", "jean")))
            .should(Box::new(TermQuery::new("title", "coat")))
            .build();

        assert_eq!(matched_docs(&query, &reader), vec![0, 2]);
    }

    #[test]
    fn test_cross_field_disjunction() {
        let reader = reader_over(&[
            ("blue jeans", "Denim Co"),
            ("leather jacket", "Jean's Diner"),
        ]);

        let query = BooleanQueryBuilder::new()
            .should(Box::new(TermQuery::new("title", "jean")))
            .should(Box::new(TermQuery::new("merchant", "jean")))
            .build();

        assert_eq!(matched_docs(&query, &reader), vec![0, 1]);
    }

    #[test]
    fn test_single_clause_unwraps() {
        let reader = reader_over(&[("blue jeans", "Denim Co")]);

        let query = BooleanQueryBuilder::new()
            .must(Box::new(TermQuery::new("title", "jean")))
            .build();

        assert_eq!(matched_docs(&query, &reader), vec![0]);
    }

    #[test]
    fn test_description() {
        let query = BooleanQueryBuilder::new()
            .must(Box::new(TermQuery::new("title", "jean")))
            .should(Box::new(TermQuery::new("merchant", "denim")))
            .build();

        assert_eq!(query.description(), "(+title:jean merchant:denim)");
    }
}
