//! Query parser: compiles a query string plus an optional field scope into
//! a structured query.
//!
//! Grammar, in order of application:
//!
//! 1. A trailing `.limit <n>` directive is stripped and reported separately
//!    (it is not part of the query tree). A missing, non-integer or
//!    non-positive value fails with `InvalidLimit`.
//! 2. The remaining text splits into units: bare words and `"quoted
//!    phrases"`. An unbalanced quote fails with `Parse`.
//! 3. Every unit is analyzed with the target field's analyzer, so query
//!    terms normalize exactly like indexed terms. Units whose analysis
//!    yields nothing (stop words) drop out.
//! 4. With a field scope, every unit targets that field. Without one, each
//!    unit becomes a `Should` disjunction across all schema fields.
//! 5. Units combine with implicit AND (`Must`): a document matches when
//!    every unit matches, each in at least one of its fields. This is the
//!    conventional multi-field AND-of-ORs precedence.

use std::sync::Arc;

use crate::analysis::Token;
use crate::error::{JavelinError, Result};
use crate::query::boolean::{BooleanQuery, BooleanQueryBuilder};
use crate::query::phrase::PhraseQuery;
use crate::query::term::TermQuery;
use crate::query::Query;
use crate::schema::Schema;

/// Marker introducing the result-count directive.
pub const LIMIT_MARKER: &str = ".limit";

/// The outcome of parsing: the query tree plus the optional limit the
/// query string carried.
pub struct ParsedQuery {
    /// The structured query.
    pub query: Box<dyn Query>,
    /// Limit extracted from a `.limit <n>` directive, if present.
    pub limit_override: Option<usize>,
}

impl std::fmt::Debug for ParsedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedQuery")
            .field("query", &self.query.description())
            .field("limit_override", &self.limit_override)
            .finish()
    }
}

/// A lexical unit of the query string.
#[derive(Debug, PartialEq)]
enum Unit {
    Word(String),
    Phrase(String),
}

/// Parses query strings against a schema.
#[derive(Clone)]
pub struct QueryParser {
    schema: Arc<Schema>,
}

impl std::fmt::Debug for QueryParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryParser")
            .field("schema", &self.schema)
            .finish()
    }
}

impl QueryParser {
    /// Create a parser over the given schema.
    pub fn new(schema: Arc<Schema>) -> Self {
        QueryParser { schema }
    }

    /// Parse a query string, optionally scoped to a single field.
    ///
    /// Fails with `EmptyQuery` when the string is empty after scope/limit
    /// stripping, with `Parse` on unbalanced quotes or an unknown scope
    /// field, and with `InvalidLimit` on a bad `.limit` directive.
    pub fn parse(&self, input: &str, field_scope: Option<&str>) -> Result<ParsedQuery> {
        let (text, limit_override) = strip_limit(input)?;

        if let Some(scope) = field_scope {
            if !self.schema.has_field(scope) {
                return Err(JavelinError::parse(scope, "unknown field scope"));
            }
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(JavelinError::EmptyQuery);
        }

        let units = scan_units(text)?;
        if units.is_empty() {
            return Err(JavelinError::EmptyQuery);
        }

        let mut unit_queries: Vec<Box<dyn Query>> = Vec::new();
        for unit in &units {
            let query = match field_scope {
                Some(field) => self.unit_query(field, unit)?,
                None => self.multi_field_query(unit)?,
            };
            if let Some(query) = query {
                unit_queries.push(query);
            }
        }

        // Every unit was removed by analysis (all stop words): a valid
        // query that matches nothing.
        let query: Box<dyn Query> = match unit_queries.len() {
            0 => Box::new(BooleanQuery::new()),
            1 => unit_queries.remove(0),
            _ => {
                let mut builder = BooleanQueryBuilder::new();
                for query in unit_queries {
                    builder = builder.must(query);
                }
                Box::new(builder.build())
            }
        };

        log::debug!("parsed '{input}' into {}", query.description());
        Ok(ParsedQuery {
            query,
            limit_override,
        })
    }

    /// Compile one unit against one field, normalizing through the field's
    /// analyzer. Returns `None` when analysis leaves nothing.
    fn unit_query(&self, field: &str, unit: &Unit) -> Result<Option<Box<dyn Query>>> {
        let analyzer = self
            .schema
            .analyzer(field)
            .ok_or_else(|| JavelinError::schema(format!("field '{field}' has no analyzer")))?;

        let text = match unit {
            Unit::Word(word) => word,
            Unit::Phrase(phrase) => phrase,
        };
        let tokens: Vec<Token> = analyzer.analyze(text)?.collect();

        Ok(match (unit, tokens.len()) {
            (_, 0) => None,
            (_, 1) => Some(Box::new(TermQuery::new(field, tokens[0].text.clone()))),
            (Unit::Word(_), _) => {
                // One word analyzed into several terms ("jean's"): all of
                // them are required.
                let mut builder = BooleanQueryBuilder::new();
                for token in tokens {
                    builder = builder.must(Box::new(TermQuery::new(field, token.text)));
                }
                Some(Box::new(builder.build()))
            }
            (Unit::Phrase(_), _) => {
                let terms = tokens
                    .into_iter()
                    .map(|t| (t.text, t.position as u32))
                    .collect();
                Some(Box::new(PhraseQuery::with_positions(field, terms)))
            }
        })
    }

    /// Compile one unit as a `Should` disjunction across all schema fields.
    fn multi_field_query(&self, unit: &Unit) -> Result<Option<Box<dyn Query>>> {
        let mut per_field: Vec<Box<dyn Query>> = Vec::new();
        for field in self.schema.field_names() {
            if let Some(query) = self.unit_query(field, unit)? {
                per_field.push(query);
            }
        }

        Ok(match per_field.len() {
            0 => None,
            1 => Some(per_field.remove(0)),
            _ => {
                let mut builder = BooleanQueryBuilder::new();
                for query in per_field {
                    builder = builder.should(query);
                }
                Some(Box::new(builder.build()))
            }
        })
    }
}

/// Split a trailing `.limit <n>` directive off the query text.
fn strip_limit(input: &str) -> Result<(&str, Option<usize>)> {
    let Some(pos) = input.find(LIMIT_MARKER) else {
        return Ok((input, None));
    };

    let text = &input[..pos];
    let value = input[pos + LIMIT_MARKER.len()..].trim();
    if value.is_empty() {
        return Err(JavelinError::invalid_limit(format!(
            "missing value after {LIMIT_MARKER}"
        )));
    }

    let limit: i64 = value
        .parse()
        .map_err(|_| JavelinError::invalid_limit(format!("'{value}' is not an integer")))?;
    if limit < 1 {
        return Err(JavelinError::invalid_limit(format!(
            "{limit} (must be at least 1)"
        )));
    }

    Ok((text, Some(limit as usize)))
}

/// Split query text into words and quoted phrases.
fn scan_units(text: &str) -> Result<Vec<Unit>> {
    let mut units = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch == '"' {
            chars.next();
            let mut phrase = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                phrase.push(c);
            }
            if !closed {
                return Err(JavelinError::parse(
                    format!("\"{phrase}"),
                    "unbalanced quote",
                ));
            }
            if !phrase.trim().is_empty() {
                units.push(Unit::Phrase(phrase));
            }
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '"' {
                    break;
                }
                word.push(c);
                chars.next();
            }
            units.push(Unit::Word(word));
        }
    }

    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::product_schema;

    fn parser() -> QueryParser {
        QueryParser::new(Arc::new(product_schema(None).unwrap()))
    }

    #[test]
    fn test_empty_query_rejected() {
        match parser().parse("", None) {
            Err(JavelinError::EmptyQuery) => {}
            other => panic!("expected EmptyQuery, got {other:?}"),
        }

        match parser().parse("   ", Some("title")) {
            Err(JavelinError::EmptyQuery) => {}
            other => panic!("expected EmptyQuery, got {other:?}"),
        }
    }

    #[test]
    fn test_limit_directive_strips_to_empty() {
        match parser().parse(".limit 5", None) {
            Err(JavelinError::EmptyQuery) => {}
            other => panic!("expected EmptyQuery, got {other:?}"),
        }
    }

    #[test]
    fn test_scoped_term() {
        let parsed = parser().parse("jeans", Some("title")).unwrap();

        assert_eq!(parsed.query.description(), "title:jean");
        assert!(parsed.limit_override.is_none());
    }

    #[test]
    fn test_unknown_scope_rejected() {
        match parser().parse("jeans", Some("brand")) {
            Err(JavelinError::Parse { token, .. }) => assert_eq!(token, "brand"),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_scoped_terms_combine_with_and() {
        let parsed = parser().parse("blue jeans", Some("title")).unwrap();

        assert_eq!(parsed.query.description(), "(+title:blue +title:jean)");
    }

    #[test]
    fn test_unscoped_term_spans_fields() {
        let parsed = parser().parse("jeans", None).unwrap();

        assert_eq!(
            parsed.query.description(),
            "(description:jean title:jean merchant:jean)"
        );
    }

    #[test]
    fn test_unscoped_precedence_is_and_of_ors() {
        let parsed = parser().parse("blue jeans", None).unwrap();

        assert_eq!(
            parsed.query.description(),
            "(+(description:blue title:blue merchant:blue) \
             +(description:jean title:jean merchant:jean))"
        );
    }

    #[test]
    fn test_limit_directive() {
        let parsed = parser().parse("jean .limit 10", Some("title")).unwrap();

        assert_eq!(parsed.limit_override, Some(10));
        assert_eq!(parsed.query.description(), "title:jean");
    }

    #[test]
    fn test_limit_directive_invalid_values() {
        for input in [
            "jean .limit 0",
            "jean .limit -1",
            "jean .limit ten",
            "jean .limit",
            "jean .limit 2 3",
        ] {
            match parser().parse(input, None) {
                Err(JavelinError::InvalidLimit(_)) => {}
                other => panic!("expected InvalidLimit for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_phrase_unit() {
        let parsed = parser().parse("\"blue jeans\"", Some("title")).unwrap();

        assert_eq!(parsed.query.description(), "title:\"blue jean\"");
    }

    #[test]
    fn test_single_word_phrase_degrades_to_term() {
        let parsed = parser().parse("\"jeans\"", Some("title")).unwrap();

        assert_eq!(parsed.query.description(), "title:jean");
    }

    #[test]
    fn test_unbalanced_quote_rejected() {
        match parser().parse("\"blue jeans", Some("title")) {
            Err(JavelinError::Parse { token, .. }) => assert!(token.starts_with('"')),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_stop_word_only_query_matches_nothing() {
        let parsed = parser().parse("the and", Some("title")).unwrap();

        // Not an error: a valid query with no clauses.
        assert_eq!(parsed.query.description(), "()");
    }

    #[test]
    fn test_apostrophe_word_requires_all_tokens() {
        let parsed = parser().parse("jean's", Some("merchant")).unwrap();

        assert_eq!(parsed.query.description(), "(+merchant:jean +merchant:s)");
    }

    #[test]
    fn test_scan_units() {
        let units = scan_units("blue \"jean jacket\" denim").unwrap();

        assert_eq!(
            units,
            vec![
                Unit::Word("blue".to_string()),
                Unit::Phrase("jean jacket".to_string()),
                Unit::Word("denim".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_terms_are_analyzed_like_documents() {
        // Uppercase, inflected query text normalizes to the indexed form.
        let parsed = parser().parse("RUNNING", Some("title")).unwrap();
        assert_eq!(parsed.query.description(), "title:run");
    }
}
