//! High-level engine tying the index, parser and searcher together.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::document::Document;
use crate::error::{JavelinError, Result};
use crate::index::{IndexBuilder, IndexConfig, InvertedIndex};
use crate::query::QueryParser;
use crate::schema::Schema;
use crate::search::searcher::Searcher;
use crate::search::ResultSet;

/// Default number of hits returned when no limit is given.
pub const DEFAULT_LIMIT: usize = 3;

/// The engine facade: owns the index and serves self-contained search
/// requests.
///
/// Scope and limit travel as per-request parameters — there is no current
/// default field or session limit mutated between requests. Each request
/// opens a fresh reader snapshot and drops it on return, error or not.
pub struct SearchEngine {
    index: InvertedIndex,
    parser: QueryParser,
    default_limit: usize,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("index", &self.index)
            .field("default_limit", &self.default_limit)
            .finish()
    }
}

impl SearchEngine {
    /// Wrap an index in an engine.
    pub fn new(index: InvertedIndex) -> Self {
        let parser = QueryParser::new(Arc::clone(index.schema()));
        SearchEngine {
            index,
            parser,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Override the default result limit.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Create a new engine over a fresh index in a directory.
    pub fn create_in_dir<P: AsRef<Path>>(dir: P, schema: Schema) -> Result<Self> {
        Ok(SearchEngine::new(InvertedIndex::create_in_dir(dir, schema)?))
    }

    /// Open an engine over an existing index in a directory.
    pub fn open_in_dir<P: AsRef<Path>>(dir: P, config: IndexConfig) -> Result<Self> {
        Ok(SearchEngine::new(InvertedIndex::open_in_dir(dir, config)?))
    }

    /// Open the index at `dir`, creating it when absent or uninitialized.
    ///
    /// Returns the engine and whether the index was freshly created — the
    /// caller uses that flag to trigger the one-time bulk build.
    pub fn open_or_create_in_dir<P: AsRef<Path>>(
        dir: P,
        schema: Schema,
        config: IndexConfig,
    ) -> Result<(Self, bool)> {
        match InvertedIndex::open_in_dir(&dir, config) {
            Ok(index) => Ok((SearchEngine::new(index), false)),
            Err(JavelinError::EmptyIndex(_)) => {
                log::info!("no committed index found, creating a fresh one");
                let index = InvertedIndex::create_in_dir(&dir, schema)?;
                Ok((SearchEngine::new(index), true))
            }
            Err(e) => Err(e),
        }
    }

    /// The underlying index.
    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Number of committed documents.
    pub fn doc_count(&self) -> u64 {
        self.index.doc_count()
    }

    /// Bulk-ingest a record collection (one commit).
    pub fn build<I>(&self, records: I) -> Result<u64>
    where
        I: IntoIterator<Item = Document>,
    {
        IndexBuilder::new(&self.index).build(records)
    }

    /// Serve one search request.
    ///
    /// `query_str` may carry a `.limit <n>` directive, which wins over
    /// `limit_override`; with neither, the engine default applies.
    /// Parser errors (`EmptyQuery`, `Parse`, `InvalidLimit`) propagate to
    /// the caller untouched.
    pub fn search_request(
        &self,
        query_str: &str,
        field_scope: Option<&str>,
        limit_override: Option<usize>,
    ) -> Result<ResultSet> {
        let parsed = self.parser.parse(query_str, field_scope)?;
        let limit = parsed
            .limit_override
            .or(limit_override)
            .unwrap_or(self.default_limit);

        // Reader acquired here, released when the searcher drops — on both
        // the success and error paths.
        let searcher = Searcher::new(self.index.reader()?);
        searcher.search(parsed.query.as_ref(), limit)
    }

    /// Fetch the stored fields of a document for display.
    pub fn doc(&self, doc_id: u64) -> Result<Option<HashMap<String, String>>> {
        let reader = self.index.reader()?;
        Ok(reader.stored_fields(doc_id).cloned())
    }
}
