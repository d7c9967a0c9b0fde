//! Analyzer trait and the standard pipelines.
//!
//! An analyzer is the complete text-processing pipeline from raw field text
//! to index terms. The same analyzer instance runs at index time and query
//! time, which is what guarantees that query terms can match indexed terms.

use std::sync::Arc;

use crate::analysis::stemmer::StemFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{LowercaseFilter, StopFilter, TokenFilter};
use crate::analysis::tokenizer::{RegexTokenizer, Tokenizer};
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Implementations must be deterministic: analyzing the same text twice
/// yields the same token sequence. Each call returns a fresh, finite stream;
/// the only state an analyzer may mutate is an internal memo cache.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer.
    fn name(&self) -> &'static str;
}

/// A configurable analyzer combining a tokenizer with a chain of filters.
///
/// Filters run in the order they were added.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn TokenFilter>>,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Get the tokenizer used by this analyzer.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn TokenFilter>] {
        &self.filters
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filter_names: Vec<&str> = self.filters.iter().map(|fl| fl.name()).collect();
        f.debug_struct("PipelineAnalyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field("filters", &filter_names)
            .finish()
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;

        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

/// The stock analyzer: tokenize on word boundaries, lowercase, drop English
/// stop words, stem with a cached Porter stemmer.
///
/// This is the analyzer every product field uses.
pub struct StemmingAnalyzer {
    inner: PipelineAnalyzer,
}

impl StemmingAnalyzer {
    /// Create a stemming analyzer with the default stem-cache capacity.
    pub fn new() -> Result<Self> {
        Self::with_cache_size(Some(crate::analysis::stemmer::DEFAULT_STEM_CACHE_SIZE))
    }

    /// Create a stemming analyzer with an explicit stem-cache capacity
    /// (`None` = unbounded).
    pub fn with_cache_size(capacity: Option<usize>) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let inner = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StopFilter::new()))
            .add_filter(Arc::new(StemFilter::with_cache_size(capacity)));

        Ok(StemmingAnalyzer { inner })
    }
}

impl std::fmt::Debug for StemmingAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemmingAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}

impl Analyzer for StemmingAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "stemming"
    }
}
