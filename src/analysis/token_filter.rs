//! Token filter implementations.
//!
//! Filters transform a [`TokenStream`] into another: lowercasing text,
//! removing stop words, stemming. They are chained by
//! [`PipelineAnalyzer`](crate::analysis::analyzer::PipelineAnalyzer) in the
//! order they were added.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait TokenFilter: Send + Sync {
    /// Apply this filter to the given token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter.
    fn name(&self) -> &'static str;
}

/// Default English stop words.
///
/// Common words that are filtered out during indexing because they carry
/// little search relevance.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Default English stop words as a HashSet.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_ENGLISH_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// A filter that lowercases token text.
#[derive(Debug, Clone, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl TokenFilter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered: Vec<Token> = tokens
            .map(|token| {
                if token.is_stopped() {
                    token
                } else {
                    let lowered = token.text.to_lowercase();
                    token.with_text(lowered)
                }
            })
            .collect();

        Ok(Box::new(filtered.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

/// A filter that removes stop words from the token stream.
///
/// Removal keeps the surviving tokens' original positions, so phrase
/// matching sees a positional gap where a stop word used to be.
#[derive(Debug, Clone)]
pub struct StopFilter {
    stop_words: HashSet<String>,
}

impl StopFilter {
    /// Create a stop filter with the default English word list.
    pub fn new() -> Self {
        StopFilter {
            stop_words: DEFAULT_ENGLISH_STOP_WORDS_SET.clone(),
        }
    }

    /// Create a stop filter from a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: words.into_iter().map(|w| w.into()).collect(),
        }
    }

    /// Check whether a word is on the stop list.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenFilter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered: Vec<Token> = tokens
            .filter(|token| token.is_stopped() || !self.stop_words.contains(&token.text))
            .collect();

        Ok(Box::new(filtered.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
