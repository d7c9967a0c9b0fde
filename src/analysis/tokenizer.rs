//! Tokenizer implementations.

use std::sync::Arc;

use regex::Regex;

use crate::analysis::token::{Token, TokenStream};
use crate::error::{JavelinError, Result};

/// Trait for tokenizers that split raw text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Split the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer.
    fn name(&self) -> &'static str;
}

/// A regex-based tokenizer that extracts tokens matching a pattern.
///
/// The default pattern `\w+` splits on non-alphanumeric boundaries, which is
/// the behavior the rest of the pipeline assumes.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Arc<Regex>,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer with the default `\w+` pattern.
    pub fn new() -> Result<Self> {
        Self::with_pattern(r"\w+")
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| JavelinError::analysis(format!("invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
        })
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        Self::new().expect("default regex pattern should be valid")
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .pattern
            .find_iter(text)
            .enumerate()
            .map(|(position, mat)| {
                Token::with_offsets(mat.as_str(), position, mat.start(), mat.end())
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}
