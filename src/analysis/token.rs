//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows through the analysis pipeline: the
//! tokenizer produces them, filters transform or drop them, and the index
//! writer consumes them.

use serde::{Deserialize, Serialize};

/// A single unit of text after tokenization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token.
    pub text: String,

    /// The position of the token in the original token stream (0-based).
    pub position: usize,

    /// The byte offset where this token starts in the original text.
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text.
    pub end_offset: usize,

    /// Whether a filter marked this token for removal.
    pub stopped: bool,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        let text = text.into();
        let end_offset = text.len();
        Token {
            text,
            position,
            start_offset: 0,
            end_offset,
            stopped: false,
        }
    }

    /// Create a new token with explicit byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            stopped: false,
        }
    }

    /// Replace the token text, keeping position and offsets.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    /// Check whether this token is marked as stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

/// A boxed iterator of tokens, the currency of the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;
