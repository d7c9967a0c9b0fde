//! Text analysis pipeline.
//!
//! Turns raw field text into normalized index terms. The pipeline is
//! tokenize → lowercase → stop-word removal → stemming, assembled by
//! [`StemmingAnalyzer`]; the same pipeline runs at index time and query
//! time.

pub mod analyzer;
pub mod stemmer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, StemmingAnalyzer};
pub use stemmer::{CachingStemmer, PorterStemmer, StemFilter, Stemmer, DEFAULT_STEM_CACHE_SIZE};
pub use token::{Token, TokenStream};
pub use token_filter::{LowercaseFilter, StopFilter, TokenFilter};
pub use tokenizer::{RegexTokenizer, Tokenizer};
