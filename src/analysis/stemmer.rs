//! Stemming for reducing words to their root forms.
//!
//! The [`PorterStemmer`] implements a simplified Porter algorithm for
//! English. Because the same analyzer runs at index time and query time,
//! stemming is on the hot path for both; [`CachingStemmer`] memoizes
//! results behind a bounded cache so repeated catalog vocabulary is stemmed
//! once.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::TokenFilter;
use crate::error::Result;

/// Default capacity for the stemming memo cache.
pub const DEFAULT_STEM_CACHE_SIZE: usize = 50_000;

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// Porter stemming algorithm implementation.
///
/// A simplified version of the Porter algorithm: five suffix-stripping steps
/// gated on the "measure" (count of vowel-consonant patterns) of the
/// candidate stem. Words of two characters or fewer, and non-ASCII words,
/// pass through lowercased but otherwise untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let word = word.to_lowercase();
        if word.len() <= 2 || !word.is_ascii() {
            return word;
        }

        let word = step1a(&word);
        let word = step1b(&word);
        let word = step2(&word);
        let word = step3(&word);
        let word = step4(&word);
        step5(&word)
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}

fn is_vowel(word: &[u8], pos: usize) -> bool {
    match word[pos] {
        b'a' | b'e' | b'i' | b'o' | b'u' => true,
        b'y' => pos > 0 && !is_vowel(word, pos - 1),
        _ => false,
    }
}

/// Count of vowel-consonant patterns in the word.
fn measure(word: &str) -> usize {
    let bytes = word.as_bytes();
    let n = bytes.len();
    let mut m = 0;
    let mut i = 0;

    while i < n && !is_vowel(bytes, i) {
        i += 1;
    }

    while i < n {
        while i < n && is_vowel(bytes, i) {
            i += 1;
        }
        if i >= n {
            break;
        }
        m += 1;
        while i < n && !is_vowel(bytes, i) {
            i += 1;
        }
    }

    m
}

fn has_vowel(word: &str) -> bool {
    let bytes = word.as_bytes();
    (0..bytes.len()).any(|i| is_vowel(bytes, i))
}

fn ends_double_consonant(word: &str) -> bool {
    let bytes = word.as_bytes();
    let n = bytes.len();
    n >= 2 && bytes[n - 1] == bytes[n - 2] && !is_vowel(bytes, n - 1)
}

/// Consonant-vowel-consonant ending where the final consonant is not w, x, y.
fn ends_cvc(word: &str) -> bool {
    let bytes = word.as_bytes();
    let n = bytes.len();
    n >= 3
        && !is_vowel(bytes, n - 3)
        && is_vowel(bytes, n - 2)
        && !is_vowel(bytes, n - 1)
        && !matches!(bytes[n - 1], b'w' | b'x' | b'y')
}

/// Strip `suffix` and append `replacement` when the remaining stem has at
/// least `min_measure` vowel-consonant patterns.
fn replace_suffix(word: &str, suffix: &str, replacement: &str, min_measure: usize) -> String {
    if let Some(stem) = word.strip_suffix(suffix) {
        if measure(stem) >= min_measure {
            return format!("{stem}{replacement}");
        }
    }
    word.to_string()
}

fn step1a(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("sses") {
        format!("{stem}ss")
    } else if let Some(stem) = word.strip_suffix("ies") {
        format!("{stem}i")
    } else if word.ends_with("ss") {
        word.to_string()
    } else if word.len() > 1 && word.ends_with('s') {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

fn step1b(word: &str) -> String {
    let stripped = if word.ends_with("eed") {
        replace_suffix(word, "eed", "ee", 1)
    } else if let Some(stem) = word.strip_suffix("ed") {
        if has_vowel(stem) {
            stem.to_string()
        } else {
            word.to_string()
        }
    } else if let Some(stem) = word.strip_suffix("ing") {
        if has_vowel(stem) {
            stem.to_string()
        } else {
            word.to_string()
        }
    } else {
        word.to_string()
    };

    if stripped == word {
        return stripped;
    }

    // Cleanup after removing "ed"/"ing".
    if stripped.ends_with("at") || stripped.ends_with("bl") || stripped.ends_with("iz") {
        format!("{stripped}e")
    } else if ends_double_consonant(&stripped)
        && !stripped.ends_with(['l', 's', 'z'])
    {
        stripped[..stripped.len() - 1].to_string()
    } else if measure(&stripped) == 1 && ends_cvc(&stripped) {
        format!("{stripped}e")
    } else {
        stripped
    }
}

const STEP2_SUFFIXES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("abli", "able"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
];

fn step2(word: &str) -> String {
    for (suffix, replacement) in STEP2_SUFFIXES {
        if word.ends_with(suffix) {
            return replace_suffix(word, suffix, replacement, 1);
        }
    }
    word.to_string()
}

const STEP3_SUFFIXES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

fn step3(word: &str) -> String {
    for (suffix, replacement) in STEP3_SUFFIXES {
        if word.ends_with(suffix) {
            return replace_suffix(word, suffix, replacement, 1);
        }
    }
    word.to_string()
}

const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

fn step4(word: &str) -> String {
    for suffix in STEP4_SUFFIXES {
        if let Some(stem) = word.strip_suffix(suffix) {
            if measure(stem) > 1 {
                // "ion" only strips after s or t.
                if *suffix != "ion" || stem.ends_with('s') || stem.ends_with('t') {
                    return stem.to_string();
                }
            }
            return word.to_string();
        }
    }
    word.to_string()
}

fn step5(word: &str) -> String {
    let word = if let Some(stem) = word.strip_suffix('e') {
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            stem.to_string()
        } else {
            word.to_string()
        }
    } else {
        word.to_string()
    };

    if word.ends_with("ll") && measure(&word) > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word
    }
}

/// A memoizing wrapper around a [`Stemmer`].
///
/// Results are cached keyed by the input token. `capacity` bounds the cache;
/// once full, new entries are no longer admitted and stemming falls through
/// to the wrapped algorithm. A capacity of `None` disables the bound — that
/// reproduces the classic "cachesize = -1" configuration and will grow with
/// the input vocabulary, so it should only be used on trusted, finite
/// collections.
pub struct CachingStemmer {
    inner: Box<dyn Stemmer>,
    cache: Mutex<HashMap<String, String>>,
    capacity: Option<usize>,
}

impl std::fmt::Debug for CachingStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingStemmer")
            .field("inner", &self.inner.name())
            .field("capacity", &self.capacity)
            .field("len", &self.cache.lock().len())
            .finish()
    }
}

impl CachingStemmer {
    /// Wrap a stemmer with a memo cache of the given capacity.
    pub fn new(inner: Box<dyn Stemmer>, capacity: Option<usize>) -> Self {
        CachingStemmer {
            inner,
            cache: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// A cached Porter stemmer.
    pub fn porter(capacity: Option<usize>) -> Self {
        Self::new(Box::new(PorterStemmer::new()), capacity)
    }

    /// Number of entries currently cached.
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }
}

impl Stemmer for CachingStemmer {
    fn stem(&self, word: &str) -> String {
        let mut cache = self.cache.lock();
        if let Some(stemmed) = cache.get(word) {
            return stemmed.clone();
        }

        let stemmed = self.inner.stem(word);
        let has_room = match self.capacity {
            Some(cap) => cache.len() < cap,
            None => true,
        };
        if has_room {
            cache.insert(word.to_string(), stemmed.clone());
        }

        stemmed
    }

    fn name(&self) -> &'static str {
        "caching"
    }
}

/// Filter that applies stemming to every non-stopped token.
pub struct StemFilter {
    stemmer: Box<dyn Stemmer>,
}

impl std::fmt::Debug for StemFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemFilter")
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl StemFilter {
    /// Create a stem filter with a cached Porter stemmer of default capacity.
    pub fn new() -> Self {
        Self::with_cache_size(Some(DEFAULT_STEM_CACHE_SIZE))
    }

    /// Create a stem filter with a cached Porter stemmer of the given
    /// capacity (`None` = unbounded).
    pub fn with_cache_size(capacity: Option<usize>) -> Self {
        StemFilter {
            stemmer: Box::new(CachingStemmer::porter(capacity)),
        }
    }

    /// Create a stem filter with a custom stemmer.
    pub fn with_stemmer(stemmer: Box<dyn Stemmer>) -> Self {
        StemFilter { stemmer }
    }
}

impl Default for StemFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenFilter for StemFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered: Vec<Token> = tokens
            .map(|token| {
                if token.is_stopped() {
                    token
                } else {
                    let stemmed = self.stemmer.stem(&token.text);
                    token.with_text(stemmed)
                }
            })
            .collect();

        Ok(Box::new(filtered.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_porter_stemmer() {
        let stemmer = PorterStemmer::new();

        assert_eq!(stemmer.stem("running"), "run");
        assert_eq!(stemmer.stem("jeans"), "jean");
        assert_eq!(stemmer.stem("flies"), "fli");
        assert_eq!(stemmer.stem("agreed"), "agre");
        assert_eq!(stemmer.stem("itemization"), "item");
        assert_eq!(stemmer.stem("traditional"), "tradit");
    }

    #[test]
    fn test_porter_idempotent_on_stems() {
        let stemmer = PorterStemmer::new();

        for word in ["jean", "run", "furnitur", "jacket"] {
            assert_eq!(stemmer.stem(word), word, "stem of {word} changed");
        }
    }

    #[test]
    fn test_porter_short_and_non_ascii() {
        let stemmer = PorterStemmer::new();

        assert_eq!(stemmer.stem("Is"), "is");
        assert_eq!(stemmer.stem("café"), "café");
    }

    #[test]
    fn test_porter_measure() {
        assert_eq!(measure("tree"), 0);
        assert_eq!(measure("trees"), 1);
        assert_eq!(measure("trouble"), 1);
        assert_eq!(measure("troubles"), 2);
    }

    #[test]
    fn test_vowel_detection() {
        let word = "trouble".as_bytes();

        assert!(!is_vowel(word, 0)); // t
        assert!(!is_vowel(word, 1)); // r
        assert!(is_vowel(word, 2)); // o
        assert!(is_vowel(word, 3)); // u
        assert!(!is_vowel(word, 4)); // b
        assert!(!is_vowel(word, 5)); // l
        assert!(is_vowel(word, 6)); // e
    }

    #[test]
    fn test_caching_stemmer_bounded() {
        let stemmer = CachingStemmer::porter(Some(2));

        assert_eq!(stemmer.stem("running"), "run");
        assert_eq!(stemmer.stem("jeans"), "jean");
        assert_eq!(stemmer.cached_entries(), 2);

        // Cache is full: result is still correct, entry is not admitted.
        assert_eq!(stemmer.stem("flies"), "fli");
        assert_eq!(stemmer.cached_entries(), 2);

        // Cached entries keep answering.
        assert_eq!(stemmer.stem("running"), "run");
    }

    #[test]
    fn test_caching_stemmer_unbounded() {
        let stemmer = CachingStemmer::porter(None);

        for word in ["one", "two", "three", "four"] {
            stemmer.stem(word);
        }
        assert_eq!(stemmer.cached_entries(), 4);
    }

    #[test]
    fn test_stem_filter() {
        let filter = StemFilter::new();
        let tokens = vec![
            Token::new("running", 0),
            Token::new("jeans", 1),
            Token::new("test", 2).stop(),
        ];

        let result: Vec<Token> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].text, "run");
        assert_eq!(result[1].text, "jean");
        // Stopped tokens pass through unprocessed.
        assert_eq!(result[2].text, "test");
        assert!(result[2].is_stopped());
    }
}
