//! Error types for the Javelin library.
//!
//! All fallible operations return [`Result`], an alias over [`JavelinError`].
//! The enum covers both the domain outcomes callers are expected to branch on
//! (`AlreadyExists`, `EmptyIndex`, `Parse`, `EmptyQuery`, `InvalidLimit`) and
//! infrastructure failures (I/O, storage, serialization, corruption).

use std::io;

use thiserror::Error;

/// The main error type for Javelin operations.
#[derive(Error, Debug)]
pub enum JavelinError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An index already exists at the target location.
    #[error("index already exists: {0}")]
    AlreadyExists(String),

    /// The target location exists but holds no committed index.
    #[error("empty index: {0}")]
    EmptyIndex(String),

    /// Index-related errors other than the two outcomes above.
    #[error("index error: {0}")]
    Index(String),

    /// Schema-related errors.
    #[error("schema error: {0}")]
    Schema(String),

    /// Analysis-related errors (tokenization, filtering).
    #[error("analysis error: {0}")]
    Analysis(String),

    /// Query string could not be parsed; carries the offending token.
    #[error("parse error at '{token}': {message}")]
    Parse {
        /// The token that triggered the failure.
        token: String,
        /// Human-readable description of the failure.
        message: String,
    },

    /// The query string was empty after scope/limit stripping.
    #[error("empty query")]
    EmptyQuery,

    /// A result limit was missing, non-numeric, or not positive.
    #[error("invalid limit: {0}")]
    InvalidLimit(String),

    /// Storage-related errors.
    #[error("storage error: {0}")]
    Storage(String),

    /// Persisted data failed an integrity check.
    #[error("corrupt index data: {0}")]
    Corrupt(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with [`JavelinError`].
pub type Result<T> = std::result::Result<T, JavelinError>;

impl JavelinError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        JavelinError::Index(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        JavelinError::Schema(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        JavelinError::Analysis(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        JavelinError::Storage(msg.into())
    }

    /// Create a new corruption error.
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        JavelinError::Corrupt(msg.into())
    }

    /// Create a new parse error carrying the offending token.
    pub fn parse<T: Into<String>, M: Into<String>>(token: T, message: M) -> Self {
        JavelinError::Parse {
            token: token.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid limit error.
    pub fn invalid_limit<S: Into<String>>(msg: S) -> Self {
        JavelinError::InvalidLimit(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = JavelinError::index("segment missing");
        assert_eq!(error.to_string(), "index error: segment missing");

        let error = JavelinError::storage("directory vanished");
        assert_eq!(error.to_string(), "storage error: directory vanished");

        let error = JavelinError::parse("merchnt", "unknown field");
        assert_eq!(error.to_string(), "parse error at 'merchnt': unknown field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = JavelinError::from(io_error);

        match error {
            JavelinError::Io(_) => {}
            _ => panic!("expected IO error variant"),
        }
    }

    #[test]
    fn test_domain_variants_display() {
        assert_eq!(
            JavelinError::AlreadyExists("ix".to_string()).to_string(),
            "index already exists: ix"
        );
        assert_eq!(JavelinError::EmptyQuery.to_string(), "empty query");
        assert_eq!(
            JavelinError::InvalidLimit("0".to_string()).to_string(),
            "invalid limit: 0"
        );
    }
}
