//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for the search application.
///
/// Loaded from a JSON file; every key is optional and falls back to the
/// default below. Command-line flags override file values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the product collection (a JSON array of records).
    pub data_file: PathBuf,

    /// Directory holding the persisted index.
    pub index_dir: PathBuf,

    /// Capacity of the stemming memo cache. `null` in the file means
    /// unbounded — the cache then grows with the vocabulary, so only use it
    /// on trusted, finite collections.
    pub stem_cache_size: Option<usize>,

    /// Result limit applied when a query carries no `.limit` directive.
    pub default_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_file: PathBuf::from("products.json"),
            index_dir: PathBuf::from("index"),
            stem_cache_size: Some(crate::analysis::DEFAULT_STEM_CACHE_SIZE),
            default_limit: crate::search::engine::DEFAULT_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Load from `path` when given and present, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                log::warn!("config file {} not found, using defaults", path.display());
                Ok(AppConfig::default())
            }
            None => Ok(AppConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.data_file, PathBuf::from("products.json"));
        assert_eq!(config.default_limit, 3);
        assert!(config.stem_cache_size.is_some());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_limit": 10}}"#).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.index_dir, PathBuf::from("index"));
    }

    #[test]
    fn test_null_cache_size_means_unbounded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"stem_cache_size": null}}"#).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.stem_cache_size, None);
    }

    #[test]
    fn test_load_or_default_missing_path() {
        let config =
            AppConfig::load_or_default(Some(Path::new("/nonexistent/javelin.json"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(AppConfig::load(file.path()).is_err());
    }
}
