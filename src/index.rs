//! Persistent inverted index.
//!
//! The on-disk layout is a `meta.json` manifest (format version, committed
//! segment list, document count, field schema) plus one immutable segment
//! file per commit. A commit writes its segment, then atomically replaces
//! the manifest via temp-file + rename — readers observe either the old or
//! the new manifest, never a half-written one.

pub mod builder;
pub mod inverted;
pub mod reader;
pub mod segment;
pub mod writer;

use serde::{Deserialize, Serialize};

use crate::error::{JavelinError, Result};
use crate::schema::{FieldMeta, Schema};
use crate::storage::Storage;

pub use builder::IndexBuilder;
pub use inverted::{InvertedIndex, IndexConfig};
pub use reader::{IndexReader, TermInfo};
pub use segment::{FieldStats, Posting, Segment};
pub use writer::IndexWriter;

/// Name of the index manifest file.
pub const METADATA_FILE: &str = "meta.json";

const METADATA_TEMP_FILE: &str = "meta.json.tmp";

/// Current index format version.
pub const FORMAT_VERSION: u32 = 1;

/// The index manifest: everything needed to open the committed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Version of the index format.
    pub version: u32,

    /// Total number of committed documents.
    pub doc_count: u64,

    /// Generation number, incremented per commit.
    pub generation: u64,

    /// Committed segment files, in commit order.
    pub segments: Vec<String>,

    /// Persisted field schema.
    pub fields: Vec<FieldMeta>,
}

impl IndexMetadata {
    /// Fresh metadata for a newly created index.
    pub fn new(schema: &Schema) -> Self {
        IndexMetadata {
            version: FORMAT_VERSION,
            doc_count: 0,
            generation: 0,
            segments: Vec::new(),
            fields: schema.to_meta(),
        }
    }

    /// Load the manifest from storage.
    pub fn load(storage: &dyn Storage) -> Result<Self> {
        let data = crate::storage::read_to_vec(storage, METADATA_FILE)?;
        let meta: IndexMetadata = serde_json::from_slice(&data)?;

        if meta.version != FORMAT_VERSION {
            return Err(JavelinError::index(format!(
                "unsupported index format version {}",
                meta.version
            )));
        }

        Ok(meta)
    }

    /// Persist the manifest atomically: write a temp file, sync, rename over
    /// the live manifest.
    pub fn store(&self, storage: &dyn Storage) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)?;
        crate::storage::write_all(storage, METADATA_TEMP_FILE, &data)?;
        storage.rename_file(METADATA_TEMP_FILE, METADATA_FILE)?;
        storage.sync()
    }
}
