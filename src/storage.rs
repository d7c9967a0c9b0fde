//! Storage abstraction for index persistence.
//!
//! The index reads and writes named files through the [`Storage`] trait,
//! which keeps the index format independent of where the bytes live.
//! [`file::FileStorage`] is the production backend; [`memory::MemoryStorage`]
//! backs tests. `rename_file` is the atomic-publish primitive the commit
//! protocol relies on.

pub mod file;
pub mod memory;

use std::io::{Read, Write};

use crate::error::Result;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// A trait for storage backends that can store and retrieve named files.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Open a file for reading.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    /// Create a file for writing, truncating any existing content.
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    /// Check if a file exists.
    fn file_exists(&self, name: &str) -> bool;

    /// List all files in the storage.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Delete a file.
    fn delete_file(&self, name: &str) -> Result<()>;

    /// Rename a file, replacing any file at the new name atomically.
    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()>;

    /// Sync all pending writes to durable storage.
    fn sync(&self) -> Result<()>;
}

/// A readable stream from storage.
pub trait StorageInput: Read + Send + std::fmt::Debug {
    /// Get the size of the input stream in bytes.
    fn size(&self) -> Result<u64>;
}

/// A writable stream into storage.
pub trait StorageOutput: Write + Send + std::fmt::Debug {
    /// Flush buffered data and make the file durable.
    fn close(&mut self) -> Result<()>;
}

/// Read a whole storage file into a byte vector.
pub fn read_to_vec(storage: &dyn Storage, name: &str) -> Result<Vec<u8>> {
    let mut input = storage.open_input(name)?;
    let mut data = Vec::new();
    input.read_to_end(&mut data)?;
    Ok(data)
}

/// Write a byte slice to a storage file and close it.
pub fn write_all(storage: &dyn Storage, name: &str, data: &[u8]) -> Result<()> {
    let mut output = storage.create_output(name)?;
    output.write_all(data)?;
    output.close()
}
