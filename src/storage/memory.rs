//! In-memory storage implementation for tests.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{JavelinError, Result};
use crate::storage::{Storage, StorageInput, StorageOutput};

type FileMap = Arc<RwLock<HashMap<String, Arc<[u8]>>>>;

/// An in-memory storage backend.
///
/// Writes become visible in the file map when the output is closed (or
/// dropped), which mirrors the publish-on-close behavior of the file
/// backend closely enough for the index tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: FileMap,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        MemoryStorage {
            files: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of files currently stored.
    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let files = self.files.read();
        let data = files
            .get(name)
            .cloned()
            .ok_or_else(|| JavelinError::storage(format!("file not found: {name}")))?;

        Ok(Box::new(MemoryInput {
            size: data.len() as u64,
            cursor: Cursor::new(data),
        }))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        Ok(Box::new(MemoryOutput {
            name: name.to_string(),
            buffer: Vec::new(),
            files: Arc::clone(&self.files),
            published: false,
        }))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files.read().contains_key(name)
    }

    fn list_files(&self) -> Result<Vec<String>> {
        Ok(self.files.read().keys().cloned().collect())
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.files.write().remove(name);
        Ok(())
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        let mut files = self.files.write();
        let data = files
            .remove(old_name)
            .ok_or_else(|| JavelinError::storage(format!("file not found: {old_name}")))?;
        files.insert(new_name.to_string(), data);
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct MemoryInput {
    cursor: Cursor<Arc<[u8]>>,
    size: u64,
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

#[derive(Debug)]
struct MemoryOutput {
    name: String,
    buffer: Vec<u8>,
    files: FileMap,
    published: bool,
}

impl MemoryOutput {
    fn publish(&mut self) {
        if !self.published {
            self.files
                .write()
                .insert(self.name.clone(), Arc::from(std::mem::take(&mut self.buffer)));
            self.published = true;
        }
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StorageOutput for MemoryOutput {
    fn close(&mut self) -> Result<()> {
        self.publish();
        Ok(())
    }
}

impl Drop for MemoryOutput {
    fn drop(&mut self) {
        self.publish();
    }
}
