//! File-based storage implementation.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{JavelinError, Result};
use crate::storage::{Storage, StorageInput, StorageOutput};

/// A file-based storage backend rooted at a directory.
///
/// File names are flat (no path separators); `rename_file` maps to
/// `std::fs::rename`, which is atomic within the directory.
#[derive(Debug)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Create a file storage in the given directory, creating it if needed.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            std::fs::create_dir_all(&directory)
                .map_err(|e| JavelinError::storage(format!("failed to create directory: {e}")))?;
        }
        if !directory.is_dir() {
            return Err(JavelinError::storage(format!(
                "path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(FileStorage { directory })
    }

    /// The root directory of this storage.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(JavelinError::storage(format!("invalid file name: {name}")));
        }
        Ok(self.directory.join(name))
    }
}

impl Storage for FileStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let path = self.file_path(name)?;
        let file = File::open(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                JavelinError::storage(format!("file not found: {name}"))
            } else {
                JavelinError::Io(e)
            }
        })?;
        let size = file.metadata()?.len();

        Ok(Box::new(FileInput {
            reader: BufReader::new(file),
            size,
        }))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        let path = self.file_path(name)?;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        Ok(Box::new(FileOutput {
            writer: BufWriter::new(file),
        }))
    }

    fn file_exists(&self, name: &str) -> bool {
        match self.file_path(name) {
            Ok(path) => path.exists(),
            Err(_) => false,
        }
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.directory)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        let path = self.file_path(name)?;
        std::fs::remove_file(path)?;
        Ok(())
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        let old_path = self.file_path(old_name)?;
        let new_path = self.file_path(new_name)?;
        std::fs::rename(old_path, new_path)?;
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        // Outputs sync themselves on close; directory metadata is synced
        // here so renames survive a crash.
        let dir = File::open(&self.directory)?;
        dir.sync_all()?;
        Ok(())
    }
}

#[derive(Debug)]
struct FileInput {
    reader: BufReader<File>,
    size: u64,
}

impl Read for FileInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl StorageInput for FileInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

#[derive(Debug)]
struct FileOutput {
    writer: BufWriter<File>,
}

impl Write for FileOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl StorageOutput for FileOutput {
    fn close(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{read_to_vec, write_all};
    use tempfile::TempDir;

    #[test]
    fn test_create_in_new_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("index");

        let storage = FileStorage::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert!(storage.list_files().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_path_separators() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert!(storage.create_output("../escape").is_err());
        assert!(storage.open_input("a/b").is_err());
    }

    #[test]
    fn test_rename_replaces_target() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        write_all(&storage, "new", b"new-data").unwrap();
        write_all(&storage, "current", b"old-data").unwrap();

        storage.rename_file("new", "current").unwrap();
        assert_eq!(read_to_vec(&storage, "current").unwrap(), b"new-data");
        assert!(!storage.file_exists("new"));
    }

    #[test]
    fn test_input_size() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        write_all(&storage, "sized", b"12345").unwrap();
        let input = storage.open_input("sized").unwrap();
        assert_eq!(input.size().unwrap(), 5);
    }
}
