//! Atomic file operations with exclusive locking.
//!
//! Writes go to a temporary sibling file which is synced and then renamed
//! over the target, so readers only ever see a complete document.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use averycare_core::{AveryError, Result};
use fs2::FileExt;

/// A handle to a text file that is replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
}

impl AtomicFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. Missing or blank files yield `None`.
    pub fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    /// Replaces the file content via tmp file + fsync + rename.
    pub fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Read-modify-write under an exclusive lock.
    ///
    /// `f` receives the current content (if any) and returns the new one.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(Option<String>) -> Result<String>,
    {
        let _lock = FileLock::acquire(&self.path)?;
        let current = self.read()?;
        let next = f(current)?;
        self.write(&next)
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| AveryError::storage("Path has no file name"))?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// A file lock guard that releases the lock when dropped.
///
/// The lock file is left in place: removing it while another process waits
/// on it would let a third process lock a fresh inode concurrently.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive()
            .map_err(|e| AveryError::storage(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock as well.
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("nested").join("doc.json"));

        assert!(file.read().unwrap().is_none());
        file.write("{\"a\":1}").unwrap();
        assert_eq!(file.read().unwrap().as_deref(), Some("{\"a\":1}"));

        let tmp_path = temp_dir.path().join("nested").join(".doc.json.tmp");
        assert!(!tmp_path.exists());
    }

    #[test]
    fn test_update_sees_previous_content() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("counter.txt"));

        for _ in 0..3 {
            file.update(|current| {
                let n: u32 = current.map(|c| c.trim().parse().unwrap()).unwrap_or(0);
                Ok((n + 1).to_string())
            })
            .unwrap();
        }

        assert_eq!(file.read().unwrap().as_deref(), Some("3"));
        assert!(temp_dir.path().join("counter.lock").exists());
    }

    #[test]
    fn test_concurrent_updates_are_serialized() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.txt");

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let file = AtomicFile::new(path.clone());
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        file.update(|current| {
                            let n: u32 = current.map(|c| c.trim().parse().unwrap()).unwrap_or(0);
                            Ok((n + 1).to_string())
                        })
                        .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(AtomicFile::new(path).read().unwrap().as_deref(), Some("100"));
    }

    #[test]
    fn test_blank_file_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.json");
        std::fs::write(&path, "  \n").unwrap();
        assert!(AtomicFile::new(path).read().unwrap().is_none());
    }
}
