//! Storage seam for changelog files.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

pub trait ChangelogStore {
    fn exists(&self, path: &Path) -> bool;

    /// Full file contents, `None` when the file does not exist.
    fn read(&self, path: &Path) -> io::Result<Option<String>>;

    /// Writes `content`, creating parent directories as needed.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Filesystem-backed store.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl ChangelogStore for FsStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }
}

/// In-memory store; clones share the same files.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), content.into());
        self
    }

    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }
}

impl ChangelogStore for MemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.contents(path).is_some()
    }

    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        Ok(self.contents(path))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_store_missing_file_reads_none() {
        let temp_dir = TempDir::new().unwrap();

        let content = FsStore.read(&temp_dir.path().join("CHANGELOG.md")).unwrap();
        assert!(content.is_none());
    }

    #[test]
    fn test_fs_store_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("packages/expo-foo/CHANGELOG.md");

        FsStore.write(&path, "# Changelog\n").unwrap();

        assert!(FsStore.exists(&path));
        assert_eq!(FsStore.read(&path).unwrap().as_deref(), Some("# Changelog\n"));
    }

    #[test]
    fn test_memory_store_clones_share_files() {
        let store = MemoryStore::new();
        let clone = store.clone();

        clone.write(Path::new("CHANGELOG.md"), "## master\n").unwrap();

        assert!(store.exists(Path::new("CHANGELOG.md")));
        assert_eq!(
            store.contents(Path::new("CHANGELOG.md")).as_deref(),
            Some("## master\n")
        );
    }
}
