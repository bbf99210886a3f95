//! In-memory `SecretsFileSystem` for tests and embedding.
//!
//! Files can be added or removed through a shared reference, so a test can
//! hand an `Arc<MemoryFileSystem>` to a provider and keep mutating it.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::SecretsFileSystem;

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}

/// A mock filesystem keyed by absolute path.
///
/// Directories exist implicitly as ancestors of any added file, or
/// explicitly through [`MemoryFileSystem::add_dir`].
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    tree: RwLock<Tree>,
}

impl MemoryFileSystem {
    /// Create an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file.
    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.write().files.insert(path.into(), contents.into());
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        self.write().dirs.insert(path.into());
    }

    /// Remove a file, returning whether it existed.
    pub fn remove_file(&self, path: &Path) -> bool {
        self.write().files.remove(path).is_some()
    }

    fn read_tree(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SecretsFileSystem for MemoryFileSystem {
    fn dir_exists(&self, path: &Path) -> bool {
        if path.as_os_str().is_empty() {
            return false;
        }
        let tree = self.read_tree();
        tree.dirs.iter().any(|dir| dir.starts_with(path))
            || tree
                .files
                .keys()
                .any(|file| file != path && file.starts_with(path))
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.dir_exists(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {}", dir.display()),
            ));
        }

        Ok(self
            .read_tree()
            .files
            .keys()
            .filter(|file| file.parent() == Some(dir))
            .cloned()
            .collect())
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.read_tree().files.contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.read_tree().files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )
        })
    }
}
