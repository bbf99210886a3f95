//! Filesystem access used by the secrets loader.
//!
//! Responsibilities:
//! - Define the `SecretsFileSystem` seam the loader reads through.
//! - Provide the real implementation (`OsFileSystem`) and an in-memory one
//!   (`MemoryFileSystem`) for deterministic tests.
//!
//! Does NOT handle:
//! - Key derivation or filtering (see `transform.rs` and `loader/`).
//!
//! Invariants:
//! - All operations are read-only against the backing store.
//! - `list_files` is non-recursive and only yields regular files.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod memory;
mod os;

pub use memory::MemoryFileSystem;
pub use os::OsFileSystem;

/// Read-only view of the directory holding secret files.
#[cfg_attr(test, mockall::automock)]
pub trait SecretsFileSystem: Send + Sync {
    /// Whether `path` exists and is a directory.
    fn dir_exists(&self, path: &Path) -> bool;

    /// Regular files directly inside `dir`.
    ///
    /// Subdirectories are not descended into. Symlinks count as files when
    /// their target is a regular file.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Whether `path` still exists and is a regular file.
    fn file_exists(&self, path: &Path) -> bool;

    /// Entire contents of the file at `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

impl<F: SecretsFileSystem + ?Sized> SecretsFileSystem for Arc<F> {
    fn dir_exists(&self, path: &Path) -> bool {
        (**self).dir_exists(path)
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).list_files(dir)
    }

    fn file_exists(&self, path: &Path) -> bool {
        (**self).file_exists(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }
}
