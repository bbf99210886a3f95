//! `SecretsFileSystem` backed by `std::fs`.

use std::io;
use std::path::{Path, PathBuf};

use super::SecretsFileSystem;

/// Reads secrets from the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl SecretsFileSystem for OsFileSystem {
    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    /// Kubernetes projects each secret as a symlink into a `..data` directory,
    /// so entries are classified by the metadata of their target.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(
                        secrets_dir = %dir.display(),
                        error = %e,
                        "Could not read secrets directory entry; skipping"
                    );
                    continue;
                }
            };

            let path = entry.path();
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(
                        path = %path.display(),
                        error = %e,
                        "Skipping secrets directory entry that cannot be resolved"
                    );
                }
            }
        }

        // read_dir order is platform dependent; sorting keeps last-write-wins stable.
        files.sort();
        Ok(files)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}
