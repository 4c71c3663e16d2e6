//! Advisory repository lock.
//!
//! Mutating commands hold an exclusive `fs2` lock on `<tool-dir>/ccws.lock`
//! so two invocations against the same repository run one after the other.
//! The lock file itself is left in place.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{Error, Result};

/// Guard that releases the lock when dropped.
#[derive(Debug)]
pub struct RepoLock {
    file: File,
    path: PathBuf,
}

impl RepoLock {
    /// Block until the exclusive lock on `path` is held.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("failed to create {}", parent.display()), e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| Error::io(format!("failed to open lock {}", path.display()), e))?;
        file.lock_exclusive()
            .map_err(|e| Error::io(format!("failed to lock {}", path.display()), e))?;
        debug!(path = %path.display(), "repository lock acquired");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_creates_lock_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join(".ccws/ccws.lock");
        let lock = RepoLock::acquire(&path).expect("acquire");
        assert!(path.exists());
        assert_eq!(lock.path(), path);
        drop(lock);
        assert!(path.exists());
    }

    #[test]
    fn test_lock_is_exclusive_until_dropped() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("ccws.lock");
        let lock = RepoLock::acquire(&path).expect("acquire");

        let other = File::open(&path).expect("open lock file");
        assert!(other.try_lock_exclusive().is_err());

        drop(lock);
        other.try_lock_exclusive().expect("lock after release");
        other.unlock().expect("unlock");
    }
}
