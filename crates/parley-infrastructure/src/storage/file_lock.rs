//! Advisory file locks shared by the TOML and JSONL stores.

use fs2::FileExt;
use std::fs::File;

/// Holds an advisory lock on an open file until dropped.
pub(crate) struct LockedFile<'a> {
    file: &'a File,
}

impl<'a> LockedFile<'a> {
    /// Blocks until no other process holds any lock on `file`.
    pub(crate) fn exclusive(file: &'a File) -> std::io::Result<Self> {
        FileExt::lock_exclusive(file)?;
        Ok(Self { file })
    }

    /// Blocks until no other process holds an exclusive lock on `file`.
    pub(crate) fn shared(file: &'a File) -> std::io::Result<Self> {
        FileExt::lock_shared(file)?;
        Ok(Self { file })
    }
}

impl Drop for LockedFile<'_> {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(self.file) {
            tracing::warn!("[LockedFile] Failed to release lock: {}", err);
        }
    }
}
