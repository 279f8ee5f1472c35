//! Advisory locking of the snapshot file while it is being read.
//!
//! Cross-platform (fs2) advisory locks, taken on the snapshot file itself the way
//! bbolt does for read-only handles:
//! - Shared: this tool; any number of readers may hold it at once.
//! - Exclusive: held by a live etcd member on its db file. A shared attempt then fails.
//!
//! Lock is released on Drop.

use fs2::FileExt;
use std::fs::File;
use std::io;

pub struct LockGuard {
    file: File,
}

impl LockGuard {
    pub fn file(&self) -> &File {
        &self.file
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // unlock errors on drop are ignored; closing the fd drops the lock anyway
        let _ = FileExt::unlock(&self.file);
    }
}

/// Take a shared lock on an already opened file. Returns Err at once if an
/// exclusive lock is held elsewhere.
pub fn try_lock_shared(file: File) -> io::Result<LockGuard> {
    FileExt::try_lock_shared(&file)?;
    Ok(LockGuard { file })
}
