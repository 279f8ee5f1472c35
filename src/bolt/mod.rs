//! bolt — read-only access to a bbolt snapshot file.
//!
//! `Snapshot::open` maps the file under a shared lock and selects the active meta.
//! `Snapshot::entries` walks every top-level bucket in key order and yields raw
//! (bucket, key, value) triples. Nothing is ever written to the file.

pub mod cursor;
pub mod meta;
pub mod page;

pub use cursor::{Entries, RawEntry};
pub use meta::Meta;
pub use page::{BucketRoot, LeafElem, PageView};

use log::debug;
use memmap2::{Mmap, MmapOptions};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::consts::{META_SIZE, PAGE_HDR_SIZE};
use crate::error::{Result, SnapshotError};
use crate::lock::{try_lock_shared, LockGuard};
use meta::meta_select;
use page::page_header_read;

/// An opened snapshot. Mapping and lock are released together on Drop.
pub struct Snapshot {
    path: PathBuf,
    map: Mmap,
    meta: Meta,
    _lock: LockGuard,
}

impl Snapshot {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|e| SnapshotError::open(path, e.to_string()))?;

        let md = file
            .metadata()
            .map_err(|e| SnapshotError::open(path, e.to_string()))?;
        if !md.is_file() {
            return Err(SnapshotError::open(path, "not a regular file"));
        }
        if md.len() < (PAGE_HDR_SIZE + META_SIZE) as u64 {
            return Err(SnapshotError::open(
                path,
                format!("file too small ({} B) to be a bbolt database", md.len()),
            ));
        }

        let lock = try_lock_shared(file)
            .map_err(|e| SnapshotError::open(path, format!("snapshot is locked: {}", e)))?;

        // read-only mapping; the file is never modified through it
        let map = unsafe { MmapOptions::new().map(lock.file()) }
            .map_err(|e| SnapshotError::open(path, format!("mmap: {}", e)))?;

        let meta = meta_select(&map).ok_or_else(|| {
            SnapshotError::open(path, "no valid meta page (not a bbolt database?)")
        })?;

        debug!(
            "opened {}: page_size={} txid={} root={} hwm={} size={} B",
            path.display(),
            meta.page_size,
            meta.txid,
            meta.root,
            meta.pgid,
            map.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            map,
            meta,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn page_size(&self) -> u32 {
        self.meta.page_size
    }

    pub fn txid(&self) -> u64 {
        self.meta.txid
    }

    /// Lazy single-pass traversal of every record in every top-level bucket.
    pub fn entries(&self) -> Entries<'_> {
        Entries::new(self)
    }

    /// Resolve a branch/leaf page by id, including its overflow pages.
    pub fn page(&self, pgid: u64) -> Result<PageView<'_>> {
        // pages 0/1 are metas
        if pgid < 2 || pgid >= self.meta.pgid {
            return Err(SnapshotError::read(format!(
                "page id {} outside valid range 2..{}",
                pgid, self.meta.pgid
            )));
        }
        let ps = self.meta.page_size as u64;
        let off = pgid
            .checked_mul(ps)
            .filter(|&o| o < self.map.len() as u64)
            .ok_or_else(|| SnapshotError::read(format!("page {} beyond end of file", pgid)))?
            as usize;

        let hdr = page_header_read(&self.map[off..])
            .ok_or_else(|| SnapshotError::read(format!("page {} header truncated", pgid)))?;
        if hdr.id != pgid {
            return Err(SnapshotError::read(format!(
                "page {} header carries id {}",
                pgid, hdr.id
            )));
        }

        let span = (hdr.overflow as u64 + 1)
            .checked_mul(ps)
            .and_then(|n| n.checked_add(off as u64))
            .filter(|&end| end <= self.map.len() as u64)
            .ok_or_else(|| {
                SnapshotError::read(format!(
                    "page {} (+{} overflow) extends past end of file",
                    pgid, hdr.overflow
                ))
            })? as usize;

        PageView::new(&self.map[off..span])
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("path", &self.path)
            .field("meta", &self.meta)
            .field("len", &self.map.len())
            .finish()
    }
}
