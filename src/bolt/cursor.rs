//! bolt/cursor — обход B+дерева бакетов без колбэков.
//!
//! `Entries` is a finite, non-restartable iterator. The first structural error is
//! yielded once and then the iterator is fused.

use crate::error::{Result, SnapshotError};

use super::page::{bucket_root, BucketRoot, LeafElem, PageView};
use super::Snapshot;

/// Deeper than any real bbolt tree; guards against branch cycles in corrupted files.
const MAX_TREE_DEPTH: usize = 64;

/// One stored record as found in the container. Borrowed from the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry<'a> {
    pub bucket: &'a [u8],
    pub key: &'a [u8],
    pub value: &'a [u8],
}

/// Depth-first walk over one bucket's pages, yielding leaf elements in key order.
struct TreeCursor<'a> {
    stack: Vec<(PageView<'a>, usize)>,
}

impl<'a> TreeCursor<'a> {
    fn new(root: PageView<'a>) -> Self {
        Self {
            stack: vec![(root, 0)],
        }
    }

    fn open(snap: &'a Snapshot, root: BucketRoot<'a>) -> Result<Self> {
        let page = match root {
            BucketRoot::Page(pgid) => snap.page(pgid)?,
            BucketRoot::Inline(buf) => PageView::new(buf)?,
        };
        Ok(Self::new(page))
    }

    fn next(&mut self, snap: &'a Snapshot) -> Option<Result<LeafElem<'a>>> {
        loop {
            let (page, idx) = self.stack.last_mut()?;
            if *idx >= page.count() {
                self.stack.pop();
                continue;
            }
            let i = *idx;
            *idx += 1;
            let page = *page;

            if page.is_leaf() {
                return Some(page.leaf_elem(i));
            }

            if self.stack.len() >= MAX_TREE_DEPTH {
                return Some(Err(SnapshotError::read(format!(
                    "page {}: tree deeper than {} levels",
                    page.hdr.id, MAX_TREE_DEPTH
                ))));
            }
            match page.branch_elem(i).and_then(|(_, pgid)| snap.page(pgid)) {
                Ok(child) => self.stack.push((child, 0)),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

pub struct Entries<'a> {
    snap: &'a Snapshot,
    root: Option<TreeCursor<'a>>,
    bucket: Option<(&'a [u8], TreeCursor<'a>)>,
    started: bool,
    done: bool,
}

impl<'a> Entries<'a> {
    pub(super) fn new(snap: &'a Snapshot) -> Self {
        Self {
            snap,
            root: None,
            bucket: None,
            started: false,
            done: false,
        }
    }

    fn advance(&mut self) -> Option<Result<RawEntry<'a>>> {
        if !self.started {
            self.started = true;
            match self.snap.page(self.snap.meta().root) {
                Ok(p) => self.root = Some(TreeCursor::new(p)),
                Err(e) => return Some(Err(e)),
            }
        }

        loop {
            if let Some((name, cur)) = self.bucket.as_mut() {
                match cur.next(self.snap) {
                    // nested buckets are not records
                    Some(Ok(e)) if e.is_bucket() => continue,
                    Some(Ok(e)) => {
                        return Some(Ok(RawEntry {
                            bucket: *name,
                            key: e.key,
                            value: e.value,
                        }))
                    }
                    Some(Err(e)) => return Some(Err(e)),
                    None => self.bucket = None,
                }
                continue;
            }

            // следующий бакет верхнего уровня
            let e = match self.root.as_mut()?.next(self.snap)? {
                Ok(e) => e,
                Err(err) => return Some(Err(err)),
            };
            if !e.is_bucket() {
                // the root bucket holds only buckets; a plain value there is ignored
                continue;
            }
            let cur = match bucket_root(e.value).and_then(|r| TreeCursor::open(self.snap, r)) {
                Ok(c) => c,
                Err(err) => return Some(Err(err)),
            };
            self.bucket = Some((e.key, cur));
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<RawEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.advance();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

impl std::iter::FusedIterator for Entries<'_> {}
