//! bolt/page — разбор branch/leaf страниц и заголовка бакета.
//!
//! All element accessors are bounds-checked against the page slice; a malformed
//! element becomes a `ReadError`, never a panic.

use byteorder::{ByteOrder, LittleEndian};

use crate::consts::{
    BRANCH_ELEM_SIZE, BUCKET_HDR_SIZE, LEAF_ELEM_SIZE, PAGE_FLAG_BRANCH, PAGE_FLAG_LEAF,
    PAGE_HDR_SIZE, PAGE_OFF_COUNT, PAGE_OFF_FLAGS, PAGE_OFF_ID, PAGE_OFF_OVERFLOW,
};
use crate::error::{Result, SnapshotError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    pub id: u64,
    pub flags: u16,
    pub count: u16,
    pub overflow: u32,
}

pub fn page_header_read(buf: &[u8]) -> Option<PageHeader> {
    if buf.len() < PAGE_HDR_SIZE {
        return None;
    }
    Some(PageHeader {
        id: LittleEndian::read_u64(&buf[PAGE_OFF_ID..PAGE_OFF_ID + 8]),
        flags: LittleEndian::read_u16(&buf[PAGE_OFF_FLAGS..PAGE_OFF_FLAGS + 2]),
        count: LittleEndian::read_u16(&buf[PAGE_OFF_COUNT..PAGE_OFF_COUNT + 2]),
        overflow: LittleEndian::read_u32(&buf[PAGE_OFF_OVERFLOW..PAGE_OFF_OVERFLOW + 4]),
    })
}

/// A branch or leaf page. `data` spans the page including its overflow pages.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    pub hdr: PageHeader,
    data: &'a [u8],
}

/// One leaf element: a record, or a nested bucket when `is_bucket()`.
#[derive(Debug, Clone, Copy)]
pub struct LeafElem<'a> {
    pub flags: u32,
    pub key: &'a [u8],
    pub value: &'a [u8],
}

impl<'a> LeafElem<'a> {
    pub fn is_bucket(&self) -> bool {
        self.flags & crate::consts::BUCKET_LEAF_FLAG != 0
    }
}

impl<'a> PageView<'a> {
    /// Wrap a page buffer, requiring branch or leaf type.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let hdr = page_header_read(data)
            .ok_or_else(|| SnapshotError::read(format!("page buffer too short ({} B)", data.len())))?;
        if hdr.flags & (PAGE_FLAG_BRANCH | PAGE_FLAG_LEAF) == 0 {
            return Err(SnapshotError::read(format!(
                "page {} has unexpected flags 0x{:02x} (want branch or leaf)",
                hdr.id, hdr.flags
            )));
        }
        Ok(Self { hdr, data })
    }

    pub fn is_leaf(&self) -> bool {
        self.hdr.flags & PAGE_FLAG_LEAF != 0
    }

    pub fn count(&self) -> usize {
        self.hdr.count as usize
    }

    /// Leaf element `i`. Key/value offsets are relative to the element itself.
    pub fn leaf_elem(&self, i: usize) -> Result<LeafElem<'a>> {
        let eoff = self.elem_off(i, LEAF_ELEM_SIZE)?;
        let e = &self.data[eoff..eoff + LEAF_ELEM_SIZE];
        let flags = LittleEndian::read_u32(&e[0..4]);
        let pos = LittleEndian::read_u32(&e[4..8]) as usize;
        let ksize = LittleEndian::read_u32(&e[8..12]) as usize;
        let vsize = LittleEndian::read_u32(&e[12..16]) as usize;

        let kstart = eoff + pos;
        let key = self.slice(kstart, ksize, i)?;
        let value = self.slice(kstart + ksize, vsize, i)?;
        Ok(LeafElem { flags, key, value })
    }

    /// Branch element `i`: (first key of the child, child page id).
    pub fn branch_elem(&self, i: usize) -> Result<(&'a [u8], u64)> {
        let eoff = self.elem_off(i, BRANCH_ELEM_SIZE)?;
        let e = &self.data[eoff..eoff + BRANCH_ELEM_SIZE];
        let pos = LittleEndian::read_u32(&e[0..4]) as usize;
        let ksize = LittleEndian::read_u32(&e[4..8]) as usize;
        let pgid = LittleEndian::read_u64(&e[8..16]);
        let key = self.slice(eoff + pos, ksize, i)?;
        Ok((key, pgid))
    }

    fn elem_off(&self, i: usize, elem_size: usize) -> Result<usize> {
        if i >= self.count() {
            return Err(SnapshotError::read(format!(
                "page {}: element {} out of range (count {})",
                self.hdr.id,
                i,
                self.count()
            )));
        }
        let off = PAGE_HDR_SIZE + i * elem_size;
        if off + elem_size > self.data.len() {
            return Err(SnapshotError::read(format!(
                "page {}: element table exceeds page ({} B)",
                self.hdr.id,
                self.data.len()
            )));
        }
        Ok(off)
    }

    fn slice(&self, start: usize, len: usize, i: usize) -> Result<&'a [u8]> {
        start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| {
                SnapshotError::read(format!(
                    "page {}: element {} data out of bounds ({}+{} > {})",
                    self.hdr.id,
                    i,
                    start,
                    len,
                    self.data.len()
                ))
            })
    }
}

/// Where a bucket's B+tree starts.
#[derive(Debug, Clone, Copy)]
pub enum BucketRoot<'a> {
    /// Root page id in the file.
    Page(u64),
    /// Inline bucket: the single leaf page stored right after the header.
    Inline(&'a [u8]),
}

/// Parse a bucket header `[root u64][sequence u64]` from a bucket leaf value.
pub fn bucket_root(value: &[u8]) -> Result<BucketRoot<'_>> {
    if value.len() < BUCKET_HDR_SIZE {
        return Err(SnapshotError::read(format!(
            "bucket header too short ({} B)",
            value.len()
        )));
    }
    let root = LittleEndian::read_u64(&value[0..8]);
    if root == 0 {
        Ok(BucketRoot::Inline(&value[BUCKET_HDR_SIZE..]))
    } else {
        Ok(BucketRoot::Page(root))
    }
}
