//! bolt/meta — чтение и выбор meta-страницы (page 0 / page 1).
//!
//! Layout of the meta body (after the 16-byte page header), LE:
//! [magic u32][version u32][page_size u32][flags u32]
//! [root u64][sequence u64][freelist u64][pgid u64][txid u64][checksum u64]

use byteorder::{ByteOrder, LittleEndian};

use crate::consts::{
    FNV64_OFFSET, FNV64_PRIME, META_CHECKSUM_SPAN, META_MAGIC, META_SIZE, META_VERSION,
    PAGE_FLAG_META, PAGE_HDR_SIZE, PAGE_OFF_FLAGS, CANDIDATE_PAGE_SIZES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    pub page_size: u32,
    /// Root page of the root bucket (top-level bucket names live here).
    pub root: u64,
    /// High-water mark: every valid page id is below it.
    pub pgid: u64,
    pub txid: u64,
}

/// FNV-1a 64, как в bbolt meta.sum64().
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut h = FNV64_OFFSET;
    for b in bytes {
        h ^= *b as u64;
        h = h.wrapping_mul(FNV64_PRIME);
    }
    h
}

/// Parse a meta page. `page` starts at the page header.
/// Returns None if the buffer is short, not a meta page, or fails magic/version/checksum.
pub fn meta_read(page: &[u8]) -> Option<Meta> {
    if page.len() < PAGE_HDR_SIZE + META_SIZE {
        return None;
    }
    let flags = LittleEndian::read_u16(&page[PAGE_OFF_FLAGS..PAGE_OFF_FLAGS + 2]);
    if flags & PAGE_FLAG_META == 0 {
        return None;
    }
    let m = &page[PAGE_HDR_SIZE..PAGE_HDR_SIZE + META_SIZE];
    if LittleEndian::read_u32(&m[0..4]) != META_MAGIC {
        return None;
    }
    if LittleEndian::read_u32(&m[4..8]) != META_VERSION {
        return None;
    }
    let stored = LittleEndian::read_u64(&m[56..64]);
    if fnv1a64(&m[..META_CHECKSUM_SPAN]) != stored {
        return None;
    }
    Some(Meta {
        page_size: LittleEndian::read_u32(&m[8..12]),
        root: LittleEndian::read_u64(&m[16..24]),
        pgid: LittleEndian::read_u64(&m[40..48]),
        txid: LittleEndian::read_u64(&m[48..56]),
    })
}

/// Pick the active meta of a mapped file.
///
/// Page size comes from meta 0. If meta 0 is damaged, meta 1 is searched at the
/// usual page sizes. Of the valid metas the one with the greater txid wins.
pub fn meta_select(data: &[u8]) -> Option<Meta> {
    let m0 = meta_read(data).filter(|m| page_size_ok(m.page_size));

    let m1 = match m0 {
        Some(m) => meta_at(data, m.page_size as usize),
        None => CANDIDATE_PAGE_SIZES
            .iter()
            .find_map(|&ps| meta_at(data, ps as usize).filter(|m| m.page_size == ps)),
    };

    match (m0, m1) {
        (Some(a), Some(b)) => Some(if b.txid > a.txid { b } else { a }),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

fn meta_at(data: &[u8], off: usize) -> Option<Meta> {
    let page = data.get(off..)?;
    meta_read(page).filter(|m| page_size_ok(m.page_size))
}

fn page_size_ok(ps: u32) -> bool {
    ps as usize >= PAGE_HDR_SIZE + META_SIZE && ps.is_power_of_two()
}
