//! Test helpers: build small but real bbolt files on disk.
//!
//! Layout produced by `BoltFile::write`:
//!   page 0, 1  — meta (meta 1 carries the newer txid)
//!   page 2     — empty freelist
//!   page 3..   — leaf/branch pages in the order they were added
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use prost::Message;

use etcdsnap::bolt::meta::fnv1a64;
use etcdsnap::consts::{
    BRANCH_ELEM_SIZE, BUCKET_LEAF_FLAG, LEAF_ELEM_SIZE, META_CHECKSUM_SPAN, META_MAGIC,
    META_SIZE, META_VERSION, PAGE_FLAG_BRANCH, PAGE_FLAG_FREELIST, PAGE_FLAG_LEAF,
    PAGE_FLAG_META, PAGE_HDR_SIZE,
};
use etcdsnap::record::KeyValue;

pub const PS: usize = 4096;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub fn unique_path(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("etcdsnap-test-{prefix}-{pid}-{t}-{id}.db"))
}

/// etcd revision key: [main u64 BE]['_'][sub u64 BE].
pub fn rev_key(main: u64, sub: u64) -> Vec<u8> {
    let mut k = vec![0u8; 17];
    BigEndian::write_u64(&mut k[0..8], main);
    k[8] = b'_';
    BigEndian::write_u64(&mut k[9..17], sub);
    k
}

/// Encoded mvccpb.KeyValue.
pub fn kv(key: &[u8], value: &[u8], create_revision: i64, mod_revision: i64, version: i64) -> Vec<u8> {
    KeyValue {
        key: key.to_vec(),
        create_revision,
        mod_revision,
        version,
        value: value.to_vec(),
        lease: 0,
    }
    .encode_to_vec()
}

/// (flags, key, value)
pub type Item = (u32, Vec<u8>, Vec<u8>);

pub fn record(key: Vec<u8>, value: Vec<u8>) -> Item {
    (0, key, value)
}

/// Unpadded leaf page; keys/values packed after the element table.
pub fn leaf_page(id: u64, items: &[Item]) -> Vec<u8> {
    let mut p = vec![0u8; PAGE_HDR_SIZE + items.len() * LEAF_ELEM_SIZE];
    page_header(&mut p, id, PAGE_FLAG_LEAF, items.len());
    for (i, (flags, k, v)) in items.iter().enumerate() {
        let eoff = PAGE_HDR_SIZE + i * LEAF_ELEM_SIZE;
        let pos = (p.len() - eoff) as u32;
        LittleEndian::write_u32(&mut p[eoff..eoff + 4], *flags);
        LittleEndian::write_u32(&mut p[eoff + 4..eoff + 8], pos);
        LittleEndian::write_u32(&mut p[eoff + 8..eoff + 12], k.len() as u32);
        LittleEndian::write_u32(&mut p[eoff + 12..eoff + 16], v.len() as u32);
        p.extend_from_slice(k);
        p.extend_from_slice(v);
    }
    p
}

pub fn branch_page(id: u64, children: &[(Vec<u8>, u64)]) -> Vec<u8> {
    let mut p = vec![0u8; PAGE_HDR_SIZE + children.len() * BRANCH_ELEM_SIZE];
    page_header(&mut p, id, PAGE_FLAG_BRANCH, children.len());
    for (i, (k, pgid)) in children.iter().enumerate() {
        let eoff = PAGE_HDR_SIZE + i * BRANCH_ELEM_SIZE;
        let pos = (p.len() - eoff) as u32;
        LittleEndian::write_u32(&mut p[eoff..eoff + 4], pos);
        LittleEndian::write_u32(&mut p[eoff + 4..eoff + 8], k.len() as u32);
        LittleEndian::write_u64(&mut p[eoff + 8..eoff + 16], *pgid);
        p.extend_from_slice(k);
    }
    p
}

fn page_header(p: &mut [u8], id: u64, flags: u16, count: usize) {
    LittleEndian::write_u64(&mut p[0..8], id);
    LittleEndian::write_u16(&mut p[8..10], flags);
    LittleEndian::write_u16(&mut p[10..12], count as u16);
}

/// Bucket header pointing at a page.
pub fn bucket_value(root: u64) -> Vec<u8> {
    let mut v = vec![0u8; 16];
    LittleEndian::write_u64(&mut v[0..8], root);
    v
}

/// Inline bucket: header with root=0 followed by the leaf page itself.
pub fn inline_bucket_value(items: &[Item]) -> Vec<u8> {
    let mut v = vec![0u8; 16];
    v.extend(leaf_page(0, items));
    v
}

pub fn bucket(name: &str, value: Vec<u8>) -> Item {
    (BUCKET_LEAF_FLAG, name.as_bytes().to_vec(), value)
}

pub struct BoltFile {
    ps: usize,
    next: u64,
    pages: Vec<Vec<u8>>,
}

impl BoltFile {
    pub fn new(ps: usize) -> Self {
        let mut free = vec![0u8; ps];
        page_header(&mut free, 2, PAGE_FLAG_FREELIST, 0);
        Self {
            ps,
            next: 3,
            pages: vec![free],
        }
    }

    /// Id the next added page will get.
    pub fn next_id(&self) -> u64 {
        self.next
    }

    /// Add a page built for id `next_id()`; pads it and records overflow.
    pub fn add_page(&mut self, mut buf: Vec<u8>) -> u64 {
        let id = self.next;
        assert_eq!(LittleEndian::read_u64(&buf[0..8]), id, "page built for wrong id");
        let n = buf.len().div_ceil(self.ps).max(1);
        buf.resize(n * self.ps, 0);
        LittleEndian::write_u32(&mut buf[12..16], (n - 1) as u32);
        self.next += n as u64;
        self.pages.push(buf);
        id
    }

    pub fn add_leaf(&mut self, items: &[Item]) -> u64 {
        let id = self.next;
        self.add_page(leaf_page(id, items))
    }

    pub fn add_branch(&mut self, children: &[(Vec<u8>, u64)]) -> u64 {
        let id = self.next;
        self.add_page(branch_page(id, children))
    }

    /// Serialize with `root` as the root bucket page.
    pub fn to_bytes(&self, root: u64, txid: u64) -> Vec<u8> {
        let mut out = meta_page(self.ps, 0, root, self.next, txid - 1);
        out.extend(meta_page(self.ps, 1, root, self.next, txid));
        for p in &self.pages {
            out.extend_from_slice(p);
        }
        out
    }

    pub fn write(&self, path: &Path, root: u64) -> Result<()> {
        std::fs::write(path, self.to_bytes(root, 2))?;
        Ok(())
    }
}

pub fn meta_page(ps: usize, id: u64, root: u64, hwm: u64, txid: u64) -> Vec<u8> {
    let mut p = vec![0u8; ps];
    page_header(&mut p, id, PAGE_FLAG_META, 0);
    let m = &mut p[PAGE_HDR_SIZE..PAGE_HDR_SIZE + META_SIZE];
    LittleEndian::write_u32(&mut m[0..4], META_MAGIC);
    LittleEndian::write_u32(&mut m[4..8], META_VERSION);
    LittleEndian::write_u32(&mut m[8..12], ps as u32);
    LittleEndian::write_u64(&mut m[16..24], root);
    LittleEndian::write_u64(&mut m[32..40], 2);
    LittleEndian::write_u64(&mut m[40..48], hwm);
    LittleEndian::write_u64(&mut m[48..56], txid);
    let sum = fnv1a64(&m[..META_CHECKSUM_SPAN]);
    LittleEndian::write_u64(&mut m[56..64], sum);
    p
}

/// Common case: each bucket in its own leaf page, records in the given order.
pub fn write_snapshot(path: &Path, buckets: &[(&str, Vec<Item>)]) -> Result<()> {
    let mut f = BoltFile::new(PS);
    let mut sorted: Vec<&(&str, Vec<Item>)> = buckets.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);

    let mut roots = Vec::new();
    for (name, items) in sorted {
        let pgid = f.add_leaf(items);
        roots.push(bucket(name, bucket_value(pgid)));
    }
    let root = f.add_leaf(&roots);
    f.write(path, root)
}

/// The three-record scenario: /foo v1 "a", /foo v3 "b", /bar v1 "c".
pub fn scenario_items() -> Vec<Item> {
    vec![
        record(rev_key(2, 0), kv(b"/foo", b"a", 2, 2, 1)),
        record(rev_key(3, 0), kv(b"/bar", b"c", 3, 3, 1)),
        record(rev_key(4, 0), kv(b"/foo", b"b", 2, 4, 3)),
    ]
}

pub fn write_scenario(path: &Path) -> Result<()> {
    write_snapshot(
        path,
        &[
            ("key", scenario_items()),
            (
                "meta",
                vec![
                    record(b"consistent_index".to_vec(), vec![0, 0, 0, 0, 0, 0, 0, 9]),
                    record(b"scheduledCompactRev".to_vec(), vec![0xff; 8]),
                ],
            ),
        ],
    )
}
