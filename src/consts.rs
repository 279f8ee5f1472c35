//! Константы формата bbolt (read-only подмножество: meta, branch/leaf, bucket header).
//!
//! Все поля little-endian (bbolt пишет в нативном порядке; etcd собирается под LE).

// -------- Page header --------
// [id u64][flags u16][count u16][overflow u32]
pub const PAGE_HDR_SIZE: usize = 16;
pub const PAGE_OFF_ID: usize = 0;
pub const PAGE_OFF_FLAGS: usize = 8;
pub const PAGE_OFF_COUNT: usize = 10;
pub const PAGE_OFF_OVERFLOW: usize = 12;

pub const PAGE_FLAG_BRANCH: u16 = 0x01;
pub const PAGE_FLAG_LEAF: u16 = 0x02;
pub const PAGE_FLAG_META: u16 = 0x04;
pub const PAGE_FLAG_FREELIST: u16 = 0x10;

// -------- Elements --------
// branch: [pos u32][ksize u32][pgid u64]
pub const BRANCH_ELEM_SIZE: usize = 16;
// leaf:   [flags u32][pos u32][ksize u32][vsize u32]
pub const LEAF_ELEM_SIZE: usize = 16;

/// Leaf element flag: value is a bucket header, not a record.
pub const BUCKET_LEAF_FLAG: u32 = 0x01;

// -------- Bucket header --------
// [root u64][sequence u64]; root == 0 => inline bucket, page follows the header
pub const BUCKET_HDR_SIZE: usize = 16;

// -------- Meta --------
// [magic u32][version u32][page_size u32][flags u32]
// [root.root u64][root.sequence u64][freelist u64][pgid u64][txid u64][checksum u64]
pub const META_MAGIC: u32 = 0xED0C_DAED;
pub const META_VERSION: u32 = 2;
pub const META_SIZE: usize = 64;
/// Checksum covers the meta body up to (not including) the checksum field.
pub const META_CHECKSUM_SPAN: usize = 56;

/// Page sizes tried when meta 0 is unreadable.
pub const CANDIDATE_PAGE_SIZES: [u32; 5] = [4096, 8192, 16384, 32768, 65536];

// -------- FNV-1a 64 (meta checksum) --------
pub const FNV64_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
pub const FNV64_PRIME: u64 = 0x0000_0100_0000_01b3;
