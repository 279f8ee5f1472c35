//! etcdsnap — read-only extraction of etcd bbolt snapshots into JSON.
//!
//! Pipeline: `bolt` (container walk) → `record` (mvccpb.KeyValue decode) →
//! `text` (UTF-8 / Base64 normalization) → `filter` (allow-list, latest-only)
//! → `projection` (pretty JSON).

pub mod consts;
pub mod error;
pub mod lock;

// Контейнер bbolt (только чтение)
pub mod bolt;

pub mod record;
pub mod text;
pub mod projection;
pub mod filter;

pub mod config;
pub mod pipeline;

// Удобные реэкспорты
pub use bolt::{RawEntry, Snapshot};
pub use config::{ExtractConfig, ExtractConfigBuilder};
pub use error::SnapshotError;
pub use filter::{Collector, KeyFilter};
pub use pipeline::{extract, extract_json, extract_with_stats, ExtractStats};
pub use projection::{render, ProjectedRecord};
pub use record::{decode, VersionedRecord};
pub use text::normalize;
