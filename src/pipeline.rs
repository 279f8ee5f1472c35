//! One extraction pass: open → traverse/decode/normalize/filter → reduce → render.
//!
//! The snapshot is opened inside `extract` and dropped before it returns, so the
//! mapping and file lock never outlive the pass, on success or on error.

use log::debug;

use crate::bolt::Snapshot;
use crate::config::ExtractConfig;
use crate::error::Result;
use crate::filter::Collector;
use crate::projection::{render, ProjectedRecord};
use crate::record::decode;

/// Counters of one pass (for logging and tests).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Raw entries visited across all buckets.
    pub entries: usize,
    /// Entries whose value decoded as a record.
    pub decoded: usize,
    /// Decoded records dropped by the key filter.
    pub filtered_out: usize,
    /// Records in the output.
    pub emitted: usize,
}

pub fn extract(cfg: &ExtractConfig) -> Result<Vec<ProjectedRecord>> {
    extract_with_stats(cfg).map(|(records, _)| records)
}

pub fn extract_with_stats(cfg: &ExtractConfig) -> Result<(Vec<ProjectedRecord>, ExtractStats)> {
    debug!("extract: {}", cfg);
    let snap = Snapshot::open(&cfg.path)?;

    let mut stats = ExtractStats::default();
    let mut acc = Collector::new(&cfg.keys, cfg.latest_only);

    for entry in snap.entries() {
        let entry = entry?;
        stats.entries += 1;
        if let Some(rec) = decode(entry.value) {
            acc.push(ProjectedRecord::project(&rec));
        }
    }

    stats.decoded = acc.seen();
    stats.filtered_out = acc.rejected();
    let records = acc.finish();
    stats.emitted = records.len();

    debug!(
        "{}: txid={} entries={} decoded={} filtered_out={} emitted={}",
        snap.path().display(),
        snap.txid(),
        stats.entries,
        stats.decoded,
        stats.filtered_out,
        stats.emitted
    );
    Ok((records, stats))
}

/// Full pass rendered to the JSON text written to stdout (without trailing newline).
pub fn extract_json(cfg: &ExtractConfig) -> Result<String> {
    let records = extract(cfg)?;
    render(&records)
}
