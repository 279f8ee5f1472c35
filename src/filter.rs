//! Key allow-list and "latest version only" reduction.
//!
//! `Collector` is fed one projected record at a time in traversal order and turns
//! the stream into the final output list. Without latest-only it keeps every
//! record that passes the filter, duplicates included. With latest-only it keeps,
//! per key, the first record with the greatest version (ties keep the earlier
//! one) and emits them sorted by key.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

use crate::projection::ProjectedRecord;

/// Exact-match key allow-list. Empty means "everything passes".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFilter {
    keys: HashSet<String>,
}

impl KeyFilter {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Comma-separated list as given on the command line. Empty segments are
    /// dropped, nothing is trimmed.
    pub fn parse_csv(s: &str) -> Self {
        Self::new(s.split(',').filter(|k| !k.is_empty()))
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn allows(&self, key: &str) -> bool {
        self.keys.is_empty() || self.keys.contains(key)
    }

    /// Keys in sorted order (for logging).
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        v.sort_unstable();
        v
    }
}

enum Acc {
    All(Vec<ProjectedRecord>),
    Latest(BTreeMap<String, ProjectedRecord>),
}

pub struct Collector<'f> {
    filter: &'f KeyFilter,
    acc: Acc,
    seen: usize,
    rejected: usize,
}

impl<'f> Collector<'f> {
    pub fn new(filter: &'f KeyFilter, latest_only: bool) -> Self {
        let acc = if latest_only {
            Acc::Latest(BTreeMap::new())
        } else {
            Acc::All(Vec::new())
        };
        Self {
            filter,
            acc,
            seen: 0,
            rejected: 0,
        }
    }

    pub fn push(&mut self, rec: ProjectedRecord) {
        self.seen += 1;
        if !self.filter.allows(&rec.key) {
            self.rejected += 1;
            return;
        }
        match &mut self.acc {
            Acc::All(v) => v.push(rec),
            Acc::Latest(index) => match index.entry(rec.key.clone()) {
                Entry::Vacant(e) => {
                    e.insert(rec);
                }
                Entry::Occupied(mut e) => {
                    // strictly greater only: equal versions keep the earlier record
                    if rec.version > e.get().version {
                        e.insert(rec);
                    }
                }
            },
        }
    }

    /// Records pushed so far (before filtering).
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Records dropped by the key filter.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn finish(self) -> Vec<ProjectedRecord> {
        match self.acc {
            Acc::All(v) => v,
            Acc::Latest(index) => index.into_values().collect(),
        }
    }
}

/// One-shot helper over an in-memory sequence.
pub fn reduce<I>(records: I, filter: &KeyFilter, latest_only: bool) -> Vec<ProjectedRecord>
where
    I: IntoIterator<Item = ProjectedRecord>,
{
    let mut c = Collector::new(filter, latest_only);
    for r in records {
        c.push(r);
    }
    c.finish()
}
