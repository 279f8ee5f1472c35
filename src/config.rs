//! Extraction configuration and builder.
//!
//! `ExtractConfig` is everything one pipeline run needs: which file, which keys,
//! and whether to collapse history to the latest version. It is assembled by the
//! CLI (or by tests) and consumed by `pipeline::extract`.
//!
//! Defaults:
//! - keys = empty (no filtering)
//! - latest_only = false (full revision history)

use std::fmt;
use std::path::{Path, PathBuf};

use crate::filter::KeyFilter;

#[derive(Clone, Debug, Default)]
pub struct ExtractConfig {
    /// Path to the bbolt snapshot file.
    pub path: PathBuf,

    /// Exact-match allow-list of normalized keys. Empty = all keys.
    pub keys: KeyFilter,

    /// Keep only the highest version per key.
    pub latest_only: bool,
}

impl ExtractConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_keys(mut self, keys: KeyFilter) -> Self {
        self.keys = keys;
        self
    }

    /// Allow-list from a comma-separated string (the `--keys` flag).
    pub fn with_keys_csv(mut self, csv: &str) -> Self {
        self.keys = KeyFilter::parse_csv(csv);
        self
    }

    pub fn with_latest_only(mut self, on: bool) -> Self {
        self.latest_only = on;
        self
    }
}

impl fmt::Display for ExtractConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExtractConfig {{ path: {}, keys: {}, latest_only: {} }}",
            self.path.display(),
            if self.keys.is_empty() {
                "all".to_string()
            } else {
                format!("[{}]", self.keys.sorted_keys().join(","))
            },
            self.latest_only
        )
    }
}

/// Builder for ExtractConfig.
#[derive(Clone, Debug)]
pub struct ExtractConfigBuilder {
    cfg: ExtractConfig,
}

impl ExtractConfigBuilder {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            cfg: ExtractConfig::new(path),
        }
    }

    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.keys = KeyFilter::new(keys);
        self
    }

    pub fn keys_csv(mut self, csv: Option<&str>) -> Self {
        self.cfg.keys = csv.map(KeyFilter::parse_csv).unwrap_or_default();
        self
    }

    pub fn latest_only(mut self, on: bool) -> Self {
        self.cfg.latest_only = on;
        self
    }

    pub fn build(self) -> ExtractConfig {
        self.cfg
    }
}
