use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Dump an etcd snapshot (bbolt file) as a JSON array of key/value records.
#[derive(Parser, Debug)]
#[command(name = "etcd-snapshot-to-json", version, about, arg_required_else_help = true)]
pub struct Cli {
    /// Path to the snapshot file (e.g. member/snap/db or an `etcdctl snapshot save` file)
    pub snapshot: PathBuf,

    /// Comma-separated list of keys to include (exact match). Default: all keys.
    #[arg(long, value_name = "KEY[,KEY...]")]
    pub keys: Option<String>,

    /// Keep only the record with the highest version for each key
    #[arg(long, default_value_t = false)]
    pub latest_only: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Cli as Parser>::parse()
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
