use anyhow::{Context, Result};
use env_logger::{Builder, Env};
use std::io::Write;

use etcdsnap::{extract_json, ExtractConfigBuilder};

mod cli;

fn init_logger(default_level: &str) {
    // Уровень из RUST_LOG, иначе из -v (по умолчанию warn: stderr пуст при успехе).
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn main() {
    let cli = cli::Cli::parse();
    init_logger(cli.log_level());

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: cli::Cli) -> Result<()> {
    let cfg = ExtractConfigBuilder::new(&cli.snapshot)
        .keys_csv(cli.keys.as_deref())
        .latest_only(cli.latest_only)
        .build();

    // весь результат собирается до вывода: при ошибке stdout остаётся пустым
    let json = extract_json(&cfg)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", json).context("write to stdout")?;
    out.flush().context("flush stdout")?;
    Ok(())
}
