use std::path::PathBuf;

use clap::Parser;

/// tabweave — a headless multi-tab document browser.
#[derive(Parser, Debug)]
#[command(name = "tabweave", version, about)]
pub struct Args {
    /// URLs to open, one tab each.
    pub urls: Vec<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive override (e.g. `tabweave=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// File of browser commands, run one per tick.
    #[arg(short = 's', long)]
    pub script: Option<PathBuf>,

    /// Stop after this many ticks even if loads are still pending.
    #[arg(long)]
    pub max_ticks: Option<u64>,
}

pub fn parse() -> Args {
    Args::parse()
}
