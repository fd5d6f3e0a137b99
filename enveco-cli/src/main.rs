//! `enveco` command line tool
//!
//! Extracts LiDAR plot features for a table of field plots whose decoded
//! point lists live in one directory.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // a second init (e.g. in tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Metrics(args) => commands::run_metrics(&args),
        Command::Voxelize(args) => commands::run_voxelize(&args),
        Command::Config(args) => commands::print_config(&args),
    }
}
