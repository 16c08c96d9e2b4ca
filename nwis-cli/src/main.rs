//! nwis-cli - Command line tool for USGS NWIS RDB datasets.

use clap::Parser;
use log::LevelFilter;

#[derive(Parser)]
#[command(
    name = "nwis-cli",
    version,
    about = "Retrieve and parse USGS water data in RDB format"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: nwis_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    nwis_cmd::run(cli.command).await
}
