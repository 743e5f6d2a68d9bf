//! Binary crate for the `owm` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Human-friendly output of triggers, alerts and image types

use clap::Parser;
use tracing::warn;

mod cli;
mod logging;

fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    let (config, load_err) = cli::load_config();
    logging::init_logging(config.log_level.as_deref());
    if let Some(err) = load_err {
        warn!("{err:#}; using default configuration");
    }
    cmd.run(config)
}
