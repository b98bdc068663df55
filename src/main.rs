mod cli;
mod commands;
mod config;
mod store;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::{Mode, RunOptions};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let opts = RunOptions::from_cli(&cli)?;
    log::debug!("running in {:?} mode against {}", opts.mode, opts.config_dir.display());

    match opts.mode {
        Mode::Validate => commands::validate::run(&opts),
        Mode::Export => commands::export::run(&opts),
        Mode::Sync => commands::sync::run(&opts),
    }
}
