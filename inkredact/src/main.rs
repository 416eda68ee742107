// inkredact/src/main.rs
//! inkredact entry point.
//!
//! Parses arguments, initialises logging and configuration, then dispatches
//! to the selected command.

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use inkredact::cli::{Cli, Commands};
use inkredact::commands::{process, rules};
use inkredact::logger;
use inkredact::ui::theme::build_theme_map;
use inkredact_core::PipelineConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let level = if args.debug {
        Some(LevelFilter::Debug)
    } else if args.quiet {
        Some(LevelFilter::Error)
    } else {
        None
    };
    logger::init_logger(level);

    let theme_map = build_theme_map(args.theme.as_deref()).context("Theme error")?;
    let config = PipelineConfig::load(args.config.as_deref()).context("Configuration error")?;

    match &args.command {
        Commands::Process(cmd) => process::run_process(&config, cmd, args.quiet, &theme_map).await,
        Commands::Rules => rules::run_rules(&config, &mut std::io::stdout().lock()),
    }
}
