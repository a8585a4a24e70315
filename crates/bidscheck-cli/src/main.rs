//! bidscheck CLI - BIDS dataset validator.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("bidscheck=debug")
    } else {
        EnvFilter::new("bidscheck=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized (verbose={})", cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            dir,
            ignore_warnings,
            ignore_nifti_headers,
            threads,
            json,
        } => commands::validate::run(
            dir,
            ignore_warnings,
            ignore_nifti_headers,
            threads,
            json,
            cli.verbose,
        ),

        Commands::Classify { paths } => commands::classify::run(paths, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
