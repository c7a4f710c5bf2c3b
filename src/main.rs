//! rangepress - prefix list aggregator and ruleset builder
//!
//! Fetches published IP range lists, aggregates them into minimal CIDR sets
//! and compiles binary rulesets for proxy clients.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use rangepress::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Run { text_only, merge } => {
            rangepress::commands::run::run(text_only, merge, &cli.config).await
        }
        Commands::Aggregate { family, files } => {
            rangepress::commands::aggregate::run(family.into(), &files)
        }
        Commands::Sources => rangepress::commands::sources::run(&cli.config),
        Commands::Init { force } => rangepress::commands::init::run(force, &cli.config),
        Commands::Version => {
            println!("rangepress {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
