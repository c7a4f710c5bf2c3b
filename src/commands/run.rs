//! Run command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::compiler::RulesetCompiler;
use crate::config::Config;
use crate::pipeline::{self, RunOptions};
use crate::utils::format_count;

/// Run the full pipeline: fetch, aggregate, emit artifacts
pub async fn run(text_only: bool, merge: bool, config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    info!("Updating prefix lists...");

    let compiler = RulesetCompiler::new(&config.compiler);
    let options = RunOptions { text_only, merge };

    let summary = pipeline::run(&config, &compiler, &options).await?;

    println!();
    if summary.artifacts.is_empty() {
        println!("[OK] Nothing to do");
    } else {
        let entries: usize = summary.artifacts.iter().map(|a| a.aggregated_size).sum();
        println!(
            "[OK] {} artifacts written to {} ({} entries)",
            summary.artifacts.len(),
            config.output_dir.display(),
            format_count(entries)
        );
    }

    Ok(())
}
