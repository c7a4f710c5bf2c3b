//! Aggregate command implementation.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::PathBuf;
use tracing::warn;

use crate::aggregator::aggregate;
use crate::corpus::Corpus;
use crate::error::RangepressError;
use crate::prefix::Family;
use crate::utils::format_count;

/// Aggregate prefix lists from files (or stdin) and print the result
pub fn run(family: Family, files: &[PathBuf]) -> Result<()> {
    let mut corpus = Corpus::new(family);

    if files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        corpus.ingest(&input);
    } else {
        for file in files {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            corpus.ingest(&content);
        }
    }

    if corpus.rejected() > 0 {
        warn!(
            "Rejected {} of {} lines",
            format_count(corpus.rejected()),
            format_count(corpus.raw_lines())
        );
    }

    if corpus.is_empty() {
        return Err(RangepressError::EmptyCorpus(family.to_string()).into());
    }

    let aggregated = aggregate(&corpus);
    print!("{}", aggregated.to_plaintext());

    Ok(())
}
