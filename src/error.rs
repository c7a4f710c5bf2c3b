//! Error types for rangepress.
//!
//! Parse failures are deliberately not here: they are a local classification
//! inside the normalizer, counted and never propagated. Fetch errors degrade
//! a single source; empty-corpus and compiler errors abort the run.

use std::fmt;

// Display and Error are implemented by hand: thiserror's derive treats a
// field named `source` as the error source and requires it to implement
// `Error`, which a plain `String` URL does not.
#[derive(Debug)]
pub enum RangepressError {
    /// One source URL could not be fetched. Recovered locally: the source
    /// contributes nothing and the run continues.
    Fetch { source: String, reason: String },

    /// A requested aggregation unit ended up with zero valid prefixes after
    /// all of its sources were processed. Fatal.
    EmptyCorpus(String),

    /// The external ruleset compiler exited non-zero. Fatal, with its
    /// diagnostics attached. `code` is -1 when the process was killed by a
    /// signal.
    Compiler { code: i32, stderr: String },
}

impl fmt::Display for RangepressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangepressError::Fetch { source, reason } => {
                write!(f, "failed to fetch {source}: {reason}")
            }
            RangepressError::EmptyCorpus(unit) => {
                write!(f, "no valid prefixes collected for {unit}")
            }
            RangepressError::Compiler { code, stderr } => {
                write!(f, "ruleset compiler exited with status {code}: {stderr}")
            }
        }
    }
}

impl std::error::Error for RangepressError {}
