//! CLI argument parsing with clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::prefix::Family;

#[derive(Parser)]
#[command(name = "rangepress")]
#[command(author, version, about = "Prefix list aggregator and ruleset builder")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "rangepress.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only, for cron/systemd timer)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all sources, aggregate and emit artifacts
    Run {
        /// Stop after the plaintext artifacts (skip the binary compile)
        #[arg(long)]
        text_only: bool,

        /// Pool all providers of one family into a combined artifact
        #[arg(long)]
        merge: bool,
    },

    /// Aggregate prefix lists from files or stdin to stdout
    Aggregate {
        /// Address family of the input
        #[arg(long, short, value_enum, default_value = "ipv4")]
        family: FamilyArg,

        /// Input files (reads stdin when omitted)
        files: Vec<PathBuf>,
    },

    /// List configured providers and their status
    Sources,

    /// Write a commented default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}

/// Address family as a command line value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    Ipv4,
    Ipv6,
}

impl From<FamilyArg> for Family {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Ipv4 => Family::Ipv4,
            FamilyArg::Ipv6 => Family::Ipv6,
        }
    }
}
