//! # rangepress - prefix list aggregator and ruleset builder
//!
//! Fetches published IP range lists, collapses them into minimal CIDR sets
//! and compiles binary rulesets for proxy clients.
//!
//! ## Features
//!
//! - **Minimal Output** - two-phase aggregation emits the smallest equivalent CIDR set
//! - **Relaxed Input** - bare addresses, inline comments and junk lines handled per line
//! - **Concurrent Fetch** - bounded parallel downloads with retry and size limits
//! - **Merge Mode** - pool all providers of one family into a combined artifact
//! - **Atomic Artifacts** - outputs written via tempfile + rename, never half-visible
//! - **Binary Rulesets** - compiles .mrs files through an external compiler (mihomo)
//! - **HTTPS Only** - all source URLs must use HTTPS
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       rangepress                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: run, aggregate, sources, init, version     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Providers, merge mode, compiler, fetch limits        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls)                                 │
//! │    └── Published range lists (Amazon, Microsoft, GitHub...) │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Corpus + Aggregator                                        │
//! │    └── Normalization, dedup, minimal CIDR cover             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Compiler (CommandExecutor trait)                           │
//! │    └── External binary ruleset compiler (mihomo)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use rangepress::compiler::RulesetCompiler;
//! use rangepress::config::Config;
//! use rangepress::pipeline::{self, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = Config::load("rangepress.yaml")?;
//!
//!     // Fetch, aggregate and emit artifacts
//!     let compiler = RulesetCompiler::new(&config.compiler);
//!     let summary = pipeline::run(&config, &compiler, &RunOptions::default()).await?;
//!
//!     for artifact in &summary.artifacts {
//!         println!("{}: {} entries", artifact.name, artifact.aggregated_size);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`] - two-phase CIDR aggregation
//! - [`cli`] - command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`compiler`] - external ruleset compiler invocation
//! - [`config`] - configuration parsing and validation
//! - [`corpus`] - deduplicated per-family prefix collection
//! - [`error`] - run failure taxonomy
//! - [`fetcher`] - HTTP client for downloading range lists
//! - [`normalizer`] - single-line prefix normalization
//! - [`output`] - artifact paths and atomic writes
//! - [`pipeline`] - end-to-end run driver
//! - [`prefix`] - CIDR prefix type and bit-level operations
//! - [`utils`] - common formatting helpers

pub mod aggregator;
pub mod cli;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod corpus;
pub mod error;
pub mod fetcher;
pub mod normalizer;
pub mod output;
pub mod pipeline;
pub mod prefix;
pub mod utils;

pub use aggregator::{aggregate, AggregatedPrefixes};
pub use cli::{Cli, Commands};
pub use config::Config;
pub use corpus::Corpus;
pub use error::RangepressError;
pub use prefix::{Family, Prefix};
