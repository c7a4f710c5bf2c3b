//! End-to-end run pipeline: plan, fetch, aggregate, emit.
//!
//! The run is organised around aggregation units. In split mode every
//! enabled provider is its own unit; in merge mode all providers of one
//! address family pool into a single combined unit. Each unit becomes one
//! plaintext artifact and, unless compilation is off, one binary ruleset.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::aggregator::aggregate;
use crate::compiler::{CommandExecutor, RulesetCompiler};
use crate::config::Config;
use crate::corpus::Corpus;
use crate::error::RangepressError;
use crate::fetcher::{FetchJob, Fetcher};
use crate::output::{ruleset_artifact_path, text_artifact_path, write_atomic};
use crate::prefix::Family;
use crate::utils::format_count;

/// Per-invocation switches layered over the config file
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Stop after the plaintext artifacts
    pub text_only: bool,
    /// Pool providers per family instead of one artifact per provider
    pub merge: bool,
}

/// One aggregation unit: a named artifact and the sources feeding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPlan {
    pub name: String,
    pub family: Family,
    pub urls: Vec<String>,
}

/// A unit plan together with its downloaded source bodies
#[derive(Debug)]
pub struct UnitInput {
    pub plan: UnitPlan,
    pub bodies: Vec<String>,
    pub failed: usize,
}

/// Counters for one emitted artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub name: String,
    pub family: Family,
    pub source_count: usize,
    pub fetched_count: usize,
    pub failed_count: usize,
    pub raw_lines: usize,
    pub rejected_lines: usize,
    pub corpus_size: usize,
    pub aggregated_size: usize,
    pub compiled: bool,
}

/// Written to `summary.json` next to the artifacts after every run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub artifacts: Vec<ArtifactSummary>,
}

/// Decide the aggregation units for a run.
///
/// Split mode yields one unit per enabled provider, in config order. Merge
/// mode pools enabled providers per family into `combined_ipv4` and
/// `combined_ipv6` units; a family with no providers yields no unit.
pub fn plan_units(config: &Config, merge: bool) -> Vec<UnitPlan> {
    let providers = config.enabled_providers();

    if merge {
        let mut units = Vec::new();
        for family in [Family::Ipv4, Family::Ipv6] {
            let urls: Vec<String> = providers
                .iter()
                .filter(|p| p.family == family)
                .flat_map(|p| p.urls.iter().cloned())
                .collect();
            if !urls.is_empty() {
                units.push(UnitPlan {
                    name: format!("combined_{}", family),
                    family,
                    urls,
                });
            }
        }
        units
    } else {
        providers
            .into_iter()
            .map(|p| UnitPlan {
                name: p.name.clone(),
                family: p.family,
                urls: p.urls.clone(),
            })
            .collect()
    }
}

/// Download every source of every unit, regrouping bodies by unit.
///
/// Individual download failures are logged and counted, never propagated.
/// A unit that lost every source comes back with no bodies and is caught
/// later as an empty corpus.
pub async fn fetch_units(fetcher: &Fetcher, plans: Vec<UnitPlan>) -> Vec<UnitInput> {
    let jobs: Vec<FetchJob> = plans
        .iter()
        .flat_map(|plan| {
            plan.urls.iter().map(|url| FetchJob {
                unit: plan.name.clone(),
                url: url.clone(),
            })
        })
        .collect();

    let results = fetcher.fetch_all(jobs).await;

    let mut bodies: HashMap<String, Vec<String>> = HashMap::new();
    let mut failures: HashMap<String, usize> = HashMap::new();
    for result in results {
        match result.outcome {
            Ok(body) => bodies.entry(result.job.unit).or_default().push(body),
            Err(e) => {
                warn!("{}", e);
                *failures.entry(result.job.unit).or_default() += 1;
            }
        }
    }

    plans
        .into_iter()
        .map(|plan| {
            let unit_bodies = bodies.remove(&plan.name).unwrap_or_default();
            let failed = failures.remove(&plan.name).unwrap_or(0);
            if unit_bodies.is_empty() {
                error!("All sources failed for {}", plan.name);
            }
            UnitInput {
                plan,
                bodies: unit_bodies,
                failed,
            }
        })
        .collect()
}

/// Aggregate each unit and emit its artifacts.
///
/// A unit whose corpus ends up empty is skipped so the remaining units
/// still get fresh artifacts, but the run as a whole then fails naming
/// the empty units. Compiler failures abort immediately.
pub fn process_units<E: CommandExecutor>(
    config: &Config,
    compiler: &RulesetCompiler<E>,
    text_only: bool,
    units: Vec<UnitInput>,
) -> Result<RunSummary> {
    let mut artifacts = Vec::with_capacity(units.len());
    let mut empty_units: Vec<String> = Vec::new();

    for unit in units {
        let mut corpus = Corpus::new(unit.plan.family);
        for body in &unit.bodies {
            corpus.ingest(body);
        }

        if corpus.rejected() > 0 {
            warn!(
                "{}: rejected {} of {} lines",
                unit.plan.name,
                format_count(corpus.rejected()),
                format_count(corpus.raw_lines())
            );
        }

        if corpus.is_empty() {
            error!("{}: no valid prefixes collected", unit.plan.name);
            empty_units.push(unit.plan.name);
            continue;
        }

        let aggregated = aggregate(&corpus);
        info!(
            "{}: aggregated {} prefixes into {} entries",
            unit.plan.name,
            format_count(corpus.len()),
            format_count(aggregated.len())
        );

        let text_path = text_artifact_path(&config.output_dir, &unit.plan.name);
        write_atomic(&text_path, &aggregated.to_plaintext())
            .with_context(|| format!("Failed to write artifact for {}", unit.plan.name))?;

        let mut compiled = false;
        if !text_only {
            let ruleset_path = ruleset_artifact_path(&config.output_dir, &unit.plan.name);
            compiler
                .convert(&text_path, &ruleset_path)
                .with_context(|| format!("Failed to compile ruleset for {}", unit.plan.name))?;
            info!("{}: compiled {}", unit.plan.name, ruleset_path.display());
            compiled = true;
        }

        artifacts.push(ArtifactSummary {
            name: unit.plan.name,
            family: unit.plan.family,
            source_count: unit.plan.urls.len(),
            fetched_count: unit.bodies.len(),
            failed_count: unit.failed,
            raw_lines: corpus.raw_lines(),
            rejected_lines: corpus.rejected(),
            corpus_size: corpus.len(),
            aggregated_size: aggregated.len(),
            compiled,
        });
    }

    if !empty_units.is_empty() {
        return Err(RangepressError::EmptyCorpus(empty_units.join(", ")).into());
    }

    let summary = RunSummary {
        generated_at: Utc::now(),
        artifacts,
    };

    let summary_path = config.output_dir.join("summary.json");
    let json = serde_json::to_string_pretty(&summary).context("Failed to serialize run summary")?;
    write_atomic(&summary_path, &json).context("Failed to write run summary")?;

    Ok(summary)
}

/// Run the full pipeline with the given config and compiler.
pub async fn run<E: CommandExecutor>(
    config: &Config,
    compiler: &RulesetCompiler<E>,
    options: &RunOptions,
) -> Result<RunSummary> {
    let merge = options.merge || config.merge;
    let text_only = options.text_only || !config.compiler.enabled;

    let plans = plan_units(config, merge);
    if plans.is_empty() {
        warn!("No enabled providers, nothing to do");
        return Ok(RunSummary {
            generated_at: Utc::now(),
            artifacts: Vec::new(),
        });
    }

    let fetcher = Fetcher::new(&config.fetch)?;
    let units = fetch_units(&fetcher, plans).await;
    process_units(config, compiler, text_only, units)
}
