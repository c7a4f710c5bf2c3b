//! Configuration management for rangepress.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::prefix::Family;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ruleset providers, processed in order of appearance
    pub providers: Vec<Provider>,

    /// Pool all enabled providers of one family into a single artifact
    pub merge: bool,

    /// Directory for emitted artifacts, created on demand
    pub output_dir: PathBuf,

    /// External binary-format compiler
    pub compiler: CompilerConfig,

    /// Fetch behaviour
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            merge: false,
            output_dir: PathBuf::from("output"),
            compiler: CompilerConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let mut names: HashSet<&str> = HashSet::new();
        for provider in &self.providers {
            if provider.name.is_empty() {
                anyhow::bail!("Provider with empty name");
            }
            if !names.insert(provider.name.as_str()) {
                anyhow::bail!("Duplicate provider name '{}'", provider.name);
            }
            if provider.enabled {
                if provider.urls.is_empty() {
                    anyhow::bail!("Provider '{}' has no source URLs", provider.name);
                }
                for url in &provider.urls {
                    if !url.starts_with("https://") {
                        anyhow::bail!(
                            "Provider '{}' URL must use HTTPS: {}",
                            provider.name,
                            url
                        );
                    }
                }
            }
        }

        if self.compiler.enabled && self.compiler.program.is_empty() {
            anyhow::bail!("Compiler is enabled but no program is configured");
        }

        if self.fetch.concurrency == 0 {
            anyhow::bail!("fetch.concurrency must be at least 1");
        }
        if self.fetch.timeout_secs == 0 {
            anyhow::bail!("fetch.timeout_secs must be at least 1");
        }
        if self.fetch.max_retries == 0 {
            anyhow::bail!("fetch.max_retries must be at least 1");
        }

        Ok(())
    }

    /// Save configuration to YAML file atomically
    ///
    /// Uses tempfile + rename pattern to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let path = path.as_ref();
        let content = serde_yaml::to_string(self).with_context(|| "Failed to serialize config")?;

        // Create temporary file in the same directory for atomic rename
        let parent_dir = path.parent().unwrap_or(Path::new("."));
        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .context("Failed to create temporary file for config")?;

        // Write content and ensure it's flushed to disk
        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;

        // Atomically rename temp file to target
        temp_file
            .persist(path)
            .with_context(|| format!("Failed to persist config file: {:?}", path))?;

        Ok(())
    }

    /// Get the providers taking part in a run
    pub fn enabled_providers(&self) -> Vec<&Provider> {
        self.providers.iter().filter(|p| p.enabled).collect()
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}

/// One named source of prefix lists.
///
/// A provider may have several plaintext sources; their lines are pooled into
/// one corpus for that provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provider {
    pub name: String,
    pub family: Family,
    pub urls: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompilerConfig {
    /// External ruleset compiler binary
    pub program: String,
    /// Input format label passed to the compiler
    pub format: String,
    /// With `false` the run stops after the plaintext artifacts
    pub enabled: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: "mihomo".to_string(),
            format: "text".to_string(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per URL before giving up on it
    pub max_retries: u32,
    /// Maximum concurrent downloads
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_retries: 3,
            concurrency: 6,
        }
    }
}

fn default_providers() -> Vec<Provider> {
    const IPRANGES_BASE: &str = "https://raw.githubusercontent.com/lord-alfred/ipranges/main";

    vec![
        Provider {
            name: "amazon_ipv4".to_string(),
            family: Family::Ipv4,
            urls: vec![format!("{}/amazon/ipv4_merged.txt", IPRANGES_BASE)],
            enabled: true,
        },
        Provider {
            name: "microsoft_ipv4".to_string(),
            family: Family::Ipv4,
            urls: vec![format!("{}/microsoft/ipv4_merged.txt", IPRANGES_BASE)],
            enabled: true,
        },
        Provider {
            name: "github_ipv4".to_string(),
            family: Family::Ipv4,
            urls: vec![format!("{}/github/ipv4_merged.txt", IPRANGES_BASE)],
            enabled: true,
        },
    ]
}
