//! Sources command implementation.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;

/// List configured providers and their status
pub fn run(config_path: &Path) -> Result<()> {
    let config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        println!("No config file at {:?}, showing defaults", config_path);
        println!();
        Config::default()
    };

    println!("{:<20} {:<7} {:<8} SOURCES", "NAME", "FAMILY", "ENABLED");
    for provider in &config.providers {
        println!(
            "{:<20} {:<7} {:<8} {}",
            provider.name,
            provider.family.to_string(),
            if provider.enabled { "yes" } else { "no" },
            provider.urls.len()
        );
    }

    let enabled = config.enabled_providers().len();
    println!();
    println!("{} providers, {} enabled", config.providers.len(), enabled);

    Ok(())
}
