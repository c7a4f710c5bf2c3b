//! Init command implementation.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::output::write_atomic;

/// Write the commented default config file
pub fn run(force: bool, config_path: &Path) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file {:?} already exists (use --force to overwrite)",
            config_path
        );
    }

    write_atomic(config_path, &Config::generate_default_yaml())?;
    println!("[OK] Config written to {}", config_path.display());

    Ok(())
}
