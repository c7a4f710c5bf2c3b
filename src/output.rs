//! Artifact paths and atomic file writes.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Path of the plaintext artifact for a unit
pub fn text_artifact_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.txt", name))
}

/// Path of the compiled binary artifact for a unit
pub fn ruleset_artifact_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.mrs", name))
}

/// Write a file atomically
///
/// Uses tempfile + rename in the target directory so readers never observe
/// a partially written artifact. Parent directories are created on demand.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent_dir)
        .with_context(|| format!("Failed to create directory: {:?}", parent_dir))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", parent_dir))?;

    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {:?}", path))?;

    Ok(())
}
