//! Settings file initialization
//!
//! Seeds a settings file with the built-in defaults so profiles can be
//! edited by hand.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use xamlgen_core::config::{global_config_path, Settings};

/// Write the default settings to `config_path` (or the global location)
///
/// An existing file is only replaced when `force` is set. Returns the path
/// written.
pub fn init_settings(config_path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => global_config_path()?,
    };

    if path.exists() && !force {
        bail!(
            "Settings file already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = Settings::default().to_toml_string()?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Wrote default settings");
    Ok(path)
}
