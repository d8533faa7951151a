//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;

use super::defaults::*;
use super::{global_config_path, Settings};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Settings {
    /// Loads settings from a TOML or JSON file with environment variable overrides
    ///
    /// The format follows the file extension. Environment variables are
    /// prefixed with `XAMLGEN_` and use double underscores for nested values:
    /// - `XAMLGEN_ACTIVE_PROFILE=UWP Grid`
    /// - `XAMLGEN_FORMATTING__INDENT_SIZE=2`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        let builder = set_config_default(builder, "active_profile", default_active_profile())?;
        let builder = set_config_default(
            builder,
            "formatting.indent_size",
            default_indent_size() as i64,
        )?;
        let mut builder = set_config_default(
            builder,
            "generation.max_sub_property_depth",
            default_max_sub_property_depth() as i64,
        )?;

        // Add the settings file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("XAMLGEN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build settings: {e}")))?;

        settings
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize settings: {e}")))
    }

    /// Creates settings from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Creates settings from the JSON persisted form
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse JSON: {e}")))
    }

    /// Serialize to TOML, e.g. to seed a settings file with the defaults
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize settings: {e}")))
    }

    /// Load settings from a single file
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Settings file (~/.xamlgen/settings.toml or custom --config path)
    /// 3. Environment variables (XAMLGEN_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
