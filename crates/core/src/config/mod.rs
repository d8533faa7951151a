//! Configuration module for xamlgen
//!
//! Settings hold the named profiles that drive generation plus a few
//! formatting and recursion knobs. They can be loaded from TOML or JSON
//! files and/or environment variables.

mod defaults;
mod loading;

#[cfg(test)]
mod tests;

use crate::error::{Error, Result};
use crate::placeholder;
use crate::types::TypeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use defaults::*;

/// `class_grouping` keyword: a Grid with one row definition per row used
pub const GRID_WITH_ROW_DEFS: &str = "grid-plus-rowdefs";

/// `class_grouping` keyword: as [`GRID_WITH_ROW_DEFS`] plus two columns
pub const GRID_WITH_ROW_DEFS_AND_TWO_COLUMNS: &str = "grid-plus-rowdefs-2cols";

/// Reserved mapping type token matching any enum
pub const ENUM_TYPE_TOKEN: &str = "enum";

/// Reserved mapping type token matching any array
pub const ARRAY_TYPE_TOKEN: &str = "array";

/// Returns the path to the global settings file
///
/// The global settings are stored at `~/.xamlgen/settings.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".xamlgen").join("settings.toml"))
}

/// One type/name/read-only guarded rule producing a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Pipe-separated type patterns (`string|int`, `List<T>`, `enum`)
    #[serde(rename = "type")]
    pub type_names: String,

    /// Pipe-separated case-insensitive name fragments; empty matches any name
    #[serde(default)]
    pub name_contains: String,

    /// Must equal the member's read-only state
    #[serde(default)]
    pub if_read_only: bool,

    /// Template emitted for matching members
    pub output: String,
}

impl Mapping {
    pub fn new(type_names: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            type_names: type_names.into(),
            name_contains: String::new(),
            if_read_only: false,
            output: output.into(),
        }
    }

    pub fn with_name_contains(mut self, name_contains: impl Into<String>) -> Self {
        self.name_contains = name_contains.into();
        self
    }

    pub fn read_only(mut self) -> Self {
        self.if_read_only = true;
        self
    }

    /// Non-empty, trimmed type alternatives
    pub fn type_alternatives(&self) -> impl Iterator<Item = &str> {
        split_alternatives(&self.type_names)
    }

    /// Non-empty, trimmed name fragments
    pub fn name_alternatives(&self) -> impl Iterator<Item = &str> {
        split_alternatives(&self.name_contains)
    }
}

fn split_alternatives(value: &str) -> impl Iterator<Item = &str> {
    value.split('|').map(str::trim).filter(|s| !s.is_empty())
}

/// Named configuration controlling templates and mapping rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,

    /// Container element (optionally with attributes) or a grid keyword
    #[serde(default)]
    pub class_grouping: String,

    /// Template for top-level members no mapping matches
    #[serde(default)]
    pub fallback_output: String,

    /// Template for nested members no mapping matches
    #[serde(default)]
    pub sub_property_output: String,

    /// Template repeated once per enum element for `$members$`
    #[serde(default)]
    pub enum_member_output: String,

    /// Rules evaluated in order, first match wins
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

impl Profile {
    /// An empty profile: no grouping, no mappings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_grouping: String::new(),
            fallback_output: String::new(),
            sub_property_output: String::new(),
            enum_member_output: String::new(),
            mappings: Vec::new(),
        }
    }

    /// Parse a single profile from its JSON persisted form
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse profile JSON: {e}")))
    }

    /// Check templates and mapping types, collecting every problem found
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("profile name must not be empty".to_string());
        }

        let templates = [
            ("fallback_output", &self.fallback_output),
            ("sub_property_output", &self.sub_property_output),
            ("enum_member_output", &self.enum_member_output),
        ];
        for (field, template) in templates {
            for token in placeholder::unknown_tokens(template) {
                errors.push(format!(
                    "profile '{}': {field} contains unknown placeholder {token}",
                    self.name
                ));
            }
        }

        for (i, mapping) in self.mappings.iter().enumerate() {
            if mapping.type_alternatives().next().is_none() {
                errors.push(format!(
                    "profile '{}': mapping {i} has no type",
                    self.name
                ));
            }
            for alternative in mapping.type_alternatives() {
                let reserved = alternative.eq_ignore_ascii_case(ENUM_TYPE_TOKEN)
                    || alternative.eq_ignore_ascii_case(ARRAY_TYPE_TOKEN);
                if !reserved && TypeRef::parse(alternative).is_none() {
                    errors.push(format!(
                        "profile '{}': mapping {i} has invalid type '{alternative}'",
                        self.name
                    ));
                }
            }
            if mapping.output.trim().is_empty() {
                errors.push(format!(
                    "profile '{}': mapping {i} ({}) has no output",
                    self.name, mapping.type_names
                ));
            }
            for token in placeholder::unknown_tokens(&mapping.output) {
                errors.push(format!(
                    "profile '{}': mapping {i} ({}) contains unknown placeholder {token}",
                    self.name, mapping.type_names
                ));
            }
        }

        errors
    }
}

/// Output formatting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingConfig {
    /// Spaces per nesting level when re-indenting generated XAML
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
        }
    }
}

/// Member resolution and recursion configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Deepest nesting level `$subprops$` will expand
    #[serde(default = "default_max_sub_property_depth")]
    pub max_sub_property_depth: usize,

    /// Property names never emitted; a trailing `*` matches by prefix
    #[serde(default = "default_excluded_properties")]
    pub excluded_properties: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_sub_property_depth: default_max_sub_property_depth(),
            excluded_properties: default_excluded_properties(),
        }
    }
}

/// Main settings structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Name of the profile used for generation
    #[serde(default = "default_active_profile")]
    pub active_profile: String,

    #[serde(default)]
    pub formatting: FormattingConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default = "default_profiles")]
    pub profiles: Vec<Profile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_profile: default_active_profile(),
            formatting: FormattingConfig::default(),
            generation: GenerationConfig::default(),
            profiles: default_profiles(),
        }
    }
}

impl Settings {
    /// Look up a profile by name (case-insensitive)
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// The profile named by `active_profile`
    pub fn active(&self) -> Result<&Profile> {
        self.profile(&self.active_profile).ok_or_else(|| {
            Error::config(format!(
                "Active profile '{}' not found. Available: {:?}",
                self.active_profile,
                self.profile_names()
            ))
        })
    }

    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.profiles.is_empty() {
            return Err(Error::config("No profiles configured".to_string()));
        }

        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if !seen.insert(profile.name.to_lowercase()) {
                return Err(Error::config(format!(
                    "Duplicate profile name '{}'",
                    profile.name
                )));
            }
        }

        self.active()?;

        if self.formatting.indent_size > MAX_INDENT_SIZE {
            return Err(Error::config(format!(
                "formatting.indent_size too large (max {MAX_INDENT_SIZE}, got {})",
                self.formatting.indent_size
            )));
        }

        if self.generation.max_sub_property_depth == 0 {
            return Err(Error::config(
                "generation.max_sub_property_depth must be greater than 0".to_string(),
            ));
        }

        let errors: Vec<String> = self
            .profiles
            .iter()
            .flat_map(Profile::validation_errors)
            .collect();
        if !errors.is_empty() {
            return Err(Error::config(errors.join("; ")));
        }

        Ok(())
    }
}
