//! Library interface for the xamlgen CLI
//!
//! This module exposes the command plumbing for integration testing while
//! keeping argument parsing and logging setup in main.rs.

pub mod init;

use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use xamlgen_core::config::{Profile, Settings};
use xamlgen_core::output::AnalyzerOutput;
use xamlgen_languages::{detect_language, ProjectModel, SourceDocument, XamlAnalyzer};

/// Where a caret position comes from on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caret {
    /// Zero-based character offset
    Offset(usize),
    /// One-based line and column
    LineColumn { line: usize, column: usize },
}

impl Caret {
    /// Character offset of this caret in `text`
    pub fn resolve(self, text: &str) -> Result<usize> {
        match self {
            Caret::Offset(offset) => Ok(offset),
            Caret::LineColumn { line, column } => line_column_to_offset(text, line, column),
        }
    }
}

/// Convert a one-based line and column to a zero-based character offset
pub fn line_column_to_offset(text: &str, line: usize, column: usize) -> Result<usize> {
    if line == 0 || column == 0 {
        bail!("line and column are one-based");
    }

    let mut offset = 0;
    for (index, content) in text.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let width = content.trim_end_matches(['\n', '\r']).chars().count();
            if column > width + 1 {
                bail!("column {column} is past the end of line {line} ({width} characters)");
            }
            return Ok(offset + column - 1);
        }
        offset += content.chars().count();
    }

    // A caret on the empty line after a trailing newline
    if column == 1 && line == text.split_inclusive('\n').count() + 1 {
        return Ok(offset);
    }
    Err(anyhow!("line {line} is past the end of the document"))
}

/// Load settings and apply a profile override
pub fn load_settings(config_path: Option<&Path>, profile: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load settings")?;
    if let Some(name) = profile {
        settings.active_profile = name.to_string();
    }
    settings.validate().context("Invalid settings")?;
    debug!(active_profile = %settings.active_profile, "Loaded settings");
    Ok(settings)
}

/// Read a source document, detecting its language from the extension
pub fn read_document(path: &Path) -> Result<SourceDocument> {
    let language = detect_language(path)
        .ok_or_else(|| anyhow!("Unsupported source file: {}", path.display()))?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(SourceDocument::new(language, text))
}

/// Build the semantic model from referenced source files and metadata
pub fn build_project(references: &[PathBuf], metadata: &[PathBuf]) -> Result<ProjectModel> {
    let mut project = ProjectModel::new();

    for path in references {
        let document = read_document(path)?;
        let count = project
            .add_document(&document)
            .with_context(|| format!("Failed to analyze {}", path.display()))?;
        debug!(path = %path.display(), count, "Added referenced document");
    }

    for path in metadata {
        project
            .load_metadata_file(path)
            .with_context(|| format!("Failed to load metadata {}", path.display()))?;
    }

    info!(type_count = project.len(), "Built project model");
    Ok(project)
}

/// Everything needed to answer a generation request
pub struct Session {
    pub settings: Settings,
    pub project: ProjectModel,
    pub analyzer: XamlAnalyzer,
}

impl Session {
    pub fn new(settings: Settings, project: ProjectModel) -> Self {
        let analyzer = XamlAnalyzer::from_settings(&settings);
        Self {
            settings,
            project,
            analyzer,
        }
    }

    pub fn profile(&self) -> Result<&Profile> {
        Ok(self.settings.active()?)
    }

    /// Generate for the item under the caret in `document`
    pub fn generate(&self, document: &SourceDocument, caret: Caret) -> Result<AnalyzerOutput> {
        let position = caret.resolve(document.text())?;
        Ok(self.analyzer.get_single_item_output(
            document,
            &self.project,
            position,
            self.profile()?,
        )?)
    }

    /// Generate for every property intersecting the selection
    pub fn selection(
        &self,
        document: &SourceDocument,
        start: Caret,
        end: Caret,
    ) -> Result<AnalyzerOutput> {
        let start = start.resolve(document.text())?;
        let end = end.resolve(document.text())?;
        Ok(self.analyzer.get_selection_output(
            document,
            &self.project,
            start,
            end,
            self.profile()?,
        )?)
    }
}

/// Text printed for an output: the XAML, or the full result as JSON
pub fn render_output(output: &AnalyzerOutput, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(output)?);
    }
    Ok(output.output.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column_to_offset() {
        let text = "ab\ncdé\n";
        assert_eq!(line_column_to_offset(text, 1, 1).unwrap(), 0);
        assert_eq!(line_column_to_offset(text, 2, 1).unwrap(), 3);
        assert_eq!(line_column_to_offset(text, 2, 4).unwrap(), 6);
        assert_eq!(line_column_to_offset(text, 3, 1).unwrap(), 7);
        assert!(line_column_to_offset(text, 2, 6).is_err());
        assert!(line_column_to_offset(text, 4, 1).is_err());
        assert!(line_column_to_offset(text, 0, 1).is_err());
    }
}
