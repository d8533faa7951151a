#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Language front doors and the analyzer entry points
//!
//! Each supported language registers a [`LanguageDescriptor`] that builds a
//! [`DocumentAnalyzer`]. The analyzer turns source text into a
//! [`DocumentOutline`]; everything after that is language-agnostic.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};
use xamlgen_core::error::{Error, Result};

mod csharp;
mod vb;

pub mod analyzer;
pub mod outline;
pub mod project;

pub use analyzer::{get_selection_output, get_single_item_output, SourceDocument, XamlAnalyzer};
pub use outline::{DeclaredType, DocumentOutline, OffsetMap, Span, Target};
pub use project::ProjectModel;

/// Source languages with a front door
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum SourceLanguage {
    #[strum(to_string = "csharp", serialize = "cs", serialize = "c#")]
    CSharp,
    #[strum(to_string = "vb", serialize = "visualbasic", serialize = "visual_basic")]
    VisualBasic,
}

/// Produces an outline of a source document
pub trait DocumentAnalyzer: Send + Sync {
    fn language(&self) -> SourceLanguage;

    /// Parse `source` and describe its declared types
    fn outline(&self, source: &str) -> Result<DocumentOutline>;
}

/// Language descriptor for automatic registration
pub struct LanguageDescriptor {
    pub language: SourceLanguage,
    pub extensions: &'static [&'static str],
    pub factory: fn() -> Result<Box<dyn DocumentAnalyzer>>,
}

inventory::collect!(LanguageDescriptor);

/// Create the front door for a language
pub fn create_analyzer(language: SourceLanguage) -> Result<Box<dyn DocumentAnalyzer>> {
    for descriptor in inventory::iter::<LanguageDescriptor> {
        if descriptor.language == language {
            return (descriptor.factory)();
        }
    }
    Err(Error::unsupported_language(language.to_string()))
}

/// Get the source language from a file path
///
/// This is a utility function for determining language from file extension
pub fn detect_language(file_path: &Path) -> Option<SourceLanguage> {
    let extension = file_path.extension()?.to_str()?;
    let ext_lower = extension.to_lowercase();

    for descriptor in inventory::iter::<LanguageDescriptor> {
        if descriptor.extensions.contains(&ext_lower.as_str()) {
            return Some(descriptor.language);
        }
    }

    None
}
