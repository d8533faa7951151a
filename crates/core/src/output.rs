//! The result handed back to the host after a generation call

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// What a generation call produced output for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutputType {
    /// Nothing was found at the position or in the selection
    None,
    /// A single property
    Property,
    /// A whole class or struct
    Class,
    /// The properties intersecting a selection
    Selection,
}

/// Generated XAML plus the metadata the host needs to present it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerOutput {
    /// Display name: member name, type name, or a selection summary
    pub name: String,

    /// Assembled XAML
    pub output: String,

    /// Kind of target the output was generated for
    pub output_type: OutputType,
}

impl AnalyzerOutput {
    /// The canonical "nothing found" result
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            output: String::new(),
            output_type: OutputType::None,
        }
    }

    pub fn new(name: impl Into<String>, output: impl Into<String>, output_type: OutputType) -> Self {
        Self {
            name: name.into(),
            output: output.into(),
            output_type,
        }
    }

    /// True when this is the "nothing found" sentinel
    pub fn is_empty(&self) -> bool {
        self.output_type == OutputType::None
    }
}

impl Default for AnalyzerOutput {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_output_is_sentinel() {
        let output = AnalyzerOutput::empty();
        assert!(output.is_empty());
        assert_eq!(output.name, "");
        assert_eq!(output.output, "");
        assert_eq!(output.output_type.to_string(), "none");
    }

    #[test]
    fn test_non_empty_output() {
        let output = AnalyzerOutput::new("Name", "<TextBox />", OutputType::Property);
        assert!(!output.is_empty());
    }
}
