//! Knobs that shape generation but are not part of a profile

use xamlgen_core::config::{FormattingConfig, GenerationConfig, Settings};

/// Formatting and recursion options for one generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Spaces per nesting level in reformatted output
    pub indent_size: usize,

    /// Deepest `$subprops$` nesting that is expanded
    pub max_sub_property_depth: usize,

    /// Banned property names; a trailing `*` matches by prefix
    pub excluded_properties: Vec<String>,
}

impl GenerationOptions {
    pub fn new(formatting: &FormattingConfig, generation: &GenerationConfig) -> Self {
        Self {
            indent_size: formatting.indent_size,
            max_sub_property_depth: generation.max_sub_property_depth,
            excluded_properties: generation.excluded_properties.clone(),
        }
    }

    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    pub fn with_max_sub_property_depth(mut self, depth: usize) -> Self {
        self.max_sub_property_depth = depth;
        self
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::new(&FormattingConfig::default(), &GenerationConfig::default())
    }
}

impl From<&Settings> for GenerationOptions {
    fn from(settings: &Settings) -> Self {
        Self::new(&settings.formatting, &settings.generation)
    }
}
