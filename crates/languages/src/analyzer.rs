//! Analyzer entry points
//!
//! Both entry points take a source document, the host's semantic model, a
//! character position (or range) and a profile. The document's own types
//! are layered over the host model, so types declared in the same file
//! resolve without the host knowing about them.

use tracing::debug;
use xamlgen_core::config::{Profile, Settings};
use xamlgen_core::error::{Error, Result};
use xamlgen_core::output::AnalyzerOutput;
use xamlgen_core::symbols::{LayeredModel, SemanticModel};
use xamlgen_generator::{GenerationOptions, Generator};

use crate::outline::{DocumentOutline, Target};
use crate::{create_analyzer, SourceLanguage};

/// Source text plus the language it is written in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    language: SourceLanguage,
    text: String,
}

impl SourceDocument {
    pub fn new(language: SourceLanguage, text: impl Into<String>) -> Self {
        Self {
            language,
            text: text.into(),
        }
    }

    pub fn language(&self) -> SourceLanguage {
        self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters, the unit of every position
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn outline(&self) -> Result<DocumentOutline> {
        create_analyzer(self.language)?.outline(&self.text)
    }
}

/// Generates XAML for positions and selections in source documents
#[derive(Debug, Clone, Default)]
pub struct XamlAnalyzer {
    options: GenerationOptions,
}

impl XamlAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: GenerationOptions) -> Self {
        Self { options }
    }

    /// Indentation, depth cap and excluded names from `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_options(GenerationOptions::from(settings))
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Output for the property or type at `position`
    ///
    /// A property gives property output, anywhere else inside a class,
    /// struct or record gives class output. Methods, fields, enums, and
    /// positions outside any type give the empty result.
    pub fn get_single_item_output(
        &self,
        document: &SourceDocument,
        model: &dyn SemanticModel,
        position: usize,
        profile: &Profile,
    ) -> Result<AnalyzerOutput> {
        let len = document.char_len();
        if position > len {
            return Err(Error::invalid_input(format!(
                "position {position} is beyond the end of the document ({len} characters)"
            )));
        }

        let outline = document.outline()?;
        let mut local = outline.type_index();
        local.merge_partials_from(model);
        let layered = LayeredModel::new(&local, model);
        let generator = Generator::new(profile, &layered).with_options(self.options.clone());

        let output = match outline.locate(position) {
            Target::Property { declared, index } => {
                generator.property_output(&declared.symbol.properties[index], &declared.symbol)
            }
            Target::Type(declared) => {
                let merged = local.find(&declared.symbol).unwrap_or(&declared.symbol);
                generator.class_output(merged)
            }
            Target::None => AnalyzerOutput::empty(),
        };

        debug!(
            position,
            output_type = %output.output_type,
            name = %output.name,
            "Single item output"
        );
        Ok(output)
    }

    /// Output for every property intersecting the selection
    ///
    /// The range is inclusive and may be given in either order.
    pub fn get_selection_output(
        &self,
        document: &SourceDocument,
        model: &dyn SemanticModel,
        start: usize,
        end: usize,
        profile: &Profile,
    ) -> Result<AnalyzerOutput> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let len = document.char_len();
        if start > len {
            return Err(Error::invalid_input(format!(
                "selection start {start} is beyond the end of the document ({len} characters)"
            )));
        }

        let outline = document.outline()?;
        let local = outline.type_index();
        let layered = LayeredModel::new(&local, model);
        let generator = Generator::new(profile, &layered).with_options(self.options.clone());

        let properties = outline.properties_in(start, end);
        debug!(start, end, property_count = properties.len(), "Selection output");
        Ok(generator.selection_output(properties))
    }
}

/// [`XamlAnalyzer::get_single_item_output`] with default options
pub fn get_single_item_output(
    document: &SourceDocument,
    model: &dyn SemanticModel,
    position: usize,
    profile: &Profile,
) -> Result<AnalyzerOutput> {
    XamlAnalyzer::new().get_single_item_output(document, model, position, profile)
}

/// [`XamlAnalyzer::get_selection_output`] with default options
pub fn get_selection_output(
    document: &SourceDocument,
    model: &dyn SemanticModel,
    start: usize,
    end: usize,
    profile: &Profile,
) -> Result<AnalyzerOutput> {
    XamlAnalyzer::new().get_selection_output(document, model, start, end, profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xamlgen_core::config::Mapping;
    use xamlgen_core::output::OutputType;
    use xamlgen_core::symbols::TypeIndex;

    fn profile() -> Profile {
        let mut profile = Profile::new("Test");
        profile.class_grouping = "StackPanel".to_string();
        profile.fallback_output = "<TextBlock Text=\"$name$\" />".to_string();
        profile.mappings = vec![Mapping::new("string", "<TextBox Text=\"{x:Bind $name$}\" />")];
        profile
    }

    const SOURCE: &str = "class Person\n{\n    public string Name { get; set; }\n    public void Save() { }\n}\n";

    #[test]
    fn test_position_beyond_document_is_rejected() {
        let document = SourceDocument::new(SourceLanguage::CSharp, SOURCE);
        let err = get_single_item_output(&document, &TypeIndex::new(), 1000, &profile())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_end_of_document_is_accepted() {
        let document = SourceDocument::new(SourceLanguage::CSharp, SOURCE);
        let output =
            get_single_item_output(&document, &TypeIndex::new(), document.char_len(), &profile())
                .unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_dispatch_by_target() {
        let document = SourceDocument::new(SourceLanguage::CSharp, SOURCE);
        let model = TypeIndex::new();

        let on_property = SOURCE.find("Name").unwrap();
        let output = get_single_item_output(&document, &model, on_property, &profile()).unwrap();
        assert_eq!(output.output_type, OutputType::Property);
        assert_eq!(output.output, "<TextBox Text=\"{x:Bind Name}\" />");

        let on_method = SOURCE.find("Save").unwrap();
        let output = get_single_item_output(&document, &model, on_method, &profile()).unwrap();
        assert!(output.is_empty());

        let on_class = SOURCE.find("Person").unwrap();
        let output = get_single_item_output(&document, &model, on_class, &profile()).unwrap();
        assert_eq!(output.output_type, OutputType::Class);
        assert_eq!(output.name, "Person");
    }

    #[test]
    fn test_reversed_selection() {
        let document = SourceDocument::new(SourceLanguage::CSharp, SOURCE);
        let model = TypeIndex::new();
        let a = SOURCE.find("public string").unwrap();
        let b = SOURCE.find("get;").unwrap();

        let forward = get_selection_output(&document, &model, a, b, &profile()).unwrap();
        let backward = get_selection_output(&document, &model, b, a, &profile()).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.output_type, OutputType::Selection);
        assert_eq!(forward.name, "Name");
    }
}
