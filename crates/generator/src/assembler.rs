//! Output assembly for a property, a whole type or a selection

use tracing::debug;
use xamlgen_core::config::{Profile, GRID_WITH_ROW_DEFS, GRID_WITH_ROW_DEFS_AND_TWO_COLUMNS};
use xamlgen_core::output::{AnalyzerOutput, OutputType};
use xamlgen_core::placeholder::{self, Placeholder};
use xamlgen_core::symbols::{PropertySymbol, SemanticModel, TypeSymbol};

use crate::classifier::{ClassifiedMember, SubProperties, TypeClassifier};
use crate::context::GenerationContext;
use crate::formatting::format_xaml;
use crate::matcher::MappingMatcher;
use crate::members::MemberResolver;
use crate::naming::{element_name_suffix, name_with_spaces};
use crate::options::GenerationOptions;
use crate::placeholders::{substitute, PlaceholderSource};

/// Body of a grouped type that has nothing to show
pub const NO_PROPERTIES_COMMENT: &str = "<!-- No accessible properties when copying as XAML -->";

/// Generates XAML for one profile against one semantic model
pub struct Generator<'a> {
    profile: &'a Profile,
    model: &'a dyn SemanticModel,
    matcher: MappingMatcher<'a>,
    options: GenerationOptions,
}

impl<'a> Generator<'a> {
    pub fn new(profile: &'a Profile, model: &'a dyn SemanticModel) -> Self {
        Self {
            profile,
            model,
            matcher: MappingMatcher::new(&profile.mappings),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn profile(&self) -> &Profile {
        self.profile
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    fn resolver(&self) -> MemberResolver<'_> {
        MemberResolver::new(self.model, &self.options.excluded_properties)
    }

    fn classifier(&self) -> TypeClassifier<'a> {
        TypeClassifier::new(self.model)
    }

    /// Output for a single property declared on `declaring_type`
    ///
    /// Static, write-only and banned properties produce the empty result.
    pub fn property_output(
        &self,
        property: &PropertySymbol,
        declaring_type: &TypeSymbol,
    ) -> AnalyzerOutput {
        if !self.resolver().is_exposed(property) {
            debug!(property = %property.name, "Property is not exposed, nothing to generate");
            return AnalyzerOutput::empty();
        }

        let mut ctx = GenerationContext::new();
        let member = self.classifier().classify(property, Some(declaring_type));
        match self.render_member(&member, false, &mut ctx) {
            Some(xaml) => AnalyzerOutput::new(
                &property.name,
                format_xaml(&xaml, self.options.indent_size),
                OutputType::Property,
            ),
            None => AnalyzerOutput::empty(),
        }
    }

    /// Output for every exposed member of `ty`, wrapped in the class grouping
    pub fn class_output(&self, ty: &TypeSymbol) -> AnalyzerOutput {
        let mut ctx = GenerationContext::new();
        let classifier = self.classifier();
        let members = self.resolver().resolve(ty);

        let fragments: Vec<String> = members
            .iter()
            .filter_map(|m| {
                let member = classifier.classify(&m.property, Some(m.declaring_type));
                self.render_member(&member, false, &mut ctx)
            })
            .collect();

        debug!(
            type_name = %ty.full_name(),
            profile = %self.profile.name,
            member_count = members.len(),
            fragment_count = fragments.len(),
            "Generated class output"
        );

        let body = if fragments.is_empty() {
            NO_PROPERTIES_COMMENT.to_string()
        } else {
            fragments.join("\n")
        };
        let xaml = self.wrap_in_grouping(&body, ctx.rows_used());

        AnalyzerOutput::new(
            &ty.name,
            format_xaml(&xaml, self.options.indent_size),
            OutputType::Class,
        )
    }

    /// Output for selected properties, in the order given
    ///
    /// Fragments are joined with newlines; there is no container and no
    /// reformatting.
    pub fn selection_output<'s, I>(&self, properties: I) -> AnalyzerOutput
    where
        I: IntoIterator<Item = (&'s PropertySymbol, &'s TypeSymbol)>,
    {
        let mut ctx = GenerationContext::new();
        let resolver = self.resolver();
        let classifier = self.classifier();
        let mut names = Vec::new();
        let mut fragments = Vec::new();

        for (property, declaring_type) in properties {
            if !resolver.is_exposed(property) {
                continue;
            }
            let member = classifier.classify(property, Some(declaring_type));
            if let Some(fragment) = self.render_member(&member, false, &mut ctx) {
                names.push(property.name.as_str());
                fragments.push(fragment);
            }
        }

        if fragments.is_empty() {
            return AnalyzerOutput::empty();
        }

        AnalyzerOutput::new(
            selection_name(&names),
            fragments.join("\n"),
            OutputType::Selection,
        )
    }

    /// Pick the template for `member` and substitute it
    ///
    /// Returns `None` when the chosen template asks for no output.
    fn render_member(
        &self,
        member: &ClassifiedMember<'a>,
        nested: bool,
        ctx: &mut GenerationContext,
    ) -> Option<String> {
        let template = match self.matcher.find(member) {
            Some(mapping) => {
                debug!(
                    member = %member.name,
                    type_name = %member.type_name,
                    mapping = %mapping.type_names,
                    "Matched mapping"
                );
                mapping.output.as_str()
            }
            None if nested => self.profile.sub_property_output.as_str(),
            None => self.profile.fallback_output.as_str(),
        };

        if placeholder::contains(template, Placeholder::NoOutput) {
            debug!(member = %member.name, "Template suppresses output");
            return None;
        }

        Some(self.render_template(template, member, None, ctx))
    }

    fn render_template(
        &self,
        template: &str,
        member: &ClassifiedMember<'a>,
        element: Option<&str>,
        ctx: &mut GenerationContext,
    ) -> String {
        let mut renderer = MemberRenderer {
            generator: self,
            member,
            element,
            ctx,
            xname: None,
        };
        let output = substitute(template, &mut renderer);

        if let Some(name) = renderer.xname.take() {
            renderer.ctx.set_previous_xname(name);
        }
        output
    }

    fn render_sub_properties(&self, member: &ClassifiedMember<'a>, ctx: &mut GenerationContext) -> String {
        match member.sub_properties {
            SubProperties::None => String::new(),
            SubProperties::Unknown => {
                let saved = ctx.begin_group();
                let output = self.render_template(
                    &self.profile.sub_property_output,
                    &ClassifiedMember::blank(),
                    None,
                    ctx,
                );
                ctx.end_group(saved);
                output
            }
            SubProperties::Members(ty) => {
                let type_name = ty.full_name();
                if !ctx.enter_type(&type_name, self.options.max_sub_property_depth) {
                    debug!(
                        type_name = %type_name,
                        depth = ctx.depth(),
                        "Skipping sub-property expansion"
                    );
                    return String::new();
                }

                let saved = ctx.begin_group();
                let classifier = self.classifier();
                let fragments: Vec<String> = self
                    .resolver()
                    .resolve(ty)
                    .iter()
                    .filter_map(|m| {
                        let sub_member = classifier.classify(&m.property, Some(m.declaring_type));
                        self.render_member(&sub_member, true, ctx)
                    })
                    .collect();
                ctx.end_group(saved);
                ctx.leave_type();

                fragments.join("\n")
            }
        }
    }

    fn render_enum_members(&self, member: &ClassifiedMember<'a>, ctx: &mut GenerationContext) -> String {
        let template = self.profile.enum_member_output.as_str();
        if !member.is_enum() || placeholder::contains(template, Placeholder::NoOutput) {
            return String::new();
        }

        let saved = ctx.begin_group();
        let fragments: Vec<String> = member
            .enum_elements
            .iter()
            .map(|element| self.render_template(template, member, Some(element), ctx))
            .collect();
        ctx.end_group(saved);

        fragments.join("\n")
    }

    fn wrap_in_grouping(&self, body: &str, rows: usize) -> String {
        let grouping = self
            .profile
            .class_grouping
            .trim()
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim();
        if grouping.is_empty() {
            return body.to_string();
        }

        let two_columns = grouping.eq_ignore_ascii_case(GRID_WITH_ROW_DEFS_AND_TWO_COLUMNS);
        if two_columns || grouping.eq_ignore_ascii_case(GRID_WITH_ROW_DEFS) {
            let mut xaml = String::from("<Grid>\n");
            if rows > 0 {
                xaml.push_str("<Grid.RowDefinitions>\n");
                for _ in 0..rows {
                    xaml.push_str("<RowDefinition Height=\"Auto\" />\n");
                }
                xaml.push_str("</Grid.RowDefinitions>\n");
            }
            if two_columns {
                xaml.push_str(
                    "<Grid.ColumnDefinitions>\n<ColumnDefinition Width=\"Auto\" />\n<ColumnDefinition Width=\"*\" />\n</Grid.ColumnDefinitions>\n",
                );
            }
            xaml.push_str(body);
            xaml.push_str("\n</Grid>");
            return xaml;
        }

        let element = grouping.split_whitespace().next().unwrap_or(grouping);
        format!("<{grouping}>\n{body}\n</{element}>")
    }
}

/// Display name for a selection: "A", "A and B", "A, B and N other properties"
pub fn selection_name(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} and {second}"),
        [first, second, rest @ ..] if rest.len() == 1 => {
            format!("{first}, {second} and 1 other property")
        }
        [first, second, rest @ ..] => {
            format!("{first}, {second} and {} other properties", rest.len())
        }
    }
}

/// Substitution state for one member (or one enum element) template
struct MemberRenderer<'r, 'a> {
    generator: &'r Generator<'a>,
    member: &'r ClassifiedMember<'a>,
    /// Set while rendering an enum member template
    element: Option<&'r str>,
    ctx: &'r mut GenerationContext,
    xname: Option<String>,
}

impl MemberRenderer<'_, '_> {
    fn generated_name(&mut self, template: &str, offset: usize) -> String {
        if let Some(name) = &self.xname {
            return name.clone();
        }
        let base = format!(
            "{}{}",
            self.element.unwrap_or(self.member.name.as_str()),
            element_name_suffix(template, offset)
        );
        let name = self.ctx.claim_name(&base);
        self.xname = Some(name.clone());
        name
    }
}

impl PlaceholderSource for MemberRenderer<'_, '_> {
    fn resolve(&mut self, placeholder: Placeholder, template: &str, offset: usize) -> String {
        let in_enum_member = self.element.is_some();
        match placeholder {
            Placeholder::Name => self.member.name.clone(),
            Placeholder::NameWithSpaces => name_with_spaces(&self.member.name),
            Placeholder::Type => self.member.type_name.clone(),
            Placeholder::IncrementingInteger => self.ctx.next_incrementing().to_string(),
            Placeholder::RepeatingInteger => self.ctx.repeating().to_string(),
            Placeholder::SubProperties if !in_enum_member => {
                self.generator.render_sub_properties(self.member, self.ctx)
            }
            Placeholder::EnumMembers if !in_enum_member => {
                self.generator.render_enum_members(self.member, self.ctx)
            }
            Placeholder::EnumElement => self.element.map(str::to_string).unwrap_or_default(),
            Placeholder::EnumElementWithSpaces => {
                self.element.map(name_with_spaces).unwrap_or_default()
            }
            Placeholder::EnumPropertyName if in_enum_member => self.member.name.clone(),
            Placeholder::XName => self.generated_name(template, offset),
            Placeholder::RepeatingXName => {
                self.ctx.previous_xname().unwrap_or_default().to_string()
            }
            Placeholder::SubProperties
            | Placeholder::EnumMembers
            | Placeholder::EnumPropertyName
            | Placeholder::NoOutput => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xamlgen_core::config::Mapping;
    use xamlgen_core::symbols::TypeIndex;

    fn profile(grouping: &str) -> Profile {
        let mut profile = Profile::new("Test");
        profile.class_grouping = grouping.to_string();
        profile.fallback_output = "<TextBlock Text=\"$name$\" />".to_string();
        profile.sub_property_output = "<TextBlock Text=\"SP_$name$\" />".to_string();
        profile.enum_member_output =
            "<RadioButton Content=\"$elementwithspaces$\" GroupName=\"$enumname$\" Tag=\"$element$\" />".to_string();
        profile
    }

    fn unformatted(mut generator: Generator<'_>) -> Generator<'_> {
        generator.options.indent_size = 0;
        generator
    }

    #[test]
    fn test_selection_name() {
        assert_eq!(selection_name(&[]), "");
        assert_eq!(selection_name(&["Title"]), "Title");
        assert_eq!(selection_name(&["Title", "Count"]), "Title and Count");
        assert_eq!(
            selection_name(&["Title", "Count", "Total"]),
            "Title, Count and 1 other property"
        );
        assert_eq!(
            selection_name(&["Title", "Count", "Total", "Date", "Flag"]),
            "Title, Count and 3 other properties"
        );
    }

    #[test]
    fn test_grouping_with_attributes_closes_on_element_name() {
        let profile = profile("StackPanel Orientation=\"Horizontal\"");
        let model = TypeIndex::new();
        let ty = TypeSymbol::class("Person").with_property(PropertySymbol::new("Name", "string"));

        let output = unformatted(Generator::new(&profile, &model)).class_output(&ty);
        assert_eq!(
            output.output,
            "<StackPanel Orientation=\"Horizontal\">\n<TextBlock Text=\"Name\" />\n</StackPanel>"
        );
    }

    #[test]
    fn test_empty_grouping_has_no_container() {
        let profile = profile("");
        let model = TypeIndex::new();
        let ty = TypeSymbol::class("Person")
            .with_property(PropertySymbol::new("First", "string"))
            .with_property(PropertySymbol::new("Last", "string"));

        let output = unformatted(Generator::new(&profile, &model)).class_output(&ty);
        assert_eq!(
            output.output,
            "<TextBlock Text=\"First\" />\n<TextBlock Text=\"Last\" />"
        );
        assert_eq!(output.output_type, OutputType::Class);
    }

    #[test]
    fn test_class_without_properties() {
        let profile = profile("StackPanel");
        let model = TypeIndex::new();
        let ty = TypeSymbol::class("Empty")
            .with_property(PropertySymbol::new("Shared", "string").static_member());

        let output = Generator::new(&profile, &model).class_output(&ty);
        assert_eq!(
            output.output,
            "<StackPanel>\n    <!-- No accessible properties when copying as XAML -->\n</StackPanel>"
        );
        assert_eq!(output.name, "Empty");
    }

    #[test]
    fn test_enum_members_expansion() {
        let mut profile = profile("");
        profile.mappings.push(Mapping::new(
            "enum",
            "<StackPanel>$members$</StackPanel>",
        ));
        let model = TypeIndex::from_types([TypeSymbol::enumeration(
            "Status",
            ["Active", "OnHold"],
        )]);
        let ty = TypeSymbol::class("Task").with_property(PropertySymbol::new("CurrentStatus", "Status"));

        let output = unformatted(Generator::new(&profile, &model))
            .property_output(&ty.properties[0], &ty);
        assert_eq!(
            output.output,
            "<StackPanel>\n<RadioButton Content=\"Active\" GroupName=\"CurrentStatus\" Tag=\"Active\" />\n<RadioButton Content=\"On Hold\" GroupName=\"CurrentStatus\" Tag=\"OnHold\" />\n</StackPanel>"
        );
    }

    #[test]
    fn test_enum_tokens_outside_enum_template_are_blank() {
        let mut profile = profile("");
        profile.fallback_output = "<A Tag=\"$element$\" Group=\"$enumname$\" Members=\"$members$\" />".to_string();
        let model = TypeIndex::new();
        let ty = TypeSymbol::class("Task").with_property(PropertySymbol::new("Title", "string"));

        let output = Generator::new(&profile, &model).property_output(&ty.properties[0], &ty);
        assert_eq!(output.output, "<A Tag=\"\" Group=\"\" Members=\"\" />");
    }

    #[test]
    fn test_xname_chain_and_collisions() {
        let mut profile = profile("");
        profile.fallback_output =
            "<TextBlock x:Name=\"$xname$\" Below=\"$repxname$\" Text=\"$name$\" />".to_string();
        let model = TypeIndex::new();
        let ty = TypeSymbol::class("Person")
            .with_property(PropertySymbol::new("Name", "string"))
            .with_property(PropertySymbol::new("Age", "int"));
        let other = TypeSymbol::class("Pet").with_property(PropertySymbol::new("Name", "string"));

        let output = Generator::new(&profile, &model).selection_output([
            (&ty.properties[0], &ty),
            (&ty.properties[1], &ty),
            (&other.properties[0], &other),
        ]);
        assert_eq!(
            output.output,
            "<TextBlock x:Name=\"NameTextBlock\" Below=\"\" Text=\"Name\" />\n\
             <TextBlock x:Name=\"AgeTextBlock\" Below=\"NameTextBlock\" Text=\"Age\" />\n\
             <TextBlock x:Name=\"NameTextBlock1\" Below=\"AgeTextBlock\" Text=\"Name\" />"
        );
        assert_eq!(output.name, "Name, Age and 1 other property");
        assert_eq!(output.output_type, OutputType::Selection);
    }

    #[test]
    fn test_no_output_member_is_skipped() {
        let mut profile = profile("");
        profile.fallback_output = "<TextBlock Text=\"$name$\" Grid.Row=\"$incint$\" />".to_string();
        profile
            .mappings
            .push(Mapping::new("ICommand", "$nooutput$<Button Grid.Row=\"$incint$\" />"));
        let model = TypeIndex::new();
        let ty = TypeSymbol::class("Screen")
            .with_property(PropertySymbol::new("Save", "ICommand"))
            .with_property(PropertySymbol::new("Title", "string"));

        let output = Generator::new(&profile, &model).class_output(&ty);
        assert_eq!(output.output, "<TextBlock Text=\"Title\" Grid.Row=\"0\" />");

        let single = Generator::new(&profile, &model).property_output(&ty.properties[0], &ty);
        assert!(single.is_empty());
    }

    #[test]
    fn test_dynamic_sub_properties_render_one_blank_instance() {
        let mut profile = profile("");
        profile
            .mappings
            .push(Mapping::new("dynamic", "<ListView Header=\"$name$\">$subprops$</ListView>"));
        let model = TypeIndex::new();
        let ty = TypeSymbol::class("Bag").with_property(PropertySymbol::new("Anything", "dynamic"));

        let output = unformatted(Generator::new(&profile, &model))
            .property_output(&ty.properties[0], &ty);
        assert_eq!(
            output.output,
            "<ListView Header=\"Anything\">\n<TextBlock Text=\"SP_\" />\n</ListView>"
        );
    }

    #[test]
    fn test_self_referential_type_is_expanded_once_per_branch() {
        let mut profile = profile("");
        profile
            .mappings
            .push(Mapping::new("Node", "<Expander Header=\"$name$\">$subprops$</Expander>"));
        let model = TypeIndex::from_types([TypeSymbol::class("Node")
            .with_property(PropertySymbol::new("Label", "string"))
            .with_property(PropertySymbol::new("Parent", "Node"))]);
        let ty = TypeSymbol::class("Tree").with_property(PropertySymbol::new("Root", "Node"));

        let output = unformatted(Generator::new(&profile, &model))
            .property_output(&ty.properties[0], &ty);
        assert_eq!(
            output.output,
            "<Expander Header=\"Root\">\n<TextBlock Text=\"SP_Label\" />\n<Expander Header=\"Parent\">\n</Expander>\n</Expander>"
        );
    }
}
