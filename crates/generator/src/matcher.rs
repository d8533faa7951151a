//! First-match selection of a profile mapping for a member
//!
//! Rules are tried strictly in list order. A specific rule listed after a
//! broader one (for example a `name_contains` rule after a plain `string`
//! rule, or `Status` after `enum`) is never reached; profile authors order
//! rules from most to least specific.

use tracing::warn;
use xamlgen_core::config::{Mapping, ARRAY_TYPE_TOKEN, ENUM_TYPE_TOKEN};
use xamlgen_core::types::TypeRef;

use crate::classifier::ClassifiedMember;

/// One compiled `type` alternative
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypePattern {
    /// Reserved `enum` token
    Enum,
    /// Reserved `array` token
    Array,
    Type(TypeRef),
    /// Text that is not a type; only matches an identical unparseable member type
    Raw(String),
}

impl TypePattern {
    fn compile(alternative: &str) -> Self {
        if alternative.eq_ignore_ascii_case(ENUM_TYPE_TOKEN) {
            return Self::Enum;
        }
        if alternative.eq_ignore_ascii_case(ARRAY_TYPE_TOKEN) {
            return Self::Array;
        }
        match TypeRef::parse(alternative) {
            Some(pattern) => Self::Type(pattern),
            None => {
                warn!(pattern = %alternative, "Mapping type is not a valid type name");
                Self::Raw(alternative.to_string())
            }
        }
    }

    fn matches(&self, member: &ClassifiedMember<'_>) -> bool {
        match (self, &member.type_ref) {
            (Self::Enum, _) => member.is_enum(),
            (Self::Array, Some(ty)) => ty.strip_nullable().is_array(),
            (Self::Type(pattern), Some(ty)) => {
                ty.matches_pattern(pattern)
                    || matches!(ty, TypeRef::Nullable(inner) if inner.matches_pattern(pattern))
            }
            (Self::Raw(raw), None) => *raw == member.type_name,
            _ => false,
        }
    }
}

#[derive(Debug)]
struct CompiledMapping<'p> {
    mapping: &'p Mapping,
    patterns: Vec<TypePattern>,
    name_fragments: Vec<String>,
}

impl<'p> CompiledMapping<'p> {
    fn new(mapping: &'p Mapping) -> Self {
        Self {
            mapping,
            patterns: mapping.type_alternatives().map(TypePattern::compile).collect(),
            name_fragments: mapping
                .name_alternatives()
                .map(str::to_lowercase)
                .collect(),
        }
    }

    fn matches(&self, member: &ClassifiedMember<'_>) -> bool {
        if self.mapping.if_read_only != member.is_read_only {
            return false;
        }
        if !self.name_fragments.is_empty() {
            let name = member.name.to_lowercase();
            if !self.name_fragments.iter().any(|f| name.contains(f.as_str())) {
                return false;
            }
        }
        self.patterns.iter().any(|p| p.matches(member))
    }
}

/// A profile's mapping list compiled once per generation call
#[derive(Debug)]
pub struct MappingMatcher<'p> {
    rules: Vec<CompiledMapping<'p>>,
}

impl<'p> MappingMatcher<'p> {
    pub fn new(mappings: &'p [Mapping]) -> Self {
        Self {
            rules: mappings.iter().map(CompiledMapping::new).collect(),
        }
    }

    /// First mapping that applies to `member`
    pub fn find(&self, member: &ClassifiedMember<'_>) -> Option<&'p Mapping> {
        self.rules
            .iter()
            .find(|rule| rule.matches(member))
            .map(|rule| rule.mapping)
    }
}
