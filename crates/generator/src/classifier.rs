//! Type classification for generated members
//!
//! Decides how a property's declared type is treated by the mapping matcher
//! and by `$subprops$`/`$members$` expansion.

use strum_macros::{Display, EnumString};
use tracing::debug;
use xamlgen_core::symbols::{PropertySymbol, SemanticModel, TypeSymbol};
use xamlgen_core::types::TypeRef;

/// Broad shape of a member's type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum TypeCategory {
    /// Keyword and well-known framework value types
    Primitive,
    /// Arrays and single-argument generics
    Collection,
    Enum,
    /// The untyped `dynamic` marker
    Dynamic,
    /// Any other named type, resolved or not
    UserType,
}

/// Where the members for `$subprops$` come from
#[derive(Debug, Clone, Copy)]
pub enum SubProperties<'a> {
    /// Nothing to expand
    None,
    /// Members of this type
    Members(&'a TypeSymbol),
    /// Dynamic: shape unknown, expanded as one blank instance
    Unknown,
}

/// A member ready for matching and substitution
#[derive(Debug, Clone)]
pub struct ClassifiedMember<'a> {
    pub name: String,
    pub is_read_only: bool,
    pub category: TypeCategory,

    /// Parsed declared type; `None` when the text did not parse
    pub type_ref: Option<TypeRef>,

    /// Normalised type name, used for `$type$` and as the matching fallback
    pub type_name: String,

    /// Collection element type
    pub element_type: Option<TypeRef>,

    /// Enum element names in declaration order
    pub enum_elements: Vec<String>,

    pub sub_properties: SubProperties<'a>,
}

impl<'a> ClassifiedMember<'a> {
    /// Member with every substitution blank, used for dynamic expansion
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            is_read_only: false,
            category: TypeCategory::Dynamic,
            type_ref: None,
            type_name: String::new(),
            element_type: None,
            enum_elements: Vec::new(),
            sub_properties: SubProperties::None,
        }
    }

    pub fn is_enum(&self) -> bool {
        self.category == TypeCategory::Enum
    }
}

/// Classifies properties against a semantic model
pub struct TypeClassifier<'a> {
    model: &'a dyn SemanticModel,
}

impl<'a> TypeClassifier<'a> {
    pub fn new(model: &'a dyn SemanticModel) -> Self {
        Self { model }
    }

    /// Classify `property` as declared on `declaring_type`
    pub fn classify(
        &self,
        property: &PropertySymbol,
        declaring_type: Option<&TypeSymbol>,
    ) -> ClassifiedMember<'a> {
        let mut member = ClassifiedMember {
            name: property.name.clone(),
            is_read_only: property.is_read_only(),
            category: TypeCategory::UserType,
            type_ref: None,
            type_name: property.type_name.trim().to_string(),
            element_type: None,
            enum_elements: Vec::new(),
            sub_properties: SubProperties::None,
        };

        let Some(type_ref) = property.type_ref() else {
            debug!(
                property = %property.name,
                type_name = %property.type_name,
                "Unparseable property type, treating as unresolved"
            );
            return member;
        };

        member.type_name = type_ref.to_string();
        let inner = type_ref.strip_nullable().clone();

        match &inner {
            TypeRef::Dynamic => {
                member.category = TypeCategory::Dynamic;
                member.sub_properties = SubProperties::Unknown;
            }
            TypeRef::Array { element, .. } => {
                member.category = TypeCategory::Collection;
                member.sub_properties = self.element_sub_properties(element, declaring_type);
                member.element_type = Some((**element).clone());
            }
            TypeRef::Tuple(_) => {}
            TypeRef::Named { .. } if inner.is_builtin_value() => {
                member.category = TypeCategory::Primitive;
            }
            TypeRef::Named { args, .. } if args.len() == 1 => {
                member.category = TypeCategory::Collection;
                if let Some(element) = inner.element_type() {
                    member.sub_properties = self.element_sub_properties(element, declaring_type);
                    member.element_type = Some(element.clone());
                }
            }
            TypeRef::Named { .. } | TypeRef::Nullable(_) => {
                match self.model.resolve(&inner, declaring_type) {
                    Some(symbol) if symbol.is_enum() => {
                        member.category = TypeCategory::Enum;
                        member.enum_elements = symbol.enum_members.clone();
                    }
                    Some(symbol) if symbol.has_members() => {
                        member.sub_properties = SubProperties::Members(symbol);
                    }
                    Some(_) => {}
                    None => debug!(
                        property = %property.name,
                        type_name = %member.type_name,
                        "Property type not found in semantic model"
                    ),
                }
            }
        }

        member.type_ref = Some(type_ref);
        member
    }

    fn element_sub_properties(
        &self,
        element: &TypeRef,
        declaring_type: Option<&TypeSymbol>,
    ) -> SubProperties<'a> {
        let element = element.strip_nullable();
        if element.is_dynamic() {
            return SubProperties::Unknown;
        }
        if element.is_builtin_value() || element.is_array() {
            return SubProperties::None;
        }

        match self.model.resolve(element, declaring_type) {
            Some(symbol) if symbol.has_members() => SubProperties::Members(symbol),
            Some(_) => SubProperties::None,
            None => {
                debug!(element_type = %element, "Collection element type not found in semantic model");
                SubProperties::None
            }
        }
    }
}
