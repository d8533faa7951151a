//! Member resolution: which properties of a type are exposed, and in what order

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use xamlgen_core::symbols::{PropertySymbol, SemanticModel, TypeSymbol};
use xamlgen_core::types::TypeRef;

/// A property together with the type that declares it
///
/// Properties inherited from a generic base have the base's type arguments
/// substituted into their declared type, so the property is owned then.
#[derive(Debug, Clone)]
pub struct ResolvedMember<'a> {
    pub property: Cow<'a, PropertySymbol>,
    pub declaring_type: &'a TypeSymbol,
}

impl<'a> ResolvedMember<'a> {
    pub fn new(property: &'a PropertySymbol, declaring_type: &'a TypeSymbol) -> Self {
        Self {
            property: Cow::Borrowed(property),
            declaring_type,
        }
    }

    /// Substitute bound type parameters into the property's declared type
    fn bound(
        property: &'a PropertySymbol,
        declaring_type: &'a TypeSymbol,
        bindings: &HashMap<String, TypeRef>,
    ) -> Self {
        let substituted = property
            .type_ref()
            .map(|declared| (declared.substitute(bindings), declared))
            .filter(|(substituted, declared)| substituted != declared);

        match substituted {
            Some((substituted, _)) => Self {
                property: Cow::Owned(PropertySymbol {
                    type_name: substituted.to_string(),
                    ..property.clone()
                }),
                declaring_type,
            },
            None => Self::new(property, declaring_type),
        }
    }
}

/// Walks a type and its base classes collecting bindable properties
pub struct MemberResolver<'a> {
    model: &'a dyn SemanticModel,
    excluded: &'a [String],
}

impl<'a> MemberResolver<'a> {
    pub fn new(model: &'a dyn SemanticModel, excluded: &'a [String]) -> Self {
        Self { model, excluded }
    }

    /// Matches the banned-name filter
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|pattern| match pattern.strip_suffix('*') {
            Some(prefix) => name.starts_with(prefix),
            None => name == pattern,
        })
    }

    /// Instance property with a getter that is not banned
    ///
    /// Accessibility is deliberately not checked: private and internal
    /// properties are emitted like public ones.
    pub fn is_exposed(&self, property: &PropertySymbol) -> bool {
        !property.is_static && property.has_getter && !self.is_excluded(&property.name)
    }

    /// Exposed members of `ty`: own members in declaration order, then each
    /// base class in turn
    ///
    /// A property redeclared in a derived type hides the base declaration.
    /// Type arguments given to a generic base (`Base<Order>`) replace its
    /// type parameters in the inherited property types.
    pub fn resolve(&self, ty: &'a TypeSymbol) -> Vec<ResolvedMember<'a>> {
        let mut members = Vec::new();
        let mut visited = HashSet::new();
        let mut declared = HashSet::new();
        let mut bindings = HashMap::new();
        let mut current = Some(ty);

        while let Some(symbol) = current {
            if !visited.insert(symbol.full_name()) {
                warn!(
                    type_name = %symbol.full_name(),
                    "Inheritance cycle detected, stopping base type walk"
                );
                break;
            }

            for property in &symbol.properties {
                if !declared.insert(property.name.as_str()) {
                    continue;
                }
                if self.is_exposed(property) {
                    members.push(ResolvedMember::bound(property, symbol, &bindings));
                }
            }

            current = match self.base_class(symbol, &bindings) {
                Some((base, reference)) => {
                    bindings = base
                        .type_parameters
                        .iter()
                        .cloned()
                        .zip(reference.type_args().iter().cloned())
                        .collect();
                    Some(base)
                }
                None => None,
            };
        }

        debug!(
            type_name = %ty.full_name(),
            member_count = members.len(),
            "Resolved members"
        );
        members
    }

    /// First entry of the base list that resolves to a class-like type,
    /// with the reference as seen from the type being resolved
    fn base_class(
        &self,
        symbol: &'a TypeSymbol,
        bindings: &HashMap<String, TypeRef>,
    ) -> Option<(&'a TypeSymbol, TypeRef)> {
        for base in &symbol.base_types {
            let Some(reference) = TypeRef::parse(base) else {
                warn!(base_type = %base, "Unparseable base type");
                continue;
            };
            let reference = reference.substitute(bindings);
            if reference.simple_name() == "object" {
                return None;
            }

            match self.model.resolve(&reference, Some(symbol)) {
                Some(resolved) if resolved.has_members() => return Some((resolved, reference)),
                Some(_) => continue,
                None if looks_like_interface(&reference) => continue,
                None => {
                    warn!(
                        type_name = %symbol.full_name(),
                        base_type = %base,
                        "Base type could not be resolved, inherited properties are skipped"
                    );
                }
            }
        }
        None
    }
}

/// `IFoo` naming convention, used to stay quiet about unresolved interfaces
fn looks_like_interface(reference: &TypeRef) -> bool {
    let name = reference.simple_name();
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(char::is_uppercase)
}
