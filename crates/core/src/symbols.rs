//! Semantic symbols and type resolution
//!
//! The generator never looks at syntax. It works on [`TypeSymbol`]s and
//! resolves referenced types through a [`SemanticModel`], which may be backed
//! by the current document, other documents of the project, or metadata
//! describing referenced assemblies.

use crate::types::TypeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::{Display, EnumString};

/// Kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Record,
    Interface,
    Enum,
    /// VB `Module`: every member is shared
    Module,
}

/// Declared accessibility of a member
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Accessibility {
    #[default]
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    Private,
}

/// Where a symbol was declared
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolOrigin {
    /// Declared in a source document
    #[default]
    Source,
    /// Described by metadata for a referenced assembly
    Metadata { assembly: String },
}

fn default_true() -> bool {
    true
}

/// A property declared on a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySymbol {
    pub name: String,

    /// Declared type exactly as written in source
    pub type_name: String,

    #[serde(default)]
    pub is_static: bool,

    /// Has a `get` accessor (or is expression-bodied)
    #[serde(default = "default_true")]
    pub has_getter: bool,

    /// Has a `set`/`init` accessor that is not private
    #[serde(default = "default_true")]
    pub has_setter: bool,

    #[serde(default)]
    pub accessibility: Accessibility,
}

impl PropertySymbol {
    /// A public read/write instance property
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_static: false,
            has_getter: true,
            has_setter: true,
            accessibility: Accessibility::Public,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.has_setter = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.has_getter = false;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Read-only from a binding's point of view: no accessible setter
    pub fn is_read_only(&self) -> bool {
        !self.has_setter
    }

    /// Parsed form of [`Self::type_name`]
    pub fn type_ref(&self) -> Option<TypeRef> {
        TypeRef::parse(&self.type_name)
    }
}

/// A class, struct, record, interface or enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub name: String,

    #[serde(default)]
    pub namespace: Option<String>,

    pub kind: TypeKind,

    /// Base class and implemented interfaces as written, in declaration order
    #[serde(default)]
    pub base_types: Vec<String>,

    #[serde(default)]
    pub type_parameters: Vec<String>,

    /// Properties in declaration order
    #[serde(default)]
    pub properties: Vec<PropertySymbol>,

    /// Enum member names in declaration order
    #[serde(default)]
    pub enum_members: Vec<String>,

    #[serde(default)]
    pub origin: SymbolOrigin,

    /// Type names referenced from this type match regardless of case
    #[serde(default)]
    pub case_insensitive: bool,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            kind,
            base_types: Vec::new(),
            type_parameters: Vec::new(),
            properties: Vec::new(),
            enum_members: Vec::new(),
            origin: SymbolOrigin::Source,
            case_insensitive: false,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut symbol = Self::new(name, TypeKind::Enum);
        symbol.enum_members = members.into_iter().map(Into::into).collect();
        symbol
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_types.push(base.into());
        self
    }

    pub fn with_type_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.type_parameters.push(parameter.into());
        self
    }

    pub fn with_property(mut self, property: PropertySymbol) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_origin(mut self, origin: SymbolOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_case_insensitive_names(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Types whose members can be expanded (not enums, interfaces or modules)
    pub fn has_members(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Class | TypeKind::Struct | TypeKind::Record
        )
    }

    /// Namespace-qualified name
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}.{}", self.name),
            _ => self.name.clone(),
        }
    }

    /// Reference naming this type from anywhere
    pub fn reference(&self) -> TypeRef {
        TypeRef::Named {
            qualifier: self.namespace.clone().filter(|ns| !ns.is_empty()),
            name: self.name.clone(),
            args: self
                .type_parameters
                .iter()
                .map(|p| TypeRef::named(p.as_str()))
                .collect(),
        }
    }

    /// Another declaration (partial part) of the same type
    pub fn is_same_type(&self, other: &TypeSymbol) -> bool {
        let ignore_case = self.case_insensitive || other.case_insensitive;
        let (ours, theirs) = (self.full_name(), other.full_name());
        let same_name = if ignore_case {
            ours.eq_ignore_ascii_case(&theirs)
        } else {
            ours == theirs
        };
        same_name && self.type_parameters.len() == other.type_parameters.len()
    }

    /// Fold another part of a partial declaration into this one
    ///
    /// Members already present by name are kept from `self`; the rest are
    /// appended in the other part's declaration order.
    pub fn merge_partial(&mut self, other: &TypeSymbol) {
        for base in &other.base_types {
            if !self.base_types.contains(base) {
                self.base_types.push(base.clone());
            }
        }
        for property in &other.properties {
            if !self.properties.iter().any(|p| p.name == property.name) {
                self.properties.push(property.clone());
            }
        }
        for member in &other.enum_members {
            if !self.enum_members.contains(member) {
                self.enum_members.push(member.clone());
            }
        }
        if self.type_parameters.is_empty() {
            self.type_parameters = other.type_parameters.clone();
        }
    }
}

/// Resolves type references to declared symbols
pub trait SemanticModel {
    /// Find the symbol a reference points at
    ///
    /// `context` is the type the reference was written in; it is used to
    /// prefer candidates from the same namespace.
    fn resolve(&self, reference: &TypeRef, context: Option<&TypeSymbol>) -> Option<&TypeSymbol>;
}

/// In-memory symbol table keyed by simple name
///
/// Parts of a partial type are merged into a single symbol on insert.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    types: Vec<TypeSymbol>,
    by_name: HashMap<String, Vec<usize>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_types(types: impl IntoIterator<Item = TypeSymbol>) -> Self {
        let mut index = Self::new();
        for ty in types {
            index.insert(ty);
        }
        index
    }

    pub fn insert(&mut self, symbol: TypeSymbol) {
        let key = symbol.name.to_lowercase();
        if let Some(&existing) = self
            .by_name
            .get(&key)
            .and_then(|ids| ids.iter().find(|&&i| self.types[i].is_same_type(&symbol)))
        {
            self.types[existing].merge_partial(&symbol);
            return;
        }

        let position = self.types.len();
        self.by_name.entry(key).or_default().push(position);
        self.types.push(symbol);
    }

    /// Merge parts of local types that `model` declares elsewhere
    pub fn merge_partials_from(&mut self, model: &dyn SemanticModel) {
        for ty in &mut self.types {
            let part = model
                .resolve(&ty.reference(), Some(&*ty))
                .filter(|part| part.is_same_type(&*ty))
                .cloned();
            if let Some(part) = part {
                ty.merge_partial(&part);
            }
        }
    }

    /// The indexed symbol for `symbol`, including all merged parts
    pub fn find(&self, symbol: &TypeSymbol) -> Option<&TypeSymbol> {
        self.candidates(&symbol.name)
            .find(|ty| ty.is_same_type(symbol))
    }

    fn candidates<'s>(&'s self, name: &str) -> impl Iterator<Item = &'s TypeSymbol> + 's {
        self.by_name
            .get(&name.to_lowercase())
            .into_iter()
            .flatten()
            .map(move |&i| &self.types[i])
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeSymbol> {
        self.types.iter()
    }

    /// First symbol with exactly the given simple name
    pub fn get(&self, name: &str) -> Option<&TypeSymbol> {
        self.candidates(name).find(|ty| ty.name == name)
    }

    fn lookup(&self, reference: &TypeRef, context: Option<&TypeSymbol>) -> Option<&TypeSymbol> {
        let TypeRef::Named {
            qualifier,
            name,
            args,
        } = reference
        else {
            return None;
        };

        let ignore_case = context.is_some_and(|c| c.case_insensitive);
        let mut candidates: Vec<&TypeSymbol> = self
            .candidates(name)
            .filter(|ty| ty.type_parameters.len() == args.len())
            .filter(|ty| ignore_case || ty.name == *name)
            .collect();
        // Exact spelling first, declaration order otherwise
        candidates.sort_by_key(|ty| ty.name != *name);

        let fold = |text: &str| {
            if ignore_case {
                text.to_lowercase()
            } else {
                text.to_string()
            }
        };

        if let Some(qualifier) = qualifier {
            let qualifier = fold(qualifier.as_str());
            let suffix = format!(".{qualifier}");
            if let Some(ty) = candidates.iter().find(|ty| {
                ty.namespace
                    .as_deref()
                    .map(fold)
                    .is_some_and(|ns| ns == qualifier || ns.ends_with(&suffix))
            }) {
                return Some(ty);
            }
        }

        if let Some(context_ns) = context.and_then(|c| c.namespace.as_deref()).map(fold) {
            if let Some(ty) = candidates
                .iter()
                .find(|ty| ty.namespace.as_deref().map(fold).as_deref() == Some(context_ns.as_str()))
            {
                return Some(ty);
            }
        }

        candidates.first().copied()
    }
}

impl SemanticModel for TypeIndex {
    fn resolve(&self, reference: &TypeRef, context: Option<&TypeSymbol>) -> Option<&TypeSymbol> {
        self.lookup(reference, context)
    }
}

/// Current-document symbols layered over a host-supplied model
pub struct LayeredModel<'a> {
    local: &'a TypeIndex,
    outer: &'a dyn SemanticModel,
}

impl<'a> LayeredModel<'a> {
    pub fn new(local: &'a TypeIndex, outer: &'a dyn SemanticModel) -> Self {
        Self { local, outer }
    }
}

impl SemanticModel for LayeredModel<'_> {
    fn resolve(&self, reference: &TypeRef, context: Option<&TypeSymbol>) -> Option<&TypeSymbol> {
        self.local
            .lookup(reference, context)
            .or_else(|| self.outer.resolve(reference, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(text: &str) -> TypeRef {
        TypeRef::parse(text).unwrap()
    }

    #[test]
    fn test_resolve_by_simple_name() {
        let index = TypeIndex::from_types([TypeSymbol::class("Order")]);
        let found = index.resolve(&reference("Order"), None);
        assert_eq!(found.map(|t| t.name.as_str()), Some("Order"));
        assert!(index.resolve(&reference("Customer"), None).is_none());
    }

    #[test]
    fn test_resolve_prefers_qualifier_then_context_namespace() {
        let index = TypeIndex::from_types([
            TypeSymbol::class("Order").with_namespace("Shop.Legacy"),
            TypeSymbol::class("Order").with_namespace("Shop.Models"),
        ]);

        let qualified = index.resolve(&reference("Models.Order"), None);
        assert_eq!(
            qualified.and_then(|t| t.namespace.as_deref()),
            Some("Shop.Models")
        );

        let context = TypeSymbol::class("Customer").with_namespace("Shop.Models");
        let contextual = index.resolve(&reference("Order"), Some(&context));
        assert_eq!(
            contextual.and_then(|t| t.namespace.as_deref()),
            Some("Shop.Models")
        );

        let unqualified = index.resolve(&reference("Order"), None);
        assert_eq!(
            unqualified.and_then(|t| t.namespace.as_deref()),
            Some("Shop.Legacy")
        );
    }

    #[test]
    fn test_resolve_respects_generic_arity() {
        let mut generic = TypeSymbol::class("Box");
        generic.type_parameters = vec!["T".to_string()];
        let index = TypeIndex::from_types([generic, TypeSymbol::class("Box")]);

        let found = index.resolve(&reference("Box<int>"), None);
        assert_eq!(found.map(|t| t.type_parameters.len()), Some(1));
        let found = index.resolve(&reference("Box"), None);
        assert_eq!(found.map(|t| t.type_parameters.len()), Some(0));
    }

    #[test]
    fn test_layered_model_prefers_local() {
        let local = TypeIndex::from_types([TypeSymbol::class("Order").with_namespace("Local")]);
        let outer = TypeIndex::from_types([
            TypeSymbol::class("Order").with_namespace("Outer"),
            TypeSymbol::class("Customer").with_origin(SymbolOrigin::Metadata {
                assembly: "Shop.Contracts".to_string(),
            }),
        ]);
        let model = LayeredModel::new(&local, &outer);

        let order = model.resolve(&reference("Order"), None);
        assert_eq!(order.and_then(|t| t.namespace.as_deref()), Some("Local"));
        let customer = model.resolve(&reference("Customer"), None);
        assert!(matches!(
            customer.map(|t| &t.origin),
            Some(SymbolOrigin::Metadata { .. })
        ));
    }

    #[test]
    fn test_symbols_deserialize_with_defaults() {
        let json = r#"{
            "name": "Address",
            "namespace": "Shop.Contracts",
            "kind": "class",
            "properties": [
                { "name": "Street", "type_name": "string" },
                { "name": "Id", "type_name": "int", "has_setter": false }
            ],
            "origin": { "kind": "metadata", "assembly": "Shop.Contracts" }
        }"#;
        let symbol: TypeSymbol = serde_json::from_str(json).unwrap();
        assert_eq!(symbol.full_name(), "Shop.Contracts.Address");
        assert!(!symbol.properties[0].is_read_only());
        assert!(symbol.properties[1].is_read_only());
        assert!(symbol.properties[1].has_getter);
    }

    #[test]
    fn test_partial_parts_merge_on_insert() {
        let index = TypeIndex::from_types([
            TypeSymbol::class("Vm")
                .with_namespace("App")
                .with_property(PropertySymbol::new("First", "string")),
            TypeSymbol::class("Vm").with_namespace("Other"),
            TypeSymbol::class("Vm")
                .with_namespace("App")
                .with_base("ViewModelBase")
                .with_property(PropertySymbol::new("First", "int"))
                .with_property(PropertySymbol::new("Second", "string")),
        ]);
        assert_eq!(index.len(), 2);

        let vm = index.find(&TypeSymbol::class("Vm").with_namespace("App")).unwrap();
        let properties: Vec<(&str, &str)> = vm
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_str()))
            .collect();
        assert_eq!(properties, vec![("First", "string"), ("Second", "string")]);
        assert_eq!(vm.base_types, vec!["ViewModelBase"]);
    }

    #[test]
    fn test_merge_partials_from_outer_model() {
        let mut local = TypeIndex::from_types([TypeSymbol::class("Vm")
            .with_namespace("App")
            .with_property(PropertySymbol::new("First", "string"))]);
        let project = TypeIndex::from_types([
            TypeSymbol::class("Vm")
                .with_namespace("Elsewhere")
                .with_property(PropertySymbol::new("Unrelated", "string")),
            TypeSymbol::class("Vm")
                .with_namespace("App")
                .with_property(PropertySymbol::new("Second", "string")),
        ]);

        local.merge_partials_from(&project);
        let vm = local.get("Vm").unwrap();
        let names: Vec<&str> = vm.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_case_insensitive_lookup_from_vb_types() {
        let index = TypeIndex::from_types([
            TypeSymbol::class("Order").with_namespace("Shop"),
            TypeSymbol::enumeration("OrderStatus", ["Open", "Closed"]),
        ]);
        let vb_context = TypeSymbol::class("OrderViewModel")
            .with_namespace("shop")
            .with_case_insensitive_names();
        let cs_context = TypeSymbol::class("OrderViewModel").with_namespace("Shop");

        let found = index.resolve(&reference("order"), Some(&vb_context));
        assert_eq!(found.map(|t| t.full_name()), Some("Shop.Order".to_string()));
        let found = index.resolve(&reference("SHOP.orderstatus"), Some(&vb_context));
        assert!(found.is_some_and(TypeSymbol::is_enum));

        assert!(index.resolve(&reference("order"), Some(&cs_context)).is_none());
        assert!(index.resolve(&reference("order"), None).is_none());
        assert!(index.get("order").is_none());
    }

    #[test]
    fn test_exact_case_preferred_when_ignoring_case() {
        let index = TypeIndex::from_types([
            TypeSymbol::class("item").with_namespace("Lower"),
            TypeSymbol::class("Item").with_namespace("Upper"),
        ]);
        let context = TypeSymbol::class("Host").with_case_insensitive_names();
        let found = index.resolve(&reference("Item"), Some(&context));
        assert_eq!(found.and_then(|t| t.namespace.as_deref()), Some("Upper"));
    }

    #[test]
    fn test_module_has_no_expandable_members() {
        let module = TypeSymbol::new("Globals", TypeKind::Module);
        assert!(!module.has_members());
        assert_eq!(module.kind.to_string(), "module");
    }
}
