//! C# front door backed by tree-sitter

use tracing::debug;
use tree_sitter::{Node, Parser};
use xamlgen_core::error::{Error, Result};
use xamlgen_core::symbols::{Accessibility, PropertySymbol, TypeKind, TypeSymbol};

use crate::outline::{DeclaredType, DocumentOutline, OffsetMap};
use crate::{DocumentAnalyzer, LanguageDescriptor, SourceLanguage};

inventory::submit! {
    LanguageDescriptor {
        language: SourceLanguage::CSharp,
        extensions: &["cs"],
        factory: create_csharp_analyzer,
    }
}

fn create_csharp_analyzer() -> Result<Box<dyn DocumentAnalyzer>> {
    Ok(Box::new(CSharpAnalyzer))
}

/// Members that are never a generation target
const OPAQUE_MEMBER_KINDS: &[&str] = &[
    "method_declaration",
    "constructor_declaration",
    "destructor_declaration",
    "field_declaration",
    "event_field_declaration",
    "event_declaration",
    "indexer_declaration",
    "operator_declaration",
    "conversion_operator_declaration",
    "delegate_declaration",
];

fn type_kind(node_kind: &str) -> Option<TypeKind> {
    match node_kind {
        "class_declaration" => Some(TypeKind::Class),
        "struct_declaration" => Some(TypeKind::Struct),
        "record_declaration" | "record_struct_declaration" => Some(TypeKind::Record),
        "interface_declaration" => Some(TypeKind::Interface),
        "enum_declaration" => Some(TypeKind::Enum),
        _ => None,
    }
}

pub(crate) struct CSharpAnalyzer;

impl DocumentAnalyzer for CSharpAnalyzer {
    fn language(&self) -> SourceLanguage {
        SourceLanguage::CSharp
    }

    fn outline(&self, source: &str) -> Result<DocumentOutline> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| Error::parse("C# document", format!("Failed to set C# language: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::parse("C# document", "Failed to parse source code"))?;

        let mut walker = OutlineWalker {
            source: source.as_bytes(),
            offsets: OffsetMap::new(source),
            types: Vec::new(),
        };
        walker.walk_children(tree.root_node(), &Scope::default());

        debug!(type_count = walker.types.len(), "Outlined C# document");
        Ok(DocumentOutline::new(walker.types))
    }
}

/// Enclosing namespaces and types of the node being visited
#[derive(Debug, Clone, Default)]
struct Scope {
    path: Vec<String>,
}

impl Scope {
    fn nested(&self, name: &str) -> Self {
        let mut path = self.path.clone();
        path.extend(name.split('.').map(|s| s.trim().to_string()));
        Self { path }
    }

    fn namespace(&self) -> Option<String> {
        if self.path.is_empty() {
            None
        } else {
            Some(self.path.join("."))
        }
    }
}

struct OutlineWalker<'s> {
    source: &'s [u8],
    offsets: OffsetMap,
    types: Vec<DeclaredType>,
}

impl OutlineWalker<'_> {
    fn walk_children(&mut self, node: Node<'_>, scope: &Scope) {
        // A file-scoped namespace applies to every declaration after it
        let mut scope = scope.clone();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "file_scoped_namespace_declaration" {
                if let Some(name) = self.field_text(child, "name") {
                    scope = scope.nested(&name);
                }
                self.walk_children(child, &scope);
            } else {
                self.walk(child, &scope);
            }
        }
    }

    fn walk(&mut self, node: Node<'_>, scope: &Scope) {
        if let Some(kind) = type_kind(node.kind()) {
            self.handle_type(node, kind, scope);
            return;
        }

        if node.kind() == "namespace_declaration" {
            let inner = match self.field_text(node, "name") {
                Some(name) => scope.nested(&name),
                None => scope.clone(),
            };
            self.walk_children(node, &inner);
            return;
        }

        self.walk_children(node, scope);
    }

    fn handle_type(&mut self, node: Node<'_>, kind: TypeKind, scope: &Scope) {
        let Some(name) = self.field_text(node, "name") else {
            return;
        };

        let mut symbol = TypeSymbol::new(name.clone(), kind);
        symbol.namespace = scope.namespace();
        symbol.base_types = self.base_types(node);
        symbol.type_parameters = self.type_parameters(node);

        let mut declared = DeclaredType::new(symbol, self.span(node));
        let in_interface = kind == TypeKind::Interface;

        if kind == TypeKind::Record {
            self.record_parameters(node, &mut declared);
        }

        let mut nested_types = Vec::new();
        if let Some(body) = self.body(node) {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "property_declaration" => {
                        if let Some(property) = self.property(member, in_interface) {
                            declared.push_property(property, self.span(member));
                        }
                    }
                    "enum_member_declaration" => {
                        if let Some(element) = self.field_text(member, "name") {
                            declared.symbol.enum_members.push(element);
                        }
                    }
                    other if type_kind(other).is_some() => nested_types.push(member),
                    other if OPAQUE_MEMBER_KINDS.contains(&other) => {
                        declared.push_member(self.span(member));
                    }
                    _ => {}
                }
            }
        }

        self.types.push(declared);

        let inner_scope = scope.nested(&name);
        for nested in nested_types {
            self.walk(nested, &inner_scope);
        }
    }

    fn body<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        if let Some(body) = node.child_by_field_name("body") {
            return Some(body);
        }
        let mut cursor = node.walk();
        let body = node.named_children(&mut cursor).find(|c| {
            matches!(
                c.kind(),
                "declaration_list" | "enum_member_declaration_list"
            )
        });
        body
    }

    /// Positional record parameters become init-only properties
    fn record_parameters(&self, node: Node<'_>, declared: &mut DeclaredType) {
        let mut cursor = node.walk();
        let Some(parameters) = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "parameter_list")
        else {
            return;
        };

        let mut cursor = parameters.walk();
        for parameter in parameters.named_children(&mut cursor) {
            if parameter.kind() != "parameter" {
                continue;
            }
            let (Some(name), Some(type_name)) = (
                self.field_text(parameter, "name"),
                self.field_text(parameter, "type"),
            ) else {
                continue;
            };
            declared.push_property(PropertySymbol::new(name, type_name), self.span(parameter));
        }
    }

    fn property(&self, node: Node<'_>, in_interface: bool) -> Option<PropertySymbol> {
        let name = self.field_text(node, "name")?;
        let type_name = self.field_text(node, "type")?;
        let modifiers = self.modifiers(node);

        let mut property = PropertySymbol::new(name, type_name);
        property.is_static = modifiers.iter().any(|m| m == "static");
        property.accessibility = accessibility(&modifiers, in_interface);

        let accessors = node.child_by_field_name("accessors").or_else(|| {
            let mut cursor = node.walk();
            let list = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "accessor_list");
            list
        });

        match accessors {
            Some(list) => {
                property.has_getter = false;
                property.has_setter = false;
                let mut cursor = list.walk();
                for accessor in list.named_children(&mut cursor) {
                    if accessor.kind() != "accessor_declaration" {
                        continue;
                    }
                    let hidden = self
                        .modifiers(accessor)
                        .iter()
                        .any(|m| m == "private" || m == "protected");
                    match accessor_keyword(accessor) {
                        Some("get") => property.has_getter = true,
                        Some("set") | Some("init") if !hidden => property.has_setter = true,
                        _ => {}
                    }
                }
            }
            // Expression-bodied: `public string Name => _name;`
            None => property.has_setter = false,
        }

        Some(property)
    }

    fn base_types(&self, node: Node<'_>) -> Vec<String> {
        let mut bases = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() != "base_list" {
                continue;
            }
            let mut list_cursor = child.walk();
            for base in child.named_children(&mut list_cursor) {
                let type_node = match base.kind() {
                    "argument_list" | "comment" => continue,
                    "primary_constructor_base_type" => base
                        .child_by_field_name("type")
                        .or_else(|| base.named_child(0)),
                    _ => Some(base),
                };
                if let Some(text) = type_node.and_then(|n| self.text(n)) {
                    bases.push(text);
                }
            }
        }
        bases
    }

    fn type_parameters(&self, node: Node<'_>) -> Vec<String> {
        let list = node.child_by_field_name("type_parameters").or_else(|| {
            let mut cursor = node.walk();
            let list = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "type_parameter_list");
            list
        });
        let Some(list) = list else {
            return Vec::new();
        };

        let mut cursor = list.walk();
        let parameters = list
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "type_parameter")
            .filter_map(|c| self.field_text(c, "name").or_else(|| self.text(c)))
            .collect();
        parameters
    }

    fn modifiers(&self, node: Node<'_>) -> Vec<String> {
        let mut cursor = node.walk();
        let modifiers = node
            .children(&mut cursor)
            .filter(|c| c.kind() == "modifier")
            .filter_map(|c| self.text(c))
            .collect();
        modifiers
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<String> {
        node.child_by_field_name(field).and_then(|n| self.text(n))
    }

    fn text(&self, node: Node<'_>) -> Option<String> {
        node.utf8_text(self.source)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    fn span(&self, node: Node<'_>) -> crate::outline::Span {
        self.offsets.span(node.start_byte(), node.end_byte())
    }
}

/// `get`, `set` or `init` for an accessor declaration
fn accessor_keyword(accessor: Node<'_>) -> Option<&'static str> {
    let mut cursor = accessor.walk();
    let keyword = accessor
        .children(&mut cursor)
        .find_map(|c| match c.kind() {
            "get" => Some("get"),
            "set" => Some("set"),
            "init" => Some("init"),
            _ => None,
        });
    keyword
}

fn accessibility(modifiers: &[String], in_interface: bool) -> Accessibility {
    let has = |m: &str| modifiers.iter().any(|x| x == m);
    if has("public") {
        Accessibility::Public
    } else if has("protected") && has("internal") {
        Accessibility::ProtectedInternal
    } else if has("protected") {
        Accessibility::Protected
    } else if has("internal") {
        Accessibility::Internal
    } else if in_interface {
        Accessibility::Public
    } else {
        Accessibility::Private
    }
}
