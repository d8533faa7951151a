//! Language-agnostic type references
//!
//! Property types arrive as the text written in source (`List<Order>`,
//! `List(Of Order)`, `Boolean()`, `int?`, ...). [`TypeRef::parse`] turns
//! either spelling into one normalised shape so matching and display do not
//! depend on the source language.

use std::collections::HashMap;
use std::fmt;

/// C# keyword types, the canonical spelling after normalisation
pub const PREDEFINED_TYPES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "nint",
    "nuint", "long", "ulong", "short", "ushort", "object", "string",
];

/// Framework types treated as leaf values rather than objects with members
pub const WELL_KNOWN_VALUE_TYPES: &[&str] = &[
    "DateTime",
    "DateTimeOffset",
    "DateOnly",
    "TimeOnly",
    "TimeSpan",
    "Guid",
    "Uri",
    "Color",
    "Brush",
    "ImageSource",
    "BitmapImage",
    "Geopoint",
    "ICommand",
];

/// VB and CLR spellings mapped onto C# keywords (compared case-insensitively)
const ALIASES: &[(&str, &str)] = &[
    ("Integer", "int"),
    ("Int32", "int"),
    ("UInteger", "uint"),
    ("UInt32", "uint"),
    ("Long", "long"),
    ("Int64", "long"),
    ("ULong", "ulong"),
    ("UInt64", "ulong"),
    ("Short", "short"),
    ("Int16", "short"),
    ("UShort", "ushort"),
    ("UInt16", "ushort"),
    ("Byte", "byte"),
    ("SByte", "sbyte"),
    ("Boolean", "bool"),
    ("String", "string"),
    ("Char", "char"),
    ("Single", "float"),
    ("Double", "double"),
    ("Decimal", "decimal"),
    ("Object", "object"),
    ("Date", "DateTime"),
    ("IntPtr", "nint"),
    ("UIntPtr", "nuint"),
];

/// A parsed, normalised type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A named type, possibly generic
    Named {
        /// Namespace or containing type as written (`System.Collections.Generic`)
        qualifier: Option<String>,
        name: String,
        args: Vec<TypeRef>,
    },
    /// Single or multi-dimensional array
    Array { element: Box<TypeRef>, rank: usize },
    /// `T?` / `Nullable<T>` / `Nullable(Of T)`
    Nullable(Box<TypeRef>),
    /// C# value tuple
    Tuple(Vec<TypeRef>),
    /// The untyped `dynamic` marker
    Dynamic,
}

impl TypeRef {
    /// Parse a type as written in C# or VB source
    ///
    /// Returns `None` for text that is not a type at all (empty, unbalanced
    /// brackets, trailing garbage).
    pub fn parse(text: &str) -> Option<Self> {
        let mut parser = TypeParser::new(text);
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.at_end() {
            Some(ty)
        } else {
            None
        }
    }

    /// A simple named type with no qualifier or arguments
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            qualifier: None,
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Replace unqualified type parameter names with their bound arguments
    pub fn substitute(&self, bindings: &HashMap<String, TypeRef>) -> TypeRef {
        match self {
            Self::Named {
                qualifier: None,
                name,
                args,
            } if args.is_empty() => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
            Self::Named {
                qualifier,
                name,
                args,
            } => Self::Named {
                qualifier: qualifier.clone(),
                name: name.clone(),
                args: args.iter().map(|arg| arg.substitute(bindings)).collect(),
            },
            Self::Array { element, rank } => Self::Array {
                element: Box::new(element.substitute(bindings)),
                rank: *rank,
            },
            Self::Nullable(inner) => Self::Nullable(Box::new(inner.substitute(bindings))),
            Self::Tuple(items) => Self::Tuple(items.iter().map(|item| item.substitute(bindings)).collect()),
            Self::Dynamic => Self::Dynamic,
        }
    }

    /// Unqualified name of a named type, or the display form otherwise
    pub fn simple_name(&self) -> String {
        match self {
            Self::Named { name, .. } => name.clone(),
            other => other.to_string(),
        }
    }

    /// Namespace-qualified name without generic arguments, for resolution
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            Self::Named {
                qualifier: Some(q),
                name,
                ..
            } => Some(format!("{q}.{name}")),
            Self::Named { name, .. } => Some(name.clone()),
            _ => None,
        }
    }

    pub fn qualifier(&self) -> Option<&str> {
        match self {
            Self::Named { qualifier, .. } => qualifier.as_deref(),
            _ => None,
        }
    }

    /// Generic arguments of a named type
    pub fn type_args(&self) -> &[TypeRef] {
        match self {
            Self::Named { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic)
    }

    /// C# keyword types (after alias normalisation)
    pub fn is_predefined(&self) -> bool {
        matches!(self, Self::Named { name, args, .. } if args.is_empty() && PREDEFINED_TYPES.contains(&name.as_str()))
    }

    /// Keyword types plus framework leaf types such as `DateTime`
    pub fn is_builtin_value(&self) -> bool {
        self.is_predefined()
            || matches!(self, Self::Named { name, args, .. } if args.is_empty() && WELL_KNOWN_VALUE_TYPES.contains(&name.as_str()))
    }

    /// The inner type of a nullable, or the type itself
    pub fn strip_nullable(&self) -> &TypeRef {
        match self {
            Self::Nullable(inner) => inner.strip_nullable(),
            other => other,
        }
    }

    /// Element type of an array, or the single argument of a one-argument generic
    pub fn element_type(&self) -> Option<&TypeRef> {
        match self {
            Self::Array { element, .. } => Some(element),
            Self::Named { args, .. } if args.len() == 1 => args.first(),
            _ => None,
        }
    }

    /// Check this type against a mapping pattern
    ///
    /// Matching is structural and case-sensitive on simple names. Inside
    /// generic arguments, array elements, nullables and tuples a bare `T`
    /// in the pattern matches anything, so `List<T>` matches `List<Order>`
    /// and `T[]` matches every single-dimensional array.
    pub fn matches_pattern(&self, pattern: &TypeRef) -> bool {
        self.matches(pattern, false)
    }

    fn matches(&self, pattern: &TypeRef, nested: bool) -> bool {
        if nested && pattern.is_wildcard() {
            return true;
        }

        match (self, pattern) {
            (
                Self::Named { name, args, .. },
                Self::Named {
                    name: p_name,
                    args: p_args,
                    ..
                },
            ) => {
                name == p_name
                    && args.len() == p_args.len()
                    && args.iter().zip(p_args).all(|(a, p)| a.matches(p, true))
            }
            (
                Self::Array { element, rank },
                Self::Array {
                    element: p_element,
                    rank: p_rank,
                },
            ) => rank == p_rank && element.matches(p_element, true),
            (Self::Nullable(inner), Self::Nullable(p_inner)) => inner.matches(p_inner, true),
            (Self::Tuple(items), Self::Tuple(p_items)) => {
                items.len() == p_items.len()
                    && items.iter().zip(p_items).all(|(a, p)| a.matches(p, true))
            }
            (Self::Dynamic, Self::Dynamic) => true,
            _ => false,
        }
    }

    fn is_wildcard(&self) -> bool {
        matches!(self, Self::Named { qualifier: None, name, args } if name == "T" && args.is_empty())
    }

    fn normalize(self) -> Self {
        match self {
            Self::Named {
                qualifier,
                name,
                args,
            } => {
                let system_or_none = qualifier
                    .as_deref()
                    .map(|q| q == "System")
                    .unwrap_or(true);

                if system_or_none && args.is_empty() {
                    if qualifier.is_none() && name == "dynamic" {
                        return Self::Dynamic;
                    }
                    if let Some((_, keyword)) = ALIASES
                        .iter()
                        .find(|(alias, _)| alias.eq_ignore_ascii_case(&name))
                    {
                        return Self::named(*keyword);
                    }
                }

                if system_or_none && name == "Nullable" && args.len() == 1 {
                    if let Some(inner) = args.into_iter().next() {
                        return Self::Nullable(Box::new(inner));
                    }
                    return Self::named("Nullable");
                }

                Self::Named {
                    qualifier,
                    name,
                    args,
                }
            }
            other => other,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, args, .. } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Self::Array { element, rank } => {
                write!(f, "{element}[{}]", ",".repeat(rank.saturating_sub(1)))
            }
            Self::Nullable(inner) => write!(f, "{inner}?"),
            Self::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Recursive-descent parser over both C# and VB type syntax
struct TypeParser {
    chars: Vec<char>,
    pos: usize,
}

impl TypeParser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_type(&mut self) -> Option<TypeRef> {
        self.skip_ws();
        let mut ty = if self.peek() == Some('(') {
            self.parse_tuple()?
        } else {
            self.parse_named()?
        };

        loop {
            self.skip_ws();
            match self.peek() {
                Some('?') => {
                    self.pos += 1;
                    ty = TypeRef::Nullable(Box::new(ty));
                }
                Some('[') => {
                    let rank = self.parse_rank(']')?;
                    ty = TypeRef::Array {
                        element: Box::new(ty),
                        rank,
                    };
                }
                Some('(') if self.is_vb_array_suffix() => {
                    let rank = self.parse_rank(')')?;
                    ty = TypeRef::Array {
                        element: Box::new(ty),
                        rank,
                    };
                }
                _ => break,
            }
        }

        Some(ty)
    }

    fn parse_identifier(&mut self) -> Option<String> {
        self.skip_ws();
        let start = self.pos;
        if self.peek() == Some('@') {
            self.pos += 1;
        }
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        let ident: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '@')
            .collect();
        if ident.is_empty() {
            None
        } else {
            Some(ident)
        }
    }

    fn parse_named(&mut self) -> Option<TypeRef> {
        let mut segments = vec![self.parse_identifier()?];

        loop {
            self.skip_ws();
            if self.peek() == Some('.') {
                self.pos += 1;
            } else if self.peek() == Some(':') && self.chars.get(self.pos + 1) == Some(&':') {
                self.pos += 2;
                // `global::` only anchors the lookup, it is not a namespace
                if segments.len() == 1 && segments[0] == "global" {
                    segments.clear();
                }
            } else {
                break;
            }
            segments.push(self.parse_identifier()?);
        }

        self.skip_ws();
        let args = if self.peek() == Some('<') {
            self.pos += 1;
            self.parse_list('>')?
        } else if self.is_vb_generic_open() {
            // consume "(Of"
            self.pos += 1;
            self.skip_ws();
            self.pos += 2;
            self.parse_list(')')?
        } else {
            Vec::new()
        };

        let name = segments.pop()?;
        let qualifier = if segments.is_empty() {
            None
        } else {
            Some(segments.join("."))
        };

        Some(
            TypeRef::Named {
                qualifier,
                name,
                args,
            }
            .normalize(),
        )
    }

    fn parse_list(&mut self, close: char) -> Option<Vec<TypeRef>> {
        let mut items = Vec::new();
        loop {
            items.push(self.parse_type()?);
            if self.eat(',') {
                continue;
            }
            if self.eat(close) {
                return Some(items);
            }
            return None;
        }
    }

    fn parse_tuple(&mut self) -> Option<TypeRef> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            items.push(self.parse_type()?);
            self.skip_ws();
            // element names: (int Count, string Label)
            if self
                .peek()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '@')
            {
                self.parse_identifier()?;
            }
            if self.eat(',') {
                continue;
            }
            if self.eat(')') {
                return Some(TypeRef::Tuple(items));
            }
            return None;
        }
    }

    fn parse_rank(&mut self, close: char) -> Option<usize> {
        self.pos += 1;
        let mut rank = 1;
        loop {
            self.skip_ws();
            match self.peek()? {
                ',' => rank += 1,
                c if c == close => {
                    self.pos += 1;
                    return Some(rank);
                }
                _ => return None,
            }
            self.pos += 1;
        }
    }

    /// `(` followed by `Of` and whitespace
    fn is_vb_generic_open(&self) -> bool {
        if self.peek() != Some('(') {
            return false;
        }
        let mut i = self.pos + 1;
        while self.chars.get(i).is_some_and(|c| c.is_whitespace()) {
            i += 1;
        }
        let of: String = self.chars.iter().skip(i).take(2).collect();
        of.eq_ignore_ascii_case("of") && self.chars.get(i + 2).is_some_and(|c| c.is_whitespace())
    }

    /// `()` or `(,)` after a type
    fn is_vb_array_suffix(&self) -> bool {
        let mut i = self.pos + 1;
        while let Some(c) = self.chars.get(i) {
            match c {
                ')' => return true,
                ',' => i += 1,
                c if c.is_whitespace() => i += 1,
                _ => return false,
            }
        }
        false
    }
}
