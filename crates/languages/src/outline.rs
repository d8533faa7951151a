//! Language-neutral view of a parsed document
//!
//! Front doors produce a [`DocumentOutline`]: every declared type with its
//! symbol and the character spans of its properties and of the members that
//! are not properties. Target location for a caret or a selection works on
//! this outline only, so it is shared by every language.

use xamlgen_core::symbols::{PropertySymbol, TypeIndex, TypeSymbol};

/// Half-open range of zero-based character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A caret sits in the span from just before its first character to
    /// just after its last
    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }

    /// True if the span shares at least one caret position with `[start, end]`
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        self.start <= end && start <= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Converts byte offsets into character offsets
#[derive(Debug, Clone)]
pub struct OffsetMap {
    /// Byte offset at which each character starts
    char_starts: Vec<usize>,
    byte_len: usize,
}

impl OffsetMap {
    pub fn new(text: &str) -> Self {
        Self {
            char_starts: text.char_indices().map(|(i, _)| i).collect(),
            byte_len: text.len(),
        }
    }

    /// Character offset of `byte`; offsets inside a character round up
    pub fn char_offset(&self, byte: usize) -> usize {
        if byte >= self.byte_len {
            return self.char_starts.len();
        }
        self.char_starts.partition_point(|&start| start < byte)
    }

    pub fn span(&self, start_byte: usize, end_byte: usize) -> Span {
        Span::new(self.char_offset(start_byte), self.char_offset(end_byte))
    }

    /// Number of characters in the text
    pub fn char_len(&self) -> usize {
        self.char_starts.len()
    }
}

/// A type declared in the document
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredType {
    pub symbol: TypeSymbol,

    /// Whole declaration including attributes and body
    pub span: Span,

    /// Parallel to `symbol.properties`
    pub property_spans: Vec<Span>,

    /// Methods, constructors, fields, events and other non-property members
    pub member_spans: Vec<Span>,
}

impl DeclaredType {
    pub fn new(symbol: TypeSymbol, span: Span) -> Self {
        Self {
            symbol,
            span,
            property_spans: Vec::new(),
            member_spans: Vec::new(),
        }
    }

    pub fn push_property(&mut self, property: PropertySymbol, span: Span) {
        self.symbol.properties.push(property);
        self.property_spans.push(span);
    }

    pub fn push_member(&mut self, span: Span) {
        self.member_spans.push(span);
    }

    fn properties_with_spans(&self) -> impl Iterator<Item = (usize, &PropertySymbol, Span)> {
        self.symbol
            .properties
            .iter()
            .zip(&self.property_spans)
            .enumerate()
            .map(|(i, (property, span))| (i, property, *span))
    }
}

/// What a caret position points at
#[derive(Debug, Clone, Copy)]
pub enum Target<'o> {
    Property {
        declared: &'o DeclaredType,
        index: usize,
    },
    Type(&'o DeclaredType),
    None,
}

impl<'o> Target<'o> {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// All declared types of one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentOutline {
    pub types: Vec<DeclaredType>,
}

impl DocumentOutline {
    pub fn new(types: Vec<DeclaredType>) -> Self {
        Self { types }
    }

    /// Symbols of this document, for layering over a host model
    pub fn type_index(&self) -> TypeIndex {
        TypeIndex::from_types(self.types.iter().map(|t| t.symbol.clone()))
    }

    /// Resolve a caret position
    ///
    /// The innermost type containing the position is considered. A property
    /// span wins, any other member span means nothing is targeted, and
    /// anything else inside a class, struct or record targets the whole type.
    pub fn locate(&self, position: usize) -> Target<'_> {
        let Some(declared) = self
            .types
            .iter()
            .filter(|t| t.span.contains(position))
            .min_by_key(|t| t.span.len())
        else {
            return Target::None;
        };

        if let Some((index, _, _)) = declared
            .properties_with_spans()
            .find(|(_, _, span)| span.contains(position))
        {
            return Target::Property { declared, index };
        }

        let in_other_member = declared
            .member_spans
            .iter()
            .any(|span| span.contains(position));
        if in_other_member || !declared.symbol.has_members() {
            return Target::None;
        }

        Target::Type(declared)
    }

    /// Properties whose span intersects `[start, end]`, in source order
    pub fn properties_in(&self, start: usize, end: usize) -> Vec<(&PropertySymbol, &TypeSymbol)> {
        let mut found: Vec<(Span, &PropertySymbol, &TypeSymbol)> = self
            .types
            .iter()
            .flat_map(|declared| {
                declared
                    .properties_with_spans()
                    .filter(move |(_, _, span)| span.intersects(start, end))
                    .map(move |(_, property, span)| (span, property, &declared.symbol))
            })
            .collect();
        found.sort_by_key(|(span, _, _)| span.start);
        found
            .into_iter()
            .map(|(_, property, ty)| (property, ty))
            .collect()
    }
}
