//! Visual Basic front door
//!
//! There is no maintained tree-sitter grammar for VB.NET, so this is a line
//! scanner over the declaration forms that matter for generation: namespaces,
//! types, `Inherits`/`Implements`, properties (auto and expanded), enum
//! members, and the other members that only need a span. Line continuations
//! (` _`) are not joined.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;
use xamlgen_core::error::Result;
use xamlgen_core::symbols::{Accessibility, PropertySymbol, TypeKind, TypeSymbol};

use crate::outline::{DeclaredType, DocumentOutline, Span};
use crate::{DocumentAnalyzer, LanguageDescriptor, SourceLanguage};

inventory::submit! {
    LanguageDescriptor {
        language: SourceLanguage::VisualBasic,
        extensions: &["vb"],
        factory: create_vb_analyzer,
    }
}

fn create_vb_analyzer() -> Result<Box<dyn DocumentAnalyzer>> {
    Ok(Box::new(VbAnalyzer))
}

static NAMESPACE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*Namespace\s+([\w.]+)").ok());
static END_NAMESPACE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*End\s+Namespace\b").ok());
static TYPE_START: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:<.*>\s*)?(?:(?:Public|Private|Protected|Friend|Partial|MustInherit|NotInheritable|Shadows|Shared)\s+)*(Class|Structure|Interface|Enum|Module)\s+(\w+)(?:\s*\(\s*Of\s+([^)]*)\))?",
    )
    .ok()
});
static TYPE_END: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*End\s+(Class|Structure|Interface|Enum|Module)\b").ok()
});
static INHERITS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:Inherits|Implements)\s+(.+)$").ok());
static PROPERTY: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:<.*>\s*)?((?:(?:Public|Private|Protected|Friend|Shared|ReadOnly|WriteOnly|Overridable|Overrides|Overloads|Shadows|MustOverride|NotOverridable|Default|Iterator|Async|Partial)\s+)*)Property\s+(\w+)\s*(?:\(\s*\))?\s*(?:As\s+(New\s+)?(.+))?$",
    )
    .ok()
});
static ACCESSOR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(Public|Private|Protected|Friend)\s+)*(Get|Set)\b").ok()
});
static BLOCK_MEMBER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:<.*>\s*)?((?:(?:Public|Private|Protected|Friend|Shared|Overridable|Overrides|Overloads|Shadows|MustOverride|NotOverridable|Async|Iterator|Partial|Static|Narrowing|Widening|Default|ReadOnly|WriteOnly|Custom)\s+)*)(Sub|Function|Operator|Property|Event)\b",
    )
    .ok()
});
static FIELD: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:<.*>\s*)?(?:(?:Public|Private|Protected|Friend|Shared|ReadOnly|Dim|Const|WithEvents|Shadows|Declare)\s+)+\w+",
    )
    .ok()
});
static ENUM_MEMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:<.*>\s*)?(\w+)\s*(?:=.*)?$").ok());

fn captures<'t>(pattern: &LazyLock<Option<Regex>>, text: &'t str) -> Option<Captures<'t>> {
    pattern.as_ref().and_then(|re| re.captures(text))
}

fn is_match(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

pub(crate) struct VbAnalyzer;

impl DocumentAnalyzer for VbAnalyzer {
    fn language(&self) -> SourceLanguage {
        SourceLanguage::VisualBasic
    }

    fn outline(&self, source: &str) -> Result<DocumentOutline> {
        let outline = Scanner::new(source).scan();
        debug!(type_count = outline.types.len(), "Outlined VB document");
        Ok(outline)
    }
}

/// One physical line with its character range (newline excluded)
#[derive(Debug, Clone, Copy)]
struct Line<'s> {
    text: &'s str,
    start: usize,
    end: usize,
}

fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for raw in source.split_inclusive('\n') {
        let text = raw.trim_end_matches(|c| c == '\n' || c == '\r');
        let len = text.chars().count();
        lines.push(Line {
            text,
            start: offset,
            end: offset + len,
        });
        offset += raw.chars().count();
    }
    lines
}

fn is_comment_or_blank(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.is_empty()
        || trimmed.starts_with('\'')
        || trimmed
            .get(..4)
            .is_some_and(|keyword| keyword.eq_ignore_ascii_case("rem "))
}

/// Code part of a line, without a trailing `'` comment outside string literals
fn strip_comment(text: &str) -> &str {
    let mut in_string = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '\'' if !in_string => return text[..i].trim_end(),
            _ => {}
        }
    }
    text.trim_end()
}

/// Split on commas that are not inside parentheses
fn split_top_level(list: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in list.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    parts.push(current.trim().to_string());
    parts.retain(|p| !p.is_empty());
    parts
}

/// Declared type of a property from the text after `As`
///
/// Drops initialisers (`= value`), `Implements` clauses and, for
/// `As New T(...)`, the constructor arguments.
fn clean_property_type(raw: &str, has_new: bool) -> String {
    let mut depth = 0usize;
    let mut end = raw.len();
    for (i, c) in raw.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    let mut type_text = raw[..end].trim();

    let lower = type_text.to_ascii_lowercase();
    if let Some(index) = lower.find(" implements ") {
        type_text = type_text[..index].trim();
    }

    if has_new && type_text.ends_with(')') {
        if let Some(open) = type_text.rfind('(') {
            let args = type_text[open + 1..].trim_start();
            let is_generic = args.get(..3).is_some_and(|of| of.eq_ignore_ascii_case("of "));
            if !is_generic {
                type_text = type_text[..open].trim();
            }
        }
    }

    type_text.to_string()
}

fn has_modifier(modifiers: &str, modifier: &str) -> bool {
    modifiers
        .split_whitespace()
        .any(|m| m.eq_ignore_ascii_case(modifier))
}

fn accessibility(modifiers: &str) -> Accessibility {
    let protected = has_modifier(modifiers, "Protected");
    let friend = has_modifier(modifiers, "Friend");
    if has_modifier(modifiers, "Public") {
        Accessibility::Public
    } else if protected && friend {
        Accessibility::ProtectedInternal
    } else if protected {
        Accessibility::Protected
    } else if friend {
        Accessibility::Internal
    } else if has_modifier(modifiers, "Private") {
        Accessibility::Private
    } else {
        Accessibility::Public
    }
}

fn type_kind(keyword: &str) -> TypeKind {
    match keyword.to_ascii_lowercase().as_str() {
        "structure" => TypeKind::Struct,
        "interface" => TypeKind::Interface,
        "enum" => TypeKind::Enum,
        "module" => TypeKind::Module,
        _ => TypeKind::Class,
    }
}

struct Scanner<'s> {
    lines: Vec<Line<'s>>,
    namespaces: Vec<String>,
    open: Vec<usize>,
    types: Vec<DeclaredType>,
}

impl<'s> Scanner<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            lines: split_lines(source),
            namespaces: Vec::new(),
            open: Vec::new(),
            types: Vec::new(),
        }
    }

    fn scan(mut self) -> DocumentOutline {
        let mut i = 0;
        while i < self.lines.len() {
            i = self.scan_line(i) + 1;
        }

        // Unterminated types run to the end of the document
        let end = self.lines.last().map(|l| l.end).unwrap_or(0);
        while let Some(open) = self.open.pop() {
            self.types[open].span.end = end;
        }

        DocumentOutline::new(self.types)
    }

    /// Handle the construct starting at line `i`; returns its last line
    fn scan_line(&mut self, i: usize) -> usize {
        let line = self.lines[i];
        if is_comment_or_blank(line.text) {
            return i;
        }
        let code = strip_comment(line.text);

        if let Some(caps) = captures(&NAMESPACE, code) {
            self.namespaces.push(caps[1].to_string());
            return i;
        }
        if is_match(&END_NAMESPACE, code) {
            self.namespaces.pop();
            return i;
        }
        if let Some(caps) = captures(&TYPE_START, code) {
            self.open_type(&caps, line);
            return i;
        }
        if is_match(&TYPE_END, code) {
            if let Some(open) = self.open.pop() {
                self.types[open].span.end = line.end;
            }
            return i;
        }

        let Some(&index) = self.open.last() else {
            return i;
        };
        let kind = self.types[index].symbol.kind;

        if kind == TypeKind::Enum {
            if let Some(caps) = captures(&ENUM_MEMBER, code) {
                self.types[index].symbol.enum_members.push(caps[1].to_string());
            }
            return i;
        }

        if let Some(caps) = captures(&INHERITS, code) {
            let bases = split_top_level(&caps[1]);
            self.types[index].symbol.base_types.extend(bases);
            return i;
        }

        if let Some(caps) = captures(&PROPERTY, code) {
            return self.property(i, &caps, index, kind);
        }

        if let Some(caps) = captures(&BLOCK_MEMBER, code) {
            let last = self.block_end(i, &caps, kind == TypeKind::Interface);
            let span = Span::new(line.start, self.lines[last].end);
            self.types[index].push_member(span);
            return last;
        }

        if is_match(&FIELD, code) {
            self.types[index].push_member(Span::new(line.start, line.end));
        }

        i
    }

    fn open_type(&mut self, caps: &Captures<'_>, line: Line<'_>) {
        let keyword = &caps[1];
        let name = caps[2].to_string();

        let mut path = self.namespaces.clone();
        path.extend(self.open.iter().map(|&o| self.types[o].symbol.name.clone()));

        let mut symbol = TypeSymbol::new(name, type_kind(keyword)).with_case_insensitive_names();
        if !path.is_empty() {
            symbol.namespace = Some(path.join("."));
        }
        if let Some(parameters) = caps.get(3) {
            symbol.type_parameters = split_top_level(parameters.as_str());
        }

        self.types
            .push(DeclaredType::new(symbol, Span::new(line.start, line.end)));
        self.open.push(self.types.len() - 1);
    }

    fn property(
        &mut self,
        i: usize,
        caps: &Captures<'_>,
        index: usize,
        kind: TypeKind,
    ) -> usize {
        let modifiers = caps.get(1).map_or("", |m| m.as_str());
        let name = caps[2].to_string();
        let type_name = caps
            .get(4)
            .map(|m| clean_property_type(m.as_str(), caps.get(3).is_some()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Object".to_string());

        let mut property = PropertySymbol::new(name, type_name);
        property.is_static = kind == TypeKind::Module || has_modifier(modifiers, "Shared");
        property.accessibility = accessibility(modifiers);

        let read_only = has_modifier(modifiers, "ReadOnly");
        let write_only = has_modifier(modifiers, "WriteOnly");
        let single_line = kind == TypeKind::Interface || has_modifier(modifiers, "MustOverride");

        let mut last = i;
        match self.expanded_property_end(i).filter(|_| !single_line) {
            Some((end, has_get, has_visible_set)) => {
                last = end;
                property.has_getter = has_get;
                property.has_setter = has_visible_set && !read_only;
            }
            None => {
                property.has_getter = !write_only;
                property.has_setter = !read_only;
            }
        }

        let span = Span::new(self.lines[i].start, self.lines[last].end);
        self.types[index].push_property(property, span);
        last
    }

    /// For an expanded property starting at `i`: its `End Property` line and
    /// whether it has a getter and a setter usable from outside
    fn expanded_property_end(&self, i: usize) -> Option<(usize, bool, bool)> {
        let next = (i + 1..self.lines.len()).find(|&j| !is_comment_or_blank(self.lines[j].text))?;
        if !is_match(&ACCESSOR, strip_comment(self.lines[next].text)) {
            return None;
        }

        let mut has_get = false;
        let mut has_visible_set = false;
        for j in next..self.lines.len() {
            let code = strip_comment(self.lines[j].text);
            if code.trim_start().to_ascii_lowercase().starts_with("end property") {
                return Some((j, has_get, has_visible_set));
            }
            let Some(caps) = captures(&ACCESSOR, code) else {
                continue;
            };
            if caps[2].eq_ignore_ascii_case("get") {
                has_get = true;
            } else {
                let hidden = caps.get(1).is_some_and(|m| {
                    m.as_str().eq_ignore_ascii_case("private")
                        || m.as_str().eq_ignore_ascii_case("protected")
                });
                has_visible_set |= !hidden;
            }
        }

        Some((self.lines.len() - 1, has_get, has_visible_set))
    }

    /// Last line of a `Sub`/`Function`/`Operator`/`Event` member
    fn block_end(&self, i: usize, caps: &Captures<'_>, in_interface: bool) -> usize {
        let modifiers = caps.get(1).map_or("", |m| m.as_str());
        let keyword = caps[2].to_ascii_lowercase();

        let is_block = match keyword.as_str() {
            "event" => has_modifier(modifiers, "Custom"),
            _ => !in_interface && !has_modifier(modifiers, "MustOverride"),
        };
        if !is_block {
            return i;
        }

        let terminator = format!("end {keyword}");
        (i + 1..self.lines.len())
            .find(|&j| {
                strip_comment(self.lines[j].text)
                    .trim_start()
                    .to_ascii_lowercase()
                    .starts_with(&terminator)
            })
            .unwrap_or(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Target;
    use pretty_assertions::assert_eq;

    const VIEW_MODEL: &str = r#"Imports System.Collections.ObjectModel

Namespace App.ViewModels
    ' Main screen
    Public Class MainViewModel
        Inherits ViewModelBase
        Implements INotifyPropertyChanged, IDisposable

        Private _title As String

        Public Property Title As String
            Get
                Return _title
            End Get
            Set(value As String)
                _title = value
            End Set
        End Property

        Public Property Count As Integer
            Get
                Return 1
            End Get
            Private Set(value As Integer)
            End Set
        End Property

        Public ReadOnly Property Summary As String

        Public Shared Property Instance As MainViewModel

        Friend Property Orders As New ObservableCollection(Of Order)()

        Public Property Total As Decimal = 0D ' running total

        Public Sub Refresh()
            Dim hidden As Integer = 1
        End Sub

        Public Class Nested
            Public Property Flag As Boolean
        End Class
    End Class

    Public Enum Status
        Active
        Inactive = 5
        OnHold
    End Enum

    Public Interface IHasName
        Property Name As String
        Function GetName() As String
    End Interface
End Namespace
"#;

    fn outline() -> DocumentOutline {
        VbAnalyzer.outline(VIEW_MODEL).unwrap()
    }

    #[test]
    fn test_declared_types() {
        let outline = outline();
        let names: Vec<String> = outline.types.iter().map(|t| t.symbol.full_name()).collect();
        assert_eq!(
            names,
            vec![
                "App.ViewModels.MainViewModel",
                "App.ViewModels.MainViewModel.Nested",
                "App.ViewModels.Status",
                "App.ViewModels.IHasName",
            ]
        );
        assert_eq!(
            outline.types[0].symbol.base_types,
            vec!["ViewModelBase", "INotifyPropertyChanged", "IDisposable"]
        );
    }

    #[test]
    fn test_properties() {
        let outline = outline();
        let vm = &outline.types[0];
        let summary: Vec<(&str, &str, bool, bool)> = vm
            .symbol
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_str(), p.is_read_only(), p.is_static))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Title", "String", false, false),
                ("Count", "Integer", true, false),
                ("Summary", "String", true, false),
                ("Instance", "MainViewModel", false, true),
                ("Orders", "ObservableCollection(Of Order)", false, false),
                ("Total", "Decimal", false, false),
            ]
        );
        assert_eq!(vm.symbol.properties[4].accessibility, Accessibility::Internal);
        // field and Sub; the Dim inside the Sub is not a member
        assert_eq!(vm.member_spans.len(), 2);
    }

    #[test]
    fn test_expanded_property_span_covers_accessors() {
        let outline = outline();
        let span = outline.types[0].property_spans[0];
        let chars: Vec<char> = VIEW_MODEL.chars().collect();
        let text: String = chars[span.start..span.end].iter().collect();
        assert!(text.trim_start().starts_with("Public Property Title As String"));
        assert!(text.ends_with("End Property"));
    }

    #[test]
    fn test_enum_and_interface() {
        let outline = outline();
        assert_eq!(
            outline.types[2].symbol.enum_members,
            vec!["Active", "Inactive", "OnHold"]
        );

        let iface = &outline.types[3];
        assert_eq!(iface.symbol.kind, TypeKind::Interface);
        assert_eq!(iface.symbol.properties[0].name, "Name");
        assert_eq!(iface.member_spans.len(), 1);
    }

    #[test]
    fn test_clean_property_type() {
        assert_eq!(clean_property_type("List(Of String)", false), "List(Of String)");
        assert_eq!(clean_property_type("List(Of String)()", true), "List(Of String)");
        assert_eq!(clean_property_type("Integer = 5", false), "Integer");
        assert_eq!(
            clean_property_type("String Implements IHasName.Name", false),
            "String"
        );
        assert_eq!(clean_property_type("Integer()", false), "Integer()");
    }

    #[test]
    fn test_generic_type_parameters_and_module() {
        let source = "Public Class Repository(Of TItem, TKey)\n    Public Property Items As List(Of TItem)\nEnd Class\nModule Globals\n    Property Current As String\nEnd Module\n";
        let outline = VbAnalyzer.outline(source).unwrap();
        assert_eq!(outline.types[0].symbol.type_parameters, vec!["TItem", "TKey"]);
        assert_eq!(outline.types[1].symbol.kind, TypeKind::Module);
        assert!(outline.types[1].symbol.properties[0].is_static);
    }

    #[test]
    fn test_caret_inside_module_targets_nothing() {
        let source = "Module Globals\n    Property Current As String\n\n    Sub Reset()\n    End Sub\nEnd Module\n";
        let outline = VbAnalyzer.outline(source).unwrap();
        let blank_line = source.find("\n\n").unwrap() + 1;
        assert!(matches!(outline.locate(blank_line), Target::None));
        assert!(matches!(outline.locate(0), Target::None));
    }

    #[test]
    fn test_types_are_marked_case_insensitive() {
        let outline = VbAnalyzer.outline(VIEW_MODEL).unwrap();
        assert!(outline.types.iter().all(|t| t.symbol.case_insensitive));
    }
}
