//! Placeholder tokens recognised in profile templates
//!
//! Templates are plain strings containing `$token$` markers. This module owns
//! the token vocabulary and the tokenizer; substitution itself lives in the
//! generator because it needs generation state.

use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// A recognised template token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum Placeholder {
    /// Member's simple name
    #[strum(serialize = "$name$")]
    Name,
    /// Member's name split into words
    #[strum(serialize = "$namewithspaces$")]
    NameWithSpaces,
    /// Normalised type name
    #[strum(serialize = "$type$")]
    Type,
    /// Call-scoped counter, advanced on every evaluation
    #[strum(serialize = "$incint$")]
    IncrementingInteger,
    /// Most recent value of the incrementing counter
    #[strum(serialize = "$repint$")]
    RepeatingInteger,
    /// Expanded nested properties
    #[strum(serialize = "$subprops$")]
    SubProperties,
    /// Expanded enum member templates
    #[strum(serialize = "$members$")]
    EnumMembers,
    /// Enum element name (enum member template only)
    #[strum(serialize = "$element$")]
    EnumElement,
    /// Enum element name split into words (enum member template only)
    #[strum(serialize = "$elementwithspaces$")]
    EnumElementWithSpaces,
    /// Name of the enum-typed property (enum member template only)
    #[strum(serialize = "$enumname$")]
    EnumPropertyName,
    /// Generated element name for this member
    #[strum(serialize = "$xname$")]
    XName,
    /// Generated element name of the previous member in the group
    #[strum(serialize = "$repxname$")]
    RepeatingXName,
    /// Suppresses the member's fragment entirely
    #[strum(serialize = "$nooutput$")]
    NoOutput,
}

impl Placeholder {
    /// The literal token text, e.g. `$name$`
    pub fn token(&self) -> &'static str {
        (*self).into()
    }

    /// All tokens, in declaration order
    pub fn all_tokens() -> Vec<&'static str> {
        Self::iter().map(|p| p.token()).collect()
    }
}

/// A piece of a tokenized template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePart<'a> {
    /// Literal text copied to the output unchanged
    Text(&'a str),
    /// A recognised placeholder and the byte offset where it starts
    Token { placeholder: Placeholder, offset: usize },
}

/// Split a template into literal text and recognised placeholders
///
/// Anything between two `$` that is not a known token is kept as text, so
/// `$5 $name$` yields the literal `$5 ` followed by [`Placeholder::Name`].
pub fn tokenize(template: &str) -> Vec<TemplatePart<'_>> {
    let mut parts = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(rel_open) = template[cursor..].find('$') {
        let open = cursor + rel_open;
        let Some(rel_close) = template[open + 1..].find('$') else {
            break;
        };
        let close = open + 1 + rel_close;

        match Placeholder::from_str(&template[open..=close]) {
            Ok(placeholder) => {
                if open > text_start {
                    parts.push(TemplatePart::Text(&template[text_start..open]));
                }
                parts.push(TemplatePart::Token {
                    placeholder,
                    offset: open,
                });
                cursor = close + 1;
                text_start = cursor;
            }
            Err(_) => cursor = open + 1,
        }
    }

    if text_start < template.len() {
        parts.push(TemplatePart::Text(&template[text_start..]));
    }
    parts
}

/// True if the template mentions the placeholder at least once
pub fn contains(template: &str, placeholder: Placeholder) -> bool {
    tokenize(template).iter().any(|part| {
        matches!(part, TemplatePart::Token { placeholder: p, .. } if *p == placeholder)
    })
}

/// Tokens that look like placeholders (`$lowercase$`) but are not recognised
pub fn unknown_tokens(template: &str) -> Vec<&str> {
    let mut unknown = Vec::new();
    let mut cursor = 0;

    while let Some(rel_open) = template[cursor..].find('$') {
        let open = cursor + rel_open;
        let Some(rel_close) = template[open + 1..].find('$') else {
            break;
        };
        let close = open + 1 + rel_close;
        let candidate = &template[open..=close];
        let inner = &template[open + 1..close];

        if Placeholder::from_str(candidate).is_ok() {
            cursor = close + 1;
        } else if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_lowercase()) {
            unknown.push(candidate);
            cursor = close + 1;
        } else {
            cursor = open + 1;
        }
    }

    unknown
}
