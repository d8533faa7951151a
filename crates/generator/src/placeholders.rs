//! Placeholder substitution
//!
//! Substitution is a single left-to-right pass over a template, so every
//! stateful token (`$incint$`, `$xname$`) is evaluated in document order,
//! including the ones inside nested `$subprops$` expansions.

use xamlgen_core::placeholder::{tokenize, Placeholder, TemplatePart};

/// Supplies values for placeholders as they are encountered
pub trait PlaceholderSource {
    /// Value for `placeholder`, found at byte `offset` of `template`
    ///
    /// Tokens that make no sense in the current context resolve to an
    /// empty string.
    fn resolve(&mut self, placeholder: Placeholder, template: &str, offset: usize) -> String;
}

/// Replace every recognised token in `template`; unknown tokens stay verbatim
pub fn substitute<S>(template: &str, source: &mut S) -> String
where
    S: PlaceholderSource + ?Sized,
{
    let mut output = String::with_capacity(template.len());
    for part in tokenize(template) {
        match part {
            TemplatePart::Text(text) => output.push_str(text),
            TemplatePart::Token {
                placeholder,
                offset,
            } => output.push_str(&source.resolve(placeholder, template, offset)),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Recorder {
        seen: Vec<(Placeholder, usize)>,
    }

    impl PlaceholderSource for Recorder {
        fn resolve(&mut self, placeholder: Placeholder, _template: &str, offset: usize) -> String {
            self.seen.push((placeholder, offset));
            match placeholder {
                Placeholder::Name => "Title".to_string(),
                Placeholder::IncrementingInteger => self.seen.len().to_string(),
                _ => String::new(),
            }
        }
    }

    #[test]
    fn test_substitutes_in_order() {
        let mut recorder = Recorder { seen: Vec::new() };
        let output = substitute(
            "<A Text=\"$name$\" Row=\"$incint$\" Tag=\"$element$\" Price=\"$5$\" />",
            &mut recorder,
        );

        assert_eq!(
            output,
            "<A Text=\"Title\" Row=\"2\" Tag=\"\" Price=\"$5$\" />"
        );
        assert_eq!(
            recorder.seen,
            vec![
                (Placeholder::Name, 9),
                (Placeholder::IncrementingInteger, 22),
                (Placeholder::EnumElement, 37),
            ]
        );
    }

    #[test]
    fn test_unknown_lowercase_token_left_verbatim() {
        let mut recorder = Recorder { seen: Vec::new() };
        assert_eq!(substitute("$unknown$ $name$", &mut recorder), "$unknown$ Title");
    }
}
