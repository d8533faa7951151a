//! Name helpers used by placeholder substitution

/// Split an identifier into words: `FirstName` → `First Name`,
/// `IOStream` → `IO Stream`, `first_name` → `first name`
pub fn name_with_spaces(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 && !out.is_empty() && !out.ends_with(' ') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push(' ');
            }
        }

        out.push(c);
    }

    out.trim_end().to_string()
}

/// Suffix for a generated element name: the element enclosing `offset`
///
/// `<controls:TextBlock x:Name="$xname$"` gives `TextBlock`. Falls back to
/// `Element` when the token is not inside a start tag.
pub fn element_name_suffix(template: &str, offset: usize) -> String {
    let before = &template[..offset.min(template.len())];
    let Some(open) = before.rfind('<') else {
        return "Element".to_string();
    };
    if before[open..].contains('>') {
        return "Element".to_string();
    }

    let tag: String = before[open + 1..]
        .chars()
        .take_while(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '.'))
        .collect();
    let local = tag.rsplit(':').next().unwrap_or_default();
    let element = local.split('.').next().unwrap_or_default();

    if element.is_empty() {
        "Element".to_string()
    } else {
        element.to_string()
    }
}
