//! XML-aware re-indentation of assembled output

use anyhow::{bail, Result};
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use tracing::warn;

/// Re-indent `xaml` with `indent_size` spaces per level
///
/// Output that is not well-formed XML is returned unchanged.
pub fn format_xaml(xaml: &str, indent_size: usize) -> String {
    match reindent(xaml, indent_size) {
        Ok(formatted) => formatted,
        Err(e) => {
            warn!(error = %e, "Generated XAML is not well formed, returning it unformatted");
            xaml.to_string()
        }
    }
}

fn reindent(xaml: &str, indent_size: usize) -> Result<String> {
    let mut reader = Reader::from_str(xaml);

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent_size);
    let mut depth = 0usize;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Eof => break,
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => bail!("closing tag without a matching start"),
            Event::End(_) => depth -= 1,
            // Layout between elements is replaced; text content is kept as is
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => continue,
            _ => {}
        }
        writer.write_event(event)?;
    }

    if depth != 0 {
        bail!("{depth} element(s) left unclosed");
    }

    Ok(String::from_utf8(writer.into_inner())?)
}
