//! Tag pair parsing.

/// Parse a `[Name "Value"]` line (already trimmed).
///
/// Returns `None` if the line is not a well-formed tag pair. `\"` and `\\`
/// escapes inside the value are resolved.
pub(crate) fn parse_tag_pair(line: &str) -> Option<(&str, String)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();

    let name_end = inner.find(|c: char| c.is_whitespace() || c == '"')?;
    let name = &inner[..name_end];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let mut rest = inner[name_end..].trim_start().strip_prefix('"')?.chars();
    let mut value = String::new();
    loop {
        match rest.next()? {
            '"' => break,
            '\\' => value.push(rest.next()?),
            c => value.push(c),
        }
    }

    if rest.as_str().trim().is_empty() {
        Some((name, value))
    } else {
        None
    }
}
