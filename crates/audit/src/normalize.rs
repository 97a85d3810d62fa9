/// Canonical form used for duplicate keys and generic-name matching.
///
/// Missing values become `""`, whitespace runs collapse to a single space,
/// the ends are trimmed and the result is lower-cased. The ASCII
/// information separators (U+001C..U+001F) also count as whitespace.
pub fn normalize(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };

    let mut out = String::with_capacity(value.len());
    for word in value.split(is_separator).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out.to_lowercase()
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}
