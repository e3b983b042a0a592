/// Escapes a user-provided value for Lucene-like query syntaxes.
///
/// All Lucene special characters are escaped so free-text drug names cannot
/// change query semantics.
pub(crate) fn escape_lucene_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | '+' | '-' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"' | '~' | '*'
            | '?' | ':' | '/' | '&' | '|' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Builds `(f1:"v" OR f2:"v" ...)`, an exact-phrase match of `value`
/// against any of `fields`.
pub(crate) fn any_field_phrase(fields: &[&str], value: &str) -> String {
    let escaped = escape_lucene_value(value);
    let clauses = fields
        .iter()
        .map(|field| format!("{field}:\"{escaped}\""))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("({clauses})")
}
