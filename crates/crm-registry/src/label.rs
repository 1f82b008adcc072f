//! Association label normalization.

/// Lowercase a free-form label into an identifier: characters other than ASCII word characters
/// and whitespace are removed, spaces become `_`. An empty label maps to `_`.
pub fn sanitize_label(input: &str) -> String {
    if input.is_empty() {
        return "_".to_string();
    }
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_ascii_whitespace())
        .map(|c| if c == ' ' { '_' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Registry name of an association type: `<from>_to_<to>` for unlabeled types,
/// `<from>_to_<to>_<sanitized label>` otherwise.
pub fn association_name(from: &str, to: &str, label: Option<&str>) -> String {
    match label.filter(|l| !l.is_empty()) {
        None => format!("{}_to_{}", from, to),
        Some(l) => format!("{}_to_{}_{}", from, to, sanitize_label(l)),
    }
}
