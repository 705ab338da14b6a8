use unicode_normalization::UnicodeNormalization;

/// Tokens that mean "no data" despite being non-empty text. Compared
/// case-insensitively. This is a business rule inherited from upstream
/// extractions, not a typing artifact.
pub const SENTINEL_TOKENS: &[&str] = &["undefined", "null", "none", "nan"];

/// True if `value` (already trimmed) is a sentinel token, case-insensitively.
pub fn is_sentinel(value: &str) -> bool {
    SENTINEL_TOKENS
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}

/// Clean a raw field value for output and keying.
///
/// - `None` / whitespace-only input → `None` (absent)
/// - consecutive whitespace collapsed to single spaces, ends trimmed
/// - sentinel tokens → `None`
///
/// Case and diacritics are preserved: this is the form that appears in
/// output payloads.
pub fn clean(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let collapsed = collapse_whitespace(raw);
    if collapsed.is_empty() || is_sentinel(&collapsed) {
        return None;
    }
    Some(collapsed)
}

/// Fold a raw field value for equality testing only: `clean`, then NFD
/// decomposition with combining marks stripped, then uppercase.
/// Never used for output.
pub fn fold_for_compare(raw: Option<&str>) -> Option<String> {
    let cleaned = clean(raw)?;
    let folded: String = cleaned
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect();
    Some(folded.to_uppercase())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
