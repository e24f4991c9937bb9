//! Stable field identifiers derived from labels

const MAX_SLUG_LEN: usize = 50;

/// Lower-case the label, drop everything but ASCII letters, digits and
/// whitespace, join words with `_` and cap the length.
pub fn normalize_label(label: &str) -> String {
    let kept: String = label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(MAX_SLUG_LEN)
        .collect()
}

/// `sec_I` + `Principal Investigator` gives `sec_I.principal_investigator`
pub fn generate_field_id(label: &str, section_id: &str) -> String {
    format!("{}.{}", section_id, normalize_label(label))
}
