//! Table-cell anchors

use docx_core::names::PARAGRAPH;
use docx_core::paragraph::{paragraph_text, set_paragraph_text, splice, text_len};
use docx_core::{table, Document, Element, Insert};
use form_types::{Field, MissReason, TableCellAnchor};
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use super::format;

const VALUE_PLACEHOLDER: &str = "{value}";

pub(crate) fn fill_table_cell(
    document: &mut Document,
    anchor: &TableCellAnchor,
    value: &Value,
    field: &Field,
) -> Result<(), MissReason> {
    let tbl = document
        .table_mut(anchor.table_index)
        .ok_or(MissReason::TableOutOfRange)?;
    if anchor.row_index >= table::row_count(tbl) {
        return Err(MissReason::RowOutOfRange);
    }
    let tc = table::cell_mut(tbl, anchor.row_index, anchor.column_index)
        .ok_or(MissReason::ColumnOutOfRange)?;

    write_cell(tc, anchor, &format::cell_value(field, value))
}

/// Strategies, first applicable wins: one paragraph of the cell, a regex
/// substitution, appending after the label, whole-cell replacement
pub(crate) fn write_cell(
    tc: &mut Element,
    anchor: &TableCellAnchor,
    text: &str,
) -> Result<(), MissReason> {
    if let Some(index) = anchor.cell_paragraph_index {
        let p = table::paragraph_mut(tc, index).ok_or(MissReason::CellParagraphOutOfRange)?;
        set_paragraph_text(p, text);
        return Ok(());
    }

    if let Some(pattern) = anchor.replace_pattern.as_deref() {
        let regex = Regex::new(pattern).map_err(|e| {
            warn!("Invalid replace pattern {:?}: {}", pattern, e);
            MissReason::InvalidPattern
        })?;
        let replacement = anchor
            .replace_with
            .as_deref()
            .unwrap_or(VALUE_PLACEHOLDER)
            .replace(VALUE_PLACEHOLDER, text);
        return replace_first(tc, &regex, &replacement);
    }

    if anchor.append_to_label {
        append_to_label(tc, text);
        return Ok(());
    }

    table::set_cell_text(tc, text);
    Ok(())
}

/// Matches are looked for paragraph by paragraph
fn replace_first(tc: &mut Element, regex: &Regex, replacement: &str) -> Result<(), MissReason> {
    for p in tc.elements_mut().filter(|el| el.is(PARAGRAPH)) {
        let text = paragraph_text(p);
        if let Some(m) = regex.find(&text) {
            let start = text[..m.start()].chars().count();
            let end = start + m.as_str().chars().count();
            splice(p, start, end, &[Insert::plain(replacement)]);
            return Ok(());
        }
    }
    Err(MissReason::PatternNotMatched)
}

/// Append to the last paragraph holding text, separated by a space
fn append_to_label(tc: &mut Element, text: &str) {
    let target = table::paragraphs(tc)
        .enumerate()
        .filter(|(_, p)| !paragraph_text(p).trim().is_empty())
        .map(|(i, _)| i)
        .last();
    let Some(p) = table::paragraph_mut(tc, target.unwrap_or(0)) else {
        table::set_cell_text(tc, text);
        return;
    };

    let existing = paragraph_text(p);
    let len = text_len(p);
    let separator = if existing.is_empty() || existing.ends_with(char::is_whitespace) {
        ""
    } else {
        " "
    };
    splice(p, len, len, &[Insert::plain(separator), Insert::value(text)]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_core::xml::parse;
    use pretty_assertions::assert_eq;

    fn cell(paragraphs: &[&str]) -> Element {
        let body: String = paragraphs
            .iter()
            .map(|t| format!(r#"<w:p><w:r><w:t xml:space="preserve">{t}</w:t></w:r></w:p>"#))
            .collect();
        parse(&format!("<w:tc><w:tcPr/>{body}</w:tc>")).unwrap()
    }

    fn anchor() -> TableCellAnchor {
        TableCellAnchor {
            column_index: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_replaces_cell_text() {
        let mut tc = cell(&["old", "second"]);
        write_cell(&mut tc, &anchor(), "new").unwrap();
        assert_eq!(table::cell_text(&tc), "new");
    }

    #[test]
    fn test_cell_paragraph_index() {
        let mut tc = cell(&["Label", "____"]);
        let a = TableCellAnchor {
            cell_paragraph_index: Some(1),
            ..anchor()
        };
        write_cell(&mut tc, &a, "value").unwrap();
        assert_eq!(table::cell_text(&tc), "Label\nvalue");

        let out_of_range = TableCellAnchor {
            cell_paragraph_index: Some(5),
            ..anchor()
        };
        assert_eq!(
            write_cell(&mut tc, &out_of_range, "x"),
            Err(MissReason::CellParagraphOutOfRange)
        );
    }

    #[test]
    fn test_replace_pattern() {
        let mut tc = cell(&["Dose: [amount] mg"]);
        let a = TableCellAnchor {
            replace_pattern: Some(r"\[amount\]".to_string()),
            replace_with: Some("{value}".to_string()),
            ..anchor()
        };
        write_cell(&mut tc, &a, "20").unwrap();
        assert_eq!(table::cell_text(&tc), "Dose: 20 mg");

        assert_eq!(write_cell(&mut tc, &a, "30"), Err(MissReason::PatternNotMatched));

        let invalid = TableCellAnchor {
            replace_pattern: Some("(".to_string()),
            ..anchor()
        };
        assert_eq!(write_cell(&mut tc, &invalid, "x"), Err(MissReason::InvalidPattern));
    }

    #[test]
    fn test_append_to_label() {
        let mut tc = cell(&["Department:", ""]);
        let a = TableCellAnchor {
            append_to_label: true,
            ..anchor()
        };
        write_cell(&mut tc, &a, "Neurology").unwrap();
        assert_eq!(table::cell_text(&tc), "Department: Neurology\n");
    }
}
