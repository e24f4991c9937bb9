//! Paragraph anchors: placeholder insertion and glyph checkboxes

use docx_core::paragraph::{glyph_count, paragraph_text, replace_nth_glyph, splice};
use docx_core::{Document, Element, Insert};
use form_types::{Field, FieldType, MissReason, ParagraphAnchor};
use serde_json::Value;

use super::format;
use crate::extract::{CHECKBOX_GLYPHS, CHECKED_GLYPH, UNCHECKED_GLYPH, UNDERSCORE_RUN};

pub(crate) fn fill_paragraph(
    document: &mut Document,
    anchor: &ParagraphAnchor,
    value: &Value,
    field: &Field,
) -> Result<(), MissReason> {
    let index = locate(document, anchor).ok_or(MissReason::ParagraphNotFound)?;
    let p = document
        .paragraph_mut(index)
        .ok_or(MissReason::ParagraphNotFound)?;

    if field.field_type == FieldType::Checkbox && glyph_count(p, &CHECKBOX_GLYPHS) > 0 {
        set_glyphs(p, field, value);
        return Ok(());
    }

    let text = format::paragraph_value(field, value);
    if !text.is_empty() {
        insert_value(p, &text);
    }
    Ok(())
}

/// The indexed paragraph when it still holds the expected text, else the
/// first paragraph containing it; then shifted by `offset`
fn locate(document: &Document, anchor: &ParagraphAnchor) -> Option<usize> {
    let paragraphs = document.paragraphs();
    let needle = anchor
        .paragraph_contains
        .as_deref()
        .map(str::to_lowercase)
        .filter(|n| !n.is_empty());
    let contains = |p: &Element, needle: &str| paragraph_text(p).to_lowercase().contains(needle);

    let by_index = anchor.paragraph_index.filter(|&i| {
        paragraphs
            .get(i)
            .is_some_and(|p| needle.as_deref().map_or(true, |n| contains(*p, n)))
    });
    let found = match by_index {
        Some(index) => index,
        None => {
            let needle = needle.as_deref()?;
            paragraphs.iter().position(|p| contains(*p, needle))?
        }
    };

    let shifted = found as i64 + anchor.offset;
    usize::try_from(shifted)
        .ok()
        .filter(|&i| i < paragraphs.len())
}

/// Replace the first underscore run; else follow a trailing `:` or `?`;
/// else append after two spaces. The value gets its own underlined run.
pub(crate) fn insert_value(p: &mut Element, value: &str) {
    let text = paragraph_text(p);
    let len = text.chars().count();

    if let Some(m) = UNDERSCORE_RUN.find(&text) {
        let start = text[..m.start()].chars().count();
        let end = start + m.as_str().chars().count();
        splice(p, start, end, &[Insert::value(value)]);
        return;
    }

    let trimmed = text.trim_end();
    if trimmed.ends_with(':') || trimmed.ends_with('?') {
        let mark = trimmed.chars().count();
        splice(p, mark, len, &[Insert::plain(" "), Insert::value(value)]);
    } else {
        splice(p, len, len, &[Insert::plain("  "), Insert::value(value)]);
    }
}

/// Glyph `n` (1-based) is checked when option `option_<n>` is selected
fn set_glyphs(p: &mut Element, field: &Field, value: &Value) {
    let count = glyph_count(p, &CHECKBOX_GLYPHS);
    for nth in 0..count {
        let glyph = if option_selected(field, nth + 1, value) {
            CHECKED_GLYPH
        } else {
            UNCHECKED_GLYPH
        };
        replace_nth_glyph(p, &CHECKBOX_GLYPHS, nth, glyph);
    }
}

fn option_selected(field: &Field, n: usize, value: &Value) -> bool {
    match value {
        Value::Bool(checked) => n == 1 && *checked,
        Value::Array(items) => items.iter().any(|item| matches_option(field, n, item)),
        other => matches_option(field, n, other),
    }
}

fn matches_option(field: &Field, n: usize, value: &Value) -> bool {
    let Some(selected) = value.as_str().map(str::trim) else {
        return false;
    };
    let option_value = format!("option_{}", n);
    selected == option_value
        || field
            .options()
            .iter()
            .find(|o| o.value == option_value)
            .is_some_and(|o| o.label.eq_ignore_ascii_case(selected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_core::xml::parse;
    use pretty_assertions::assert_eq;

    fn para(text: &str) -> Element {
        parse(&format!(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#
        ))
        .unwrap()
    }

    #[test]
    fn test_insert_replaces_underscores() {
        let mut p = para("Name: ____ Date: ____");
        insert_value(&mut p, "Ada Lovelace");
        assert_eq!(paragraph_text(&p), "Name: Ada Lovelace Date: ____");
    }

    #[test]
    fn test_insert_after_trailing_colon() {
        let mut p = para("Sponsor:   ");
        insert_value(&mut p, "NIH");
        assert_eq!(paragraph_text(&p), "Sponsor: NIH");
    }

    #[test]
    fn test_insert_after_question_mark() {
        let mut p = para("Is this a pilot study?");
        insert_value(&mut p, "Yes");
        assert_eq!(paragraph_text(&p), "Is this a pilot study? Yes");
    }

    #[test]
    fn test_insert_appends_with_two_spaces() {
        let mut p = para("Study title");
        insert_value(&mut p, "Sleep and memory");
        assert_eq!(paragraph_text(&p), "Study title  Sleep and memory");
    }

    #[test]
    fn test_glyph_options_selected_by_value_or_label() {
        let field = Field::new("sec_I.f", FieldType::Checkbox, "F", "sec_I", 0).with_options(vec![
            form_types::FieldOption {
                value: "option_1".to_string(),
                label: "Federal".to_string(),
            },
            form_types::FieldOption {
                value: "option_2".to_string(),
                label: "Industry".to_string(),
            },
        ]);

        let mut p = para("☐ Federal ☑ Industry");
        set_glyphs(&mut p, &field, &serde_json::json!(["federal"]));
        assert_eq!(paragraph_text(&p), "☑ Federal ☐ Industry");

        set_glyphs(&mut p, &field, &serde_json::json!("option_2"));
        assert_eq!(paragraph_text(&p), "☐ Federal ☑ Industry");

        set_glyphs(&mut p, &field, &serde_json::json!(true));
        assert_eq!(paragraph_text(&p), "☑ Federal ☐ Industry");
    }
}
