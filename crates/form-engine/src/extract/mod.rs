//! Schema extraction
//!
//! Walks the top-level body of a template in reading order and derives
//! sections, typed fields with anchors, and default conditional rules:
//!
//! 1. A paragraph like `II. Funding` opens section `sec_II`; nothing else is
//!    read from it.
//! 2. Inside a section, `Label: ____` or `Label:` yields a text field.
//! 3. Inside a section, a paragraph with checkbox glyphs yields a checkbox
//!    field whose options are the segments after each glyph.
//! 4. Inside a section, native form-field checkboxes yield a checkbox (one
//!    box) or a No/Yes radio (two or more).
//! 5. Tables are classified afterwards, in the section open where they sit.

mod ids;
mod patterns;
mod rules;
mod tables;

use std::collections::HashSet;
use std::path::Path;

use docx_core::paragraph::paragraph_text;
use docx_core::{checkbox, Block, Document, Element};
use form_types::{
    Anchor, CheckboxPairing, Field, FieldOption, FieldType, LegacyCheckboxAnchor,
    ParagraphAnchor, Section, TemplateSchema, GENERAL_SECTION_ID,
};
use tracing::{debug, info};

use crate::errors::EngineError;

pub use ids::{generate_field_id, normalize_label};
pub use patterns::{has_glyph, CHECKBOX_GLYPHS, CHECKED_GLYPH, UNCHECKED_GLYPH};

pub(crate) use patterns::UNDERSCORE_RUN;

use patterns::{FIELD_LABEL, SECTION_HEADER};

/// Longest text kept for content-based paragraph lookups
const CONTAINS_LEN: usize = 50;

pub fn extract_from_bytes(bytes: &[u8]) -> Result<TemplateSchema, EngineError> {
    let document = Document::from_bytes(bytes).map_err(EngineError::parse)?;
    Ok(extract(&document))
}

pub fn extract_from_path(path: impl AsRef<Path>) -> Result<TemplateSchema, EngineError> {
    let document = Document::open(path).map_err(EngineError::parse)?;
    Ok(extract(&document))
}

/// Derive the schema of a parsed template. Content that matches no
/// pattern is skipped.
pub fn extract(document: &Document) -> TemplateSchema {
    let mut sections: Vec<Section> = Vec::new();
    let mut fields: Vec<Field> = Vec::new();
    let mut current: Option<String> = None;
    let mut pending_tables: Vec<(usize, &Element, Option<String>)> = Vec::new();

    let mut paragraph_index = 0;
    let mut table_index = 0;

    for block in document.blocks() {
        match block {
            Block::Paragraph(p) => {
                let index = paragraph_index;
                paragraph_index += 1;

                let text = paragraph_text(p);
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }

                if let Some(caps) = SECTION_HEADER.captures(text) {
                    let id = format!("sec_{}", caps[1].to_uppercase());
                    debug!("Section {} at paragraph {}", id, index);
                    sections.push(Section::new(id.clone(), text, sections.len()));
                    current = Some(id);
                    continue;
                }

                let Some(section_id) = current.as_deref() else {
                    continue;
                };
                paragraph_fields(p, index, text, section_id, &mut fields);
            }
            Block::Table(tbl) => {
                pending_tables.push((table_index, tbl, current.clone()));
                table_index += 1;
            }
        }
    }

    let mut uses_general = false;
    for (index, tbl, section) in pending_tables {
        let section_id = section.as_deref().unwrap_or(GENERAL_SECTION_ID);
        let found = tables::table_fields(tbl, index, section_id, fields.len());
        uses_general |= section.is_none() && !found.is_empty();
        fields.extend(found);
    }
    if uses_general {
        sections.push(Section::general(sections.len()));
    }

    log_collisions(&fields);
    let rules = rules::default_rules(&fields);

    info!(
        "Extracted {} sections, {} fields, {} rules",
        sections.len(),
        fields.len(),
        rules.len()
    );

    TemplateSchema {
        sections,
        fields,
        rules,
        composites: Vec::new(),
    }
}

/// Label and glyph checks are independent; one paragraph can yield both.
/// A paragraph holding form-field checkboxes yields only the checkbox field,
/// since its label would otherwise produce a text field with the same id.
fn paragraph_fields(
    p: &Element,
    index: usize,
    text: &str,
    section_id: &str,
    fields: &mut Vec<Field>,
) {
    let form_boxes = checkbox::checkbox_count(p);
    let label = if form_boxes > 0 {
        None
    } else {
        FIELD_LABEL.captures(text)
    };
    if let Some(caps) = label {
        let label = caps[1].trim();
        let field = Field::new(
            generate_field_id(label, section_id),
            FieldType::Text,
            label,
            section_id,
            fields.len(),
        )
        .with_anchor(paragraph_anchor(index, label));
        fields.push(field);
    }

    if has_glyph(text) {
        let options = glyph_options(text);
        if !options.is_empty() {
            let label = text
                .split(|c| CHECKBOX_GLYPHS.contains(&c))
                .next()
                .map(option_group_label)
                .unwrap_or_else(|| "Options".to_string());
            let contains: String = text.chars().take(CONTAINS_LEN).collect();
            let field = Field::new(
                generate_field_id(&label, section_id),
                FieldType::Checkbox,
                label,
                section_id,
                fields.len(),
            )
            .with_options(options)
            .with_anchor(paragraph_anchor(index, &contains));
            fields.push(field);
        }
    } else if form_boxes > 0 {
        fields.push(form_checkbox_field(p, text, section_id, fields.len()));
    }
}

fn paragraph_anchor(index: usize, contains: &str) -> Anchor {
    Anchor::Paragraph(ParagraphAnchor {
        paragraph_index: Some(index),
        paragraph_contains: Some(contains.to_string()),
        offset: 0,
    })
}

/// Each non-empty segment after glyph `n` (1-based) is option `option_<n>`
fn glyph_options(text: &str) -> Vec<FieldOption> {
    text.split(|c| CHECKBOX_GLYPHS.contains(&c))
        .enumerate()
        .skip(1)
        .filter_map(|(n, segment)| {
            let label = segment.split_whitespace().collect::<Vec<_>>().join(" ");
            (!label.is_empty()).then(|| FieldOption {
                value: format!("option_{}", n),
                label,
            })
        })
        .collect()
}

fn option_group_label(prefix: &str) -> String {
    let label = prefix.trim().trim_end_matches(':').trim_end();
    if label.is_empty() {
        "Options".to_string()
    } else {
        label.to_string()
    }
}

fn form_checkbox_field(p: &Element, text: &str, section_id: &str, order: usize) -> Field {
    let before = checkbox::text_before_first_checkbox(p);
    let before = before.trim();
    let label = option_group_label(before);
    let search_source = if before.is_empty() { text } else { before };
    let search_text: String = search_source.chars().take(CONTAINS_LEN).collect();

    let (field_type, pairing) = if checkbox::checkbox_count(p) == 1 {
        (FieldType::Checkbox, CheckboxPairing::Single)
    } else {
        (FieldType::Radio, CheckboxPairing::NoYes)
    };

    let mut field = Field::new(
        generate_field_id(&label, section_id),
        field_type,
        label,
        section_id,
        order,
    )
    .with_anchor(Anchor::LegacyCheckbox(LegacyCheckboxAnchor {
        search_text,
        pairing,
    }));
    if pairing == CheckboxPairing::NoYes {
        field = field.with_options(vec![
            FieldOption {
                value: "no".to_string(),
                label: "No".to_string(),
            },
            FieldOption {
                value: "yes".to_string(),
                label: "Yes".to_string(),
            },
        ]);
    }
    field
}

/// Duplicate ids are kept; later ones are unreachable by key
fn log_collisions(fields: &[Field]) {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.id.as_str()) {
            debug!("Field id collision: {} (label {:?})", field.id, field.label);
        }
    }
}
