//! Composite fills: several source fields written to one location

use std::collections::BTreeMap;

use docx_core::Document;
use form_types::{
    Anchor, CompositeFill, Composition, Field, FieldType, FillReport, MissReason, TemplateSchema,
};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

use super::format::{cell_value, is_truthy, plain_text};
use super::{legacy_checkbox, write_value};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([^{}]+)\}").unwrap();
}

static NULL: Value = Value::Null;

/// Write one composite. Composites whose sources are all absent are skipped.
pub(crate) fn apply(
    document: &mut Document,
    schema: &TemplateSchema,
    composite: &CompositeFill,
    flat: &BTreeMap<String, Value>,
    report: &mut FillReport,
) {
    if !composite.sources.iter().any(|s| flat.contains_key(s)) {
        return;
    }

    let primary = composite
        .primary_source()
        .and_then(|source| flat.get(source))
        .unwrap_or(&NULL);

    let result = match &composite.compose {
        Composition::Join {
            separator,
            template,
        } => {
            let text = match template {
                Some(template) => expand(template, schema, flat),
                None => composite
                    .sources
                    .iter()
                    .filter_map(|source| source_text(schema, flat, source))
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join(separator),
            };
            write_text(document, composite, &text)
        }
        Composition::Branch { when_yes, when_no } => {
            let template = if is_truthy(primary) { when_yes } else { when_no };
            let text = expand(template, schema, flat);
            write_text(document, composite, &text)
        }
        Composition::Checkbox => match &composite.target {
            Anchor::LegacyCheckbox(anchor) => legacy_checkbox::fill_checkbox(document, anchor, primary),
            other => {
                let field = target_field(composite, FieldType::Checkbox);
                write_value(document, other, &Value::Bool(is_truthy(primary)), &field)
            }
        },
    };

    match result {
        Ok(()) => report.record_filled(&composite.id),
        Err(reason) => {
            debug!("Composite {} not filled: {:?}", composite.id, reason);
            report.record_miss(&composite.id, reason);
        }
    }
}

fn write_text(
    document: &mut Document,
    composite: &CompositeFill,
    text: &str,
) -> Result<(), MissReason> {
    let field = target_field(composite, FieldType::Text);
    write_value(
        document,
        &composite.target,
        &Value::String(text.to_string()),
        &field,
    )
}

/// Stand-in field describing the composite's target
fn target_field(composite: &CompositeFill, field_type: FieldType) -> Field {
    Field::new(&composite.id, field_type, &composite.id, "", 0)
}

/// Formatted value of a source, resolving option labels through its field
fn source_text(schema: &TemplateSchema, flat: &BTreeMap<String, Value>, id: &str) -> Option<String> {
    let value = flat.get(id)?;
    Some(match schema.field(id) {
        Some(field) => cell_value(field, value),
        None => plain_text(value),
    })
}

/// Replace `{field_id}` placeholders; unknown ids expand to nothing
fn expand(template: &str, schema: &TemplateSchema, flat: &BTreeMap<String, Value>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            source_text(schema, flat, caps[1].trim()).unwrap_or_default()
        })
        .into_owned()
}
