//! Anchor-driven fill
//!
//! Values are written into a copy of the template at the locations their
//! fields' anchors describe. A value that cannot be placed never fails the
//! fill; it is recorded in the [`FillReport`] instead.

mod composite;
pub mod format;
mod legacy_checkbox;
mod paragraph;
mod repeatable;
mod table_cell;

use std::collections::HashSet;

use docx_core::Document;
use form_types::{
    flatten, Anchor, Field, FillReport, FormData, MissReason, TemplateSchema, RESERVED_PREFIX,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOptions {
    /// Data keys with this prefix are skipped; empty disables the check
    pub reserved_prefix: String,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            reserved_prefix: RESERVED_PREFIX.to_string(),
        }
    }
}

/// Filled package bytes and what happened to each value
#[derive(Debug, Clone)]
pub struct FilledDocument {
    pub bytes: Vec<u8>,
    pub report: FillReport,
}

pub fn fill(
    template: &[u8],
    schema: &TemplateSchema,
    data: &FormData,
) -> Result<FilledDocument, EngineError> {
    fill_with_options(template, schema, data, &FillOptions::default())
}

pub fn fill_with_options(
    template: &[u8],
    schema: &TemplateSchema,
    data: &FormData,
    options: &FillOptions,
) -> Result<FilledDocument, EngineError> {
    let mut document = Document::from_bytes(template).map_err(EngineError::corrupt)?;
    let report = fill_document(&mut document, schema, data, options);
    let bytes = document.to_bytes().map_err(EngineError::corrupt)?;

    info!(
        "Filled {} values ({} unresolved, {} ignored keys)",
        report.filled.len(),
        report.unresolved.len(),
        report.ignored_keys.len()
    );
    Ok(FilledDocument { bytes, report })
}

/// Fill an already parsed document in place.
///
/// Composites run first and consume their sources; the remaining keys are
/// then written in sorted order.
pub fn fill_document(
    document: &mut Document,
    schema: &TemplateSchema,
    data: &FormData,
    options: &FillOptions,
) -> FillReport {
    let flat = flatten(data);
    let mut report = FillReport::default();
    let mut handled: HashSet<&str> = HashSet::new();

    for composite in &schema.composites {
        composite::apply(document, schema, composite, &flat, &mut report);
        handled.extend(composite.sources.iter().map(String::as_str));
    }

    for (key, value) in &flat {
        if !options.reserved_prefix.is_empty() && key.starts_with(&options.reserved_prefix) {
            report.record_ignored(key);
            continue;
        }
        if handled.contains(key.as_str()) {
            continue;
        }
        let Some(field) = schema.field(key) else {
            debug!("No field for key {}", key);
            report.record_ignored(key);
            continue;
        };
        let Some(anchor) = &field.anchor else {
            debug!("Field {} has no anchor", key);
            report.record_miss(key, MissReason::NoAnchor);
            continue;
        };

        match write_value(document, anchor, value, field) {
            Ok(()) => report.record_filled(key),
            Err(reason) => {
                debug!("Field {} not filled ({} anchor): {:?}", key, anchor.kind(), reason);
                report.record_miss(key, reason);
            }
        }
    }

    report
}

pub(crate) fn write_value(
    document: &mut Document,
    anchor: &Anchor,
    value: &Value,
    field: &Field,
) -> Result<(), MissReason> {
    match anchor {
        Anchor::Paragraph(a) => paragraph::fill_paragraph(document, a, value, field),
        Anchor::TableCell(a) => table_cell::fill_table_cell(document, a, value, field),
        Anchor::Table(a) => repeatable::fill_table(document, a, value, field),
        Anchor::LegacyCheckbox(a) => legacy_checkbox::fill_checkbox(document, a, value),
    }
}
