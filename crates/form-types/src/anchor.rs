//! Anchors describe where in a document a field's value lives.
//!
//! An anchor is only meaningful against the document layout it was derived
//! from. Replacing a template means re-extracting every anchor for it.

use serde::{Deserialize, Serialize};

/// Structural address of a field value, tagged by `"type"` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Anchor {
    /// A top-level body paragraph, by index or by contained text
    Paragraph(ParagraphAnchor),
    /// A single cell of a top-level table
    TableCell(TableCellAnchor),
    /// A repeatable table: one value row per physical row
    Table(TableAnchor),
    /// A native form-field checkbox located by nearby text
    LegacyCheckbox(LegacyCheckboxAnchor),
}

impl Anchor {
    /// Short name of the anchor kind, as it appears in JSON
    pub fn kind(&self) -> &'static str {
        match self {
            Anchor::Paragraph(_) => "paragraph",
            Anchor::TableCell(_) => "table_cell",
            Anchor::Table(_) => "table",
            Anchor::LegacyCheckbox(_) => "legacy_checkbox",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphAnchor {
    /// Index among top-level body paragraphs (empty paragraphs included)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_index: Option<usize>,
    /// Case-insensitive substring the target paragraph contains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_contains: Option<String>,
    /// Paragraphs to move from the located one; may be negative
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCellAnchor {
    #[serde(default)]
    pub table_index: usize,
    #[serde(default)]
    pub row_index: usize,
    #[serde(default = "default_value_column")]
    pub column_index: usize,
    /// Label found in the row when the anchor was extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_text: Option<String>,
    /// Append the value after the cell's existing label text
    #[serde(default, skip_serializing_if = "is_false")]
    pub append_to_label: bool,
    /// Regex applied to the cell text; the first match is substituted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_pattern: Option<String>,
    /// Replacement for `replace_pattern`; `{value}` expands to the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_with: Option<String>,
    /// Write into this paragraph of the cell only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_paragraph_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAnchor {
    #[serde(default)]
    pub table_index: usize,
    /// First physical row receiving data (row 0 is usually the header)
    #[serde(default = "default_start_row")]
    pub start_row: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_text: Option<String>,
    /// Grid column for the k-th datum. Needed whenever merged or blank
    /// header cells break the 1:1 column correspondence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_mapping: Option<Vec<usize>>,
}

impl TableAnchor {
    /// Grid column receiving the datum at `position`
    pub fn grid_column(&self, position: usize) -> Option<usize> {
        match &self.column_mapping {
            Some(mapping) => mapping.get(position).copied(),
            None => Some(position),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCheckboxAnchor {
    /// Text searched (case-insensitively) in paragraphs and table cells
    pub search_text: String,
    #[serde(default)]
    pub pairing: CheckboxPairing,
}

/// How form-field checkboxes near the search text encode a boolean
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckboxPairing {
    /// One box, checked when the value is true
    #[default]
    Single,
    /// A "No" box followed by a "Yes" box
    NoYes,
}

fn default_value_column() -> usize {
    1
}

fn default_start_row() -> usize {
    1
}

fn is_false(value: &bool) -> bool {
    !*value
}
