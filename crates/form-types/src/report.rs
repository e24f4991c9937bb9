//! Outcome of a fill and the artifacts of a generation

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a field value could not be placed in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    NoAnchor,
    ParagraphNotFound,
    TableOutOfRange,
    RowOutOfRange,
    ColumnOutOfRange,
    CellParagraphOutOfRange,
    PatternNotMatched,
    InvalidPattern,
    NotAList,
    CheckboxNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedField {
    pub field_id: String,
    pub reason: MissReason,
}

/// Per-generation record of what was written and what was skipped.
///
/// Misses never fail a generation; they are collected here instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReport {
    /// Field and composite ids written to the document
    pub filled: Vec<String>,
    pub unresolved: Vec<UnresolvedField>,
    /// Data keys that are reserved or have no field in the schema
    pub ignored_keys: Vec<String>,
}

impl FillReport {
    pub fn record_filled(&mut self, id: impl Into<String>) {
        self.filled.push(id.into());
    }

    pub fn record_miss(&mut self, field_id: impl Into<String>, reason: MissReason) {
        self.unresolved.push(UnresolvedField {
            field_id: field_id.into(),
            reason,
        });
    }

    pub fn record_ignored(&mut self, key: impl Into<String>) {
        self.ignored_keys.push(key.into());
    }

    /// True when every recognised field found its location
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn miss_for(&self, field_id: &str) -> Option<MissReason> {
        self.unresolved
            .iter()
            .find(|u| u.field_id == field_id)
            .map(|u| u.reason)
    }
}

/// Paths of one generation's outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub docx_path: PathBuf,
    pub pdf_path: PathBuf,
    #[serde(default)]
    pub report: FillReport,
}
