//! WordprocessingML (.docx) reading and editing
//!
//! The package is kept as raw zip entries and the main document part as an
//! owned XML tree. Edits go through run-level helpers that preserve the
//! formatting of the text around them:
//! - [`paragraph`]: paragraph text, splicing and glyph replacement
//! - [`table`]: rows and cells addressed by grid column
//! - [`checkbox`]: legacy `FORMCHECKBOX` fields

pub mod checkbox;
pub mod document;
pub mod error;
pub mod names;
pub mod package;
pub mod paragraph;
pub mod table;
pub mod xml;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use document::{Block, Document};
pub use error::DocxError;
pub use package::DocxPackage;
pub use paragraph::Insert;
pub use xml::{Element, Node};
