//! Parsed word-processing document
//!
//! Only the main document part is parsed; every other package part is
//! carried through byte for byte when the document is written back.

use std::path::Path;

use tracing::debug;

use crate::error::DocxError;
use crate::names::{BODY, PARAGRAPH, TABLE, TABLE_CELL, TABLE_ROW};
use crate::package::DocxPackage;
use crate::xml::{self, Element};

/// A top-level body element in reading order
#[derive(Debug, Clone, Copy)]
pub enum Block<'a> {
    Paragraph(&'a Element),
    Table(&'a Element),
}

#[derive(Debug, Clone)]
pub struct Document {
    package: DocxPackage,
    part_name: String,
    root: Element,
}

impl Document {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let package = DocxPackage::from_bytes(bytes)?;
        let part_name = package.main_document_path();
        let part = package
            .part(&part_name)
            .ok_or_else(|| DocxError::MissingPart(part_name.clone()))?;
        let text = std::str::from_utf8(part).map_err(|e| DocxError::XmlError(e.to_string()))?;
        let root = xml::parse(text)?;
        if root.child(BODY).is_none() {
            return Err(DocxError::MissingBody);
        }

        debug!(
            "Loaded {} ({} parts)",
            part_name,
            package.part_names().count()
        );
        Ok(Self {
            package,
            part_name,
            root,
        })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocxError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize back into a package; untouched parts keep their bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut package = self.package.clone();
        package.set_part(&self.part_name, xml::to_xml_string(&self.root).into_bytes());
        package.to_bytes()
    }

    fn body(&self) -> Option<&Element> {
        self.root.child(BODY)
    }

    fn body_mut(&mut self) -> Option<&mut Element> {
        self.root.child_mut(BODY)
    }

    pub fn blocks(&self) -> Vec<Block<'_>> {
        self.body()
            .map(|body| {
                body.elements()
                    .filter_map(|el| match el.name.as_str() {
                        PARAGRAPH => Some(Block::Paragraph(el)),
                        TABLE => Some(Block::Table(el)),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Top-level body paragraphs
    pub fn paragraphs(&self) -> Vec<&Element> {
        self.body()
            .map(|body| body.children_named(PARAGRAPH).collect())
            .unwrap_or_default()
    }

    /// Top-level body tables
    pub fn tables(&self) -> Vec<&Element> {
        self.body()
            .map(|body| body.children_named(TABLE).collect())
            .unwrap_or_default()
    }

    pub fn paragraph(&self, index: usize) -> Option<&Element> {
        self.body()?.children_named(PARAGRAPH).nth(index)
    }

    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.body_mut()?
            .elements_mut()
            .filter(|el| el.is(PARAGRAPH))
            .nth(index)
    }

    pub fn table(&self, index: usize) -> Option<&Element> {
        self.body()?.children_named(TABLE).nth(index)
    }

    pub fn table_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.body_mut()?
            .elements_mut()
            .filter(|el| el.is(TABLE))
            .nth(index)
    }

    /// Every paragraph in reading order, including those inside table cells
    pub fn all_paragraphs(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        if let Some(body) = self.body() {
            collect_paragraphs(body, &mut out);
        }
        out
    }

    pub fn all_paragraphs_mut(&mut self) -> Vec<&mut Element> {
        let mut out = Vec::new();
        if let Some(body) = self.body_mut() {
            collect_paragraphs_mut(body, &mut out);
        }
        out
    }
}

fn collect_paragraphs<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
    for child in el.elements() {
        match child.name.as_str() {
            PARAGRAPH => out.push(child),
            TABLE | TABLE_ROW | TABLE_CELL => collect_paragraphs(child, out),
            _ => {}
        }
    }
}

fn collect_paragraphs_mut<'a>(el: &'a mut Element, out: &mut Vec<&'a mut Element>) {
    for child in el.elements_mut() {
        if child.is(PARAGRAPH) {
            out.push(child);
        } else if child.is(TABLE) || child.is(TABLE_ROW) || child.is(TABLE_CELL) {
            collect_paragraphs_mut(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{docx_from_body, paragraph, table};
    use crate::paragraph::{paragraph_text, set_paragraph_text};
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<u8> {
        let body = format!(
            "{}{}{}",
            paragraph("I. Personnel"),
            table(&[&["Name", "Role"], &["", ""]]),
            paragraph("Signature: ____")
        );
        docx_from_body(&body).unwrap()
    }

    #[test]
    fn test_blocks_in_body_order() {
        let doc = Document::from_bytes(&sample()).unwrap();
        let kinds: Vec<&str> = doc
            .blocks()
            .iter()
            .map(|block| match block {
                Block::Paragraph(_) => "p",
                Block::Table(_) => "tbl",
            })
            .collect();
        assert_eq!(kinds, vec!["p", "tbl", "p"]);
        assert_eq!(doc.paragraphs().len(), 2);
        assert_eq!(doc.tables().len(), 1);
        assert_eq!(doc.all_paragraphs().len(), 6);
    }

    #[test]
    fn test_edit_and_reload() {
        let mut doc = Document::from_bytes(&sample()).unwrap();
        set_paragraph_text(doc.paragraph_mut(1).unwrap(), "Signature: Ada");
        let bytes = doc.to_bytes().unwrap();

        let reloaded = Document::from_bytes(&bytes).unwrap();
        assert_eq!(paragraph_text(reloaded.paragraph(1).unwrap()), "Signature: Ada");
        assert_eq!(paragraph_text(reloaded.paragraph(0).unwrap()), "I. Personnel");
    }

    #[test]
    fn test_untouched_parts_survive() {
        let original = DocxPackage::from_bytes(&sample()).unwrap();
        let doc = Document::from_bytes(&sample()).unwrap();
        let written = DocxPackage::from_bytes(&doc.to_bytes().unwrap()).unwrap();
        assert_eq!(
            original.part("[Content_Types].xml"),
            written.part("[Content_Types].xml")
        );
    }

    #[test]
    fn test_missing_document_part() {
        let mut package = DocxPackage::new();
        package.set_part("[Content_Types].xml", b"<Types/>".to_vec());
        let bytes = package.to_bytes().unwrap();
        assert!(matches!(
            Document::from_bytes(&bytes),
            Err(DocxError::MissingPart(name)) if name == "word/document.xml"
        ));
    }

    #[test]
    fn test_document_without_body() {
        let mut package = DocxPackage::new();
        package.set_part("word/document.xml", b"<w:document/>".to_vec());
        let bytes = package.to_bytes().unwrap();
        assert!(matches!(
            Document::from_bytes(&bytes),
            Err(DocxError::MissingBody)
        ));
    }
}
