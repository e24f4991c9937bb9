//! OOXML zip container
//!
//! Every entry is kept in its original order; only parts explicitly replaced
//! through [`DocxPackage::set_part`] differ when the package is written back.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::DocxError;
use crate::xml;

const ROOT_RELS: &str = "_rels/.rels";
const DEFAULT_MAIN_PART: &str = "word/document.xml";
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
    stored: bool,
    is_dir: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
}

impl DocxPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every entry of a zip container into memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).map_err(|e| DocxError::ZipError(e.to_string()))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| DocxError::ZipError(e.to_string()))?;
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push(PackageEntry {
                name: file.name().to_string(),
                data,
                stored: file.compression() == CompressionMethod::Stored,
                is_dir: file.is_dir(),
            });
        }

        Ok(Self { entries })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| !e.is_dir && e.name == name)
            .map(|e| e.data.as_slice())
    }

    /// Replace a part's content, or append it as a new deflated entry
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(PackageEntry {
                name: name.to_string(),
                data,
                stored: false,
                is_dir: false,
            }),
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| !e.is_dir)
            .map(|e| e.name.as_str())
    }

    /// Path of the main document part, resolved through the package
    /// relationships and falling back to `word/document.xml`
    pub fn main_document_path(&self) -> String {
        self.part(ROOT_RELS)
            .and_then(|rels| std::str::from_utf8(rels).ok())
            .and_then(|rels| xml::parse(rels).ok())
            .and_then(|root| {
                root.children_named("Relationship")
                    .find(|rel| {
                        rel.attr("Type")
                            .is_some_and(|t| t.ends_with(OFFICE_DOCUMENT_REL))
                    })
                    .and_then(|rel| rel.attr("Target"))
                    .map(|target| target.trim_start_matches('/').to_string())
            })
            .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            let method = if entry.stored {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            let options = SimpleFileOptions::default().compression_method(method);
            if entry.is_dir {
                writer
                    .add_directory(entry.name.as_str(), options)
                    .map_err(|e| DocxError::ZipError(e.to_string()))?;
            } else {
                writer
                    .start_file(entry.name.as_str(), options)
                    .map_err(|e| DocxError::ZipError(e.to_string()))?;
                writer.write_all(&entry.data)?;
            }
        }

        let cursor = writer
            .finish()
            .map_err(|e| DocxError::ZipError(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_keeps_entry_order() {
        let mut package = DocxPackage::new();
        package.set_part("[Content_Types].xml", b"<Types/>".to_vec());
        package.set_part("word/document.xml", b"<w:document/>".to_vec());
        package.set_part("word/styles.xml", b"<w:styles/>".to_vec());

        let bytes = package.to_bytes().unwrap();
        let reread = DocxPackage::from_bytes(&bytes).unwrap();

        let names: Vec<&str> = reread.part_names().collect();
        assert_eq!(
            names,
            vec!["[Content_Types].xml", "word/document.xml", "word/styles.xml"]
        );
        assert_eq!(reread.part("word/styles.xml"), Some(&b"<w:styles/>"[..]));
    }

    #[test]
    fn test_set_part_replaces_existing() {
        let mut package = DocxPackage::new();
        package.set_part("word/document.xml", b"old".to_vec());
        package.set_part("word/document.xml", b"new".to_vec());
        assert_eq!(package.part_names().count(), 1);
        assert_eq!(package.part("word/document.xml"), Some(&b"new"[..]));
    }

    #[test]
    fn test_main_document_from_relationships() {
        let mut package = DocxPackage::new();
        package.set_part(
            ROOT_RELS,
            br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/word/document2.xml"/></Relationships>"#.to_vec(),
        );
        assert_eq!(package.main_document_path(), "word/document2.xml");
        assert_eq!(DocxPackage::new().main_document_path(), DEFAULT_MAIN_PART);
    }

    #[test]
    fn test_garbage_is_not_a_package() {
        assert!(matches!(
            DocxPackage::from_bytes(b"definitely not a zip"),
            Err(DocxError::ZipError(_))
        ));
    }
}
