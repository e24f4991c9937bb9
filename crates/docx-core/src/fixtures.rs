//! Minimal in-memory documents for tests
//!
//! Enabled for this crate's own tests and, through the `test-fixtures`
//! feature, for dependents' tests.

use quick_xml::escape::escape;

use crate::error::DocxError;
use crate::package::DocxPackage;

pub const W_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Package a body fragment as a complete `.docx`
pub fn docx_from_body(body: &str) -> Result<Vec<u8>, DocxError> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NAMESPACE}"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    );
    let mut package = DocxPackage::new();
    package.set_part("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec());
    package.set_part("_rels/.rels", ROOT_RELS.as_bytes().to_vec());
    package.set_part("word/document.xml", document.into_bytes());
    package.to_bytes()
}

pub fn run(text: &str) -> String {
    format!(
        r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#,
        escape(text)
    )
}

pub fn paragraph(text: &str) -> String {
    paragraph_runs(&[text])
}

/// One run per piece
pub fn paragraph_runs(pieces: &[&str]) -> String {
    let runs: String = pieces.iter().map(|piece| run(piece)).collect();
    format!("<w:p>{runs}</w:p>")
}

pub fn table(rows: &[&[&str]]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells
                .iter()
                .map(|text| format!("<w:tc>{}</w:tc>", paragraph(text)))
                .collect();
            format!("<w:tr>{cells}</w:tr>")
        })
        .collect();
    format!("<w:tbl><w:tblPr/>{rows}</w:tbl>")
}

/// The three runs of a `FORMCHECKBOX` field
pub fn checkbox_field(checked: bool) -> String {
    let state = if checked { "<w:checked/>" } else { "" };
    format!(
        r#"<w:r><w:fldChar w:fldCharType="begin"><w:ffData><w:name w:val="Check"/><w:enabled/><w:calcOnExit w:val="0"/><w:checkBox><w:sizeAuto/><w:default w:val="0"/>{state}</w:checkBox></w:ffData></w:fldChar></w:r><w:r><w:instrText xml:space="preserve"> FORMCHECKBOX </w:instrText></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r>"#
    )
}

/// A label followed by checkbox fields, each with its own caption
pub fn checkbox_paragraph(label: &str, boxes: &[(bool, &str)]) -> String {
    let mut content = if label.is_empty() {
        String::new()
    } else {
        run(label)
    };
    for (checked, caption) in boxes {
        content.push_str(&checkbox_field(*checked));
        content.push_str(&run(&format!(" {caption} ")));
    }
    format!("<w:p>{content}</w:p>")
}
