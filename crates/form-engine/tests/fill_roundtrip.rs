//! Extract a schema from a template, fill it and read the result back

use docx_core::checkbox::checkbox_states;
use docx_core::fixtures::{checkbox_paragraph, docx_from_body, paragraph, table};
use docx_core::paragraph::paragraph_text;
use docx_core::{table as tbl, Document, DocxPackage, Element};
use form_engine::{extract_from_bytes, fill, fill_with_options, FillOptions};
use form_types::{
    Anchor, CompositeFill, Composition, FormData, MissReason, ParagraphAnchor, TemplateSchema,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn form_data(value: Value) -> FormData {
    match value {
        Value::Object(map) => map,
        _ => panic!("form data must be an object"),
    }
}

fn template() -> Vec<u8> {
    let body = [
        paragraph("I. Personnel"),
        paragraph("Name: ____"),
        paragraph("Department:"),
        table(&[&["Name", "Role"], &["", ""]]),
        paragraph("II. Study"),
        table(&[&["Protocol:", ""], &["Sponsor", ""]]),
        paragraph("Phase: ☐ Phase I ☐ Phase II ☐ Phase III"),
        checkbox_paragraph("Involves minors?", &[(false, "No"), (false, "Yes")]),
    ]
    .concat();
    docx_from_body(&body).unwrap()
}

fn texts(bytes: &[u8]) -> Vec<String> {
    let doc = Document::from_bytes(bytes).unwrap();
    doc.paragraphs().into_iter().map(paragraph_text).collect()
}

#[test]
fn test_extracted_schema() {
    let schema = extract_from_bytes(&template()).unwrap();
    let ids: Vec<&str> = schema.fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "sec_I.name",
            "sec_I.department",
            "sec_II.phase",
            "sec_II.involves_minors",
            "sec_I.table_0",
            "sec_II.protocol",
            "sec_II.sponsor",
        ]
    );
    let sections: Vec<&str> = schema.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(sections, vec!["sec_I", "sec_II"]);
}

#[test]
fn test_schema_survives_json() {
    let schema = extract_from_bytes(&template()).unwrap();
    let json = serde_json::to_string(&schema).unwrap();
    let back: TemplateSchema = serde_json::from_str(&json).unwrap();
    assert_eq!(back, schema);
}

#[test]
fn test_fill_paragraph_fields() {
    let template = template();
    let schema = extract_from_bytes(&template).unwrap();
    let data = form_data(json!({
        "sec_I": {"name": "Ada Lovelace", "department": "Mathematics"}
    }));

    let filled = fill(&template, &schema, &data).unwrap();
    let texts = texts(&filled.bytes);
    assert_eq!(texts[1], "Name: Ada Lovelace");
    assert_eq!(texts[2], "Department: Mathematics");
    assert_eq!(filled.report.filled, vec!["sec_I.department", "sec_I.name"]);
    assert!(filled.report.is_complete());
}

#[test]
fn test_fill_tables() {
    let template = template();
    let schema = extract_from_bytes(&template).unwrap();
    let data = form_data(json!({
        "sec_I.table_0": [
            {"col_0": "Ada Lovelace", "col_1": "PI"},
            {"col_0": "Charles Babbage", "col_1": "Engineer"}
        ],
        "sec_II.protocol": "P-42",
        "sec_II.sponsor": "Royal Society"
    }));

    let filled = fill(&template, &schema, &data).unwrap();
    let doc = Document::from_bytes(&filled.bytes).unwrap();

    let people = doc.table(0).unwrap();
    assert_eq!(tbl::row_count(people), 3);
    let cell = |t: &Element, r: usize, c: usize| tbl::cell(t, r, c).map(tbl::cell_text).unwrap();
    assert_eq!(cell(people, 1, 0), "Ada Lovelace");
    assert_eq!(cell(people, 2, 0), "Charles Babbage");
    assert_eq!(cell(people, 2, 1), "Engineer");

    let study = doc.table(1).unwrap();
    assert_eq!(cell(study, 0, 1), "P-42");
    assert_eq!(cell(study, 1, 1), "Royal Society");
    assert!(filled.report.is_complete());
}

#[test]
fn test_fill_checkboxes() {
    let template = template();
    let schema = extract_from_bytes(&template).unwrap();
    let data = form_data(json!({
        "sec_II.phase": "option_2",
        "sec_II.involves_minors": "yes"
    }));

    let filled = fill(&template, &schema, &data).unwrap();
    let doc = Document::from_bytes(&filled.bytes).unwrap();
    assert_eq!(
        paragraph_text(doc.paragraph(4).unwrap()),
        "Phase: ☐ Phase I ☑ Phase II ☐ Phase III"
    );
    assert_eq!(checkbox_states(doc.paragraph(5).unwrap()), vec![false, true]);
}

#[test]
fn test_ignored_keys_and_misses() {
    let template = template();
    let mut schema = extract_from_bytes(&template).unwrap();
    schema.fields[1].anchor = None;
    let data = form_data(json!({
        "_status": "draft",
        "sec_I.department": "Physics",
        "sec_IX.unknown": "x",
        "sec_I.table_0": "not rows"
    }));

    let filled = fill(&template, &schema, &data).unwrap();
    assert_eq!(filled.report.ignored_keys, vec!["_status", "sec_IX.unknown"]);
    assert_eq!(
        filled.report.miss_for("sec_I.department"),
        Some(MissReason::NoAnchor)
    );
    assert_eq!(
        filled.report.miss_for("sec_I.table_0"),
        Some(MissReason::NotAList)
    );
    assert!(filled.report.filled.is_empty());
}

#[test]
fn test_reserved_prefix_can_be_disabled() {
    let template = template();
    let schema = extract_from_bytes(&template).unwrap();
    let data = form_data(json!({"_status": "draft"}));
    let options = FillOptions {
        reserved_prefix: String::new(),
    };

    let filled = fill_with_options(&template, &schema, &data, &options).unwrap();
    // Not reserved any more, but still unknown to the schema
    assert_eq!(filled.report.ignored_keys, vec!["_status"]);
}

#[test]
fn test_fill_is_deterministic() {
    let template = template();
    let schema = extract_from_bytes(&template).unwrap();
    let data = form_data(json!({
        "sec_I.name": "Ada",
        "sec_II.sponsor": "Royal Society",
        "sec_II.phase": ["option_1", "option_3"]
    }));

    let first = fill(&template, &schema, &data).unwrap();
    let second = fill(&template, &schema, &data).unwrap();
    let part = |bytes: &[u8]| {
        DocxPackage::from_bytes(bytes)
            .unwrap()
            .part("word/document.xml")
            .map(<[u8]>::to_vec)
    };
    assert_eq!(part(&first.bytes), part(&second.bytes));
    assert_eq!(first.report, second.report);

    // The template itself still extracts to the same schema
    assert_eq!(extract_from_bytes(&template).unwrap(), schema);
}

#[test]
fn test_composite_consumes_sources() {
    let body = [
        paragraph("I. Contact"),
        paragraph("First name: ____"),
        paragraph("Last name: ____"),
        paragraph("Full name: ____"),
    ]
    .concat();
    let template = docx_from_body(&body).unwrap();
    let mut schema = extract_from_bytes(&template).unwrap();
    schema.composites.push(CompositeFill {
        id: "full_name".to_string(),
        sources: vec![
            "sec_I.first_name".to_string(),
            "sec_I.last_name".to_string(),
        ],
        target: Anchor::Paragraph(ParagraphAnchor {
            paragraph_index: None,
            paragraph_contains: Some("Full name".to_string()),
            offset: 0,
        }),
        compose: Composition::Join {
            separator: " ".to_string(),
            template: None,
        },
    });
    let data = form_data(json!({
        "sec_I.first_name": "Ada",
        "sec_I.last_name": "Lovelace"
    }));

    let filled = fill(&template, &schema, &data).unwrap();
    let texts = texts(&filled.bytes);
    assert_eq!(texts[1], "First name: ____");
    assert_eq!(texts[2], "Last name: ____");
    assert_eq!(texts[3], "Full name: Ada Lovelace");
    assert_eq!(filled.report.filled, vec!["full_name"]);
}

#[test]
fn test_corrupt_template() {
    let schema = TemplateSchema::default();
    let result = fill(b"not a zip", &schema, &FormData::new());
    assert!(matches!(
        result,
        Err(form_engine::EngineError::TemplateCorrupt(_))
    ));
    assert!(matches!(
        extract_from_bytes(b"not a zip"),
        Err(form_engine::EngineError::ParseFailure(_))
    ));
}
