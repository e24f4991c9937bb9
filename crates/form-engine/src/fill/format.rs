//! Value formatting per field type

use form_types::{Field, FieldType};
use serde_json::Value;

use crate::extract::{CHECKED_GLYPH, UNCHECKED_GLYPH};

const TRUTHY: [&str; 5] = ["yes", "true", "1", "on", "x"];

/// Plain rendering: strings as-is, lists comma-joined, null empty
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => join(items.iter().map(plain_text)),
        Value::Object(_) => value.to_string(),
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            TRUTHY.contains(&s.as_str())
        }
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Text written into a paragraph placeholder
pub fn paragraph_value(field: &Field, value: &Value) -> String {
    match (field.field_type, value) {
        (_, Value::Array(items)) => join(items.iter().map(|v| option_text(field, v))),
        (FieldType::Checkbox, other) => {
            let glyph = if is_truthy(other) {
                CHECKED_GLYPH
            } else {
                UNCHECKED_GLYPH
            };
            glyph.to_string()
        }
        (FieldType::Radio | FieldType::Select, other) => option_text(field, other),
        (_, other) => plain_text(other),
    }
}

/// Text written into a table cell
pub fn cell_value(field: &Field, value: &Value) -> String {
    match (field.field_type, value) {
        (_, Value::Array(items)) => join(items.iter().map(|v| option_text(field, v))),
        (FieldType::Checkbox, other) => {
            if is_truthy(other) {
                "Yes".to_string()
            } else {
                String::new()
            }
        }
        (FieldType::Radio | FieldType::Select, other) => option_text(field, other),
        (_, other) => plain_text(other),
    }
}

/// Display label of an option value, or the value itself when unknown
fn option_text(field: &Field, value: &Value) -> String {
    match value.as_str() {
        Some(s) => field.option_label(s).unwrap_or(s).to_string(),
        None => plain_text(value),
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_types::FieldOption;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn field(field_type: FieldType) -> Field {
        Field::new("sec_I.f", field_type, "F", "sec_I", 0).with_options(vec![
            FieldOption {
                value: "option_1".to_string(),
                label: "Federal".to_string(),
            },
            FieldOption {
                value: "option_2".to_string(),
                label: "Industry".to_string(),
            },
        ])
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(plain_text(&json!(null)), "");
        assert_eq!(plain_text(&json!("Ada")), "Ada");
        assert_eq!(plain_text(&json!(42)), "42");
        assert_eq!(plain_text(&json!(["a", 1, null])), "a, 1, ");
    }

    #[test]
    fn test_truthiness() {
        for value in [json!(true), json!("Yes"), json!(" on "), json!("X"), json!(1), json!(0.5)] {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
        for value in [json!(false), json!("no"), json!(""), json!(0), json!(null), json!([])] {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
    }

    #[test]
    fn test_paragraph_value_by_type() {
        assert_eq!(paragraph_value(&field(FieldType::Checkbox), &json!(true)), "☑");
        assert_eq!(paragraph_value(&field(FieldType::Checkbox), &json!(false)), "☐");
        assert_eq!(
            paragraph_value(&field(FieldType::Checkbox), &json!(["option_1", "option_2"])),
            "Federal, Industry"
        );
        assert_eq!(paragraph_value(&field(FieldType::Text), &json!("x")), "x");
    }

    #[test]
    fn test_cell_value_by_type() {
        assert_eq!(cell_value(&field(FieldType::Checkbox), &json!(true)), "Yes");
        assert_eq!(cell_value(&field(FieldType::Checkbox), &json!(false)), "");
        assert_eq!(cell_value(&field(FieldType::Radio), &json!("option_2")), "Industry");
        assert_eq!(cell_value(&field(FieldType::Select), &json!("State")), "State");
        assert_eq!(cell_value(&field(FieldType::Text), &json!(["a", "b"])), "a, b");
    }
}
